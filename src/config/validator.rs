//! Config validation.

use crate::config::loader::{BODY_LIMIT_VAR, INDEX_PATH_VAR, STATIC_DIRS_VAR};
use crate::config::ServerConfig;
use crate::error::ConfigError;

pub fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.static_dirs.is_empty() {
        return Err(ConfigError::Invalid {
            key: STATIC_DIRS_VAR,
            message: "at least one static directory required".into(),
        });
    }
    if config.index_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid {
            key: INDEX_PATH_VAR,
            message: "index path must not be empty".into(),
        });
    }
    if config.body_limit_bytes == 0 {
        return Err(ConfigError::Invalid {
            key: BODY_LIMIT_VAR,
            message: "body limit must be positive".into(),
        });
    }
    Ok(())
}
