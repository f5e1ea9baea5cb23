//! Load server config from environment variables (after `dotenvy`).

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::path::PathBuf;

pub const BIND_ADDR_VAR: &str = "BIND_ADDR";
pub const STATIC_DIRS_VAR: &str = "STATIC_DIRS";
pub const INDEX_PATH_VAR: &str = "INDEX_PATH";
pub const BODY_LIMIT_VAR: &str = "BODY_LIMIT_BYTES";

/// Read config from the process environment. Unset variables fall back to defaults.
pub fn from_env() -> Result<ServerConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Build config from any key lookup; `from_env` is this over `std::env::var`.
pub fn from_lookup<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = ServerConfig::default();

    let bind_addr = match lookup(BIND_ADDR_VAR) {
        Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
            key: BIND_ADDR_VAR,
            message: format!("{} ({})", raw, e),
        })?,
        None => defaults.bind_addr,
    };

    let static_dirs = match lookup(STATIC_DIRS_VAR) {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect(),
        None => defaults.static_dirs,
    };

    let index_path = lookup(INDEX_PATH_VAR)
        .map(|s| PathBuf::from(s.trim()))
        .unwrap_or(defaults.index_path);

    let body_limit_bytes = match lookup(BODY_LIMIT_VAR) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: BODY_LIMIT_VAR,
            message: format!("expected a byte count, got {}", raw),
        })?,
        None => defaults.body_limit_bytes,
    };

    let config = ServerConfig {
        bind_addr,
        static_dirs,
        index_path,
        body_limit_bytes,
    };
    validate(&config)?;
    tracing::debug!(?config, "loaded server config");
    Ok(config)
}
