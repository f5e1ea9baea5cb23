//! Server configuration types.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_STATIC_DIRS: &[&str] = &["bower_components/", "client/"];
pub const DEFAULT_INDEX_PATH: &str = "client/index.html";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Where the dev server listens and where it looks for files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Roots searched in order for `/assets/*` requests; first hit wins.
    pub static_dirs: Vec<PathBuf>,
    /// Document served for every route that is neither an asset nor an API call.
    pub index_path: PathBuf,
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    /// Config with the given asset roots and index document, every other field defaulted.
    pub fn with_paths(static_dirs: Vec<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        ServerConfig {
            static_dirs,
            index_path: index_path.into(),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dirs: DEFAULT_STATIC_DIRS.iter().map(PathBuf::from).collect(),
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}
