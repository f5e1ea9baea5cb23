//! Resource pattern: declarative REST resource clients with a method-aware
//! transform pipeline, and an in-memory REST backend that serves them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod resource;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{from_env, ServerConfig};
pub use error::{AppError, BoxError, ConfigError, ResourceError};
pub use resource::{make_resource, ActionSpec, Instance, Resource, ResourceOptions, ServiceTransport, Transport};
pub use routes::{app, asset_routes, entity_routes, index_fallback};
pub use state::AppState;
pub use store::{EntityStore, Record};
