//! HTTP handlers for the entity API and static files.

pub mod asset;
pub mod entity;
pub use asset::*;
pub use entity::*;
