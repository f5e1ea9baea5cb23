//! Declarative REST resource clients.
//!
//! `make_resource` turns a URL template and `ResourceOptions` into a `Resource`
//! with the standard actions (`get`, `query`, `save`, `update`, `delete`,
//! `remove`) plus any extras, each wired with the transform pipeline by method.

pub mod action;
pub mod client;
pub mod factory;
pub mod instance;
pub mod template;
pub mod transform;

pub use action::{merge_actions, standard_actions, ActionDescriptor, ActionSpec};
pub use client::{ServiceTransport, Transport, WireRequest, WireResponse};
pub use factory::{make_resource, Resource, ResourceOptions};
pub use instance::{Behavior, Instance};
pub use template::{params, Binding, Bindings, EndpointTemplate, Params};
pub use transform::{
    parse_json, wire_transforms, wrap_request_transform, wrap_response_transform, EntityFn,
    RequestTransform, ResponseTransform, Transformers,
};
