//! Invoking actions: parameter resolution, body encoding, transport, response decoding.

use crate::error::ResourceError;
use crate::resource::action::ActionDescriptor;
use crate::resource::factory::Resource;
use crate::resource::template::Params;
use crate::resource::transform::parse_json;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use serde_json::Value;
use std::fmt::Display;
use std::sync::Mutex;
use tower::{Service, ServiceExt};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireRequest {
    pub method: Method,
    /// Path and query, relative to whatever the transport talks to.
    pub url: String,
    pub body: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Sends one request and waits for its whole response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, ResourceError>;
}

/// Transport over any tower service speaking axum requests, e.g. a `Router` in process.
/// Each request runs on a fresh clone of the service.
pub struct ServiceTransport<S> {
    service: Mutex<S>,
}

impl<S> ServiceTransport<S> {
    pub fn new(service: S) -> Self {
        ServiceTransport {
            service: Mutex::new(service),
        }
    }
}

#[async_trait]
impl<S> Transport for ServiceTransport<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Error: Display,
    S::Future: Send,
{
    async fn send(&self, request: WireRequest) -> Result<WireResponse, ResourceError> {
        let mut builder = Request::builder().method(request.method).uri(&request.url);
        if request.body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let http_request = builder
            .body(request.body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| ResourceError::Transport(e.to_string()))?;

        let service = self
            .service
            .lock()
            .map_err(|_| ResourceError::Transport("service lock poisoned".into()))?
            .clone();
        let response = service
            .oneshot(http_request)
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;
        Ok(WireResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

impl Resource {
    /// Invoke an action by name.
    ///
    /// Bindings resolve as resource defaults, then action params, then `params`;
    /// later sources win and `@field` bindings read `entity`. For methods with a
    /// body, `entity` is encoded and sent.
    pub async fn call(
        &self,
        action: &str,
        params: &Params,
        entity: Option<&Value>,
    ) -> Result<Value, ResourceError> {
        let descriptor = self
            .action(action)
            .ok_or_else(|| ResourceError::UnknownAction(action.to_string()))?;
        let resolved = self.resolve_params(descriptor, params, entity);
        let url = self.template().expand(&resolved);
        let body = match entity {
            Some(entity) if descriptor.has_body() => Some(encode(descriptor, entity)?),
            _ => None,
        };

        tracing::debug!(action, method = %descriptor.method, url = %url, "sending");
        let response = self
            .inner
            .transport
            .send(WireRequest {
                method: descriptor.method.clone(),
                url,
                body,
            })
            .await?;
        if !response.status.is_success() {
            return Err(ResourceError::Status {
                status: response.status,
                body: response.body,
            });
        }
        let decoded = decode(descriptor, &response.body)?;
        check_shape(descriptor, &decoded)?;
        Ok(decoded)
    }

    pub async fn get(&self, params: &Params) -> Result<Value, ResourceError> {
        self.call("get", params, None).await
    }

    pub async fn query(&self, params: &Params) -> Result<Value, ResourceError> {
        self.call("query", params, None).await
    }

    pub async fn save(&self, entity: &Value) -> Result<Value, ResourceError> {
        self.call("save", &Params::new(), Some(entity)).await
    }

    pub async fn update(&self, entity: &Value) -> Result<Value, ResourceError> {
        self.call("update", &Params::new(), Some(entity)).await
    }

    pub async fn delete(&self, params: &Params) -> Result<Value, ResourceError> {
        self.call("delete", params, None).await
    }

    pub async fn remove(&self, params: &Params) -> Result<Value, ResourceError> {
        self.call("remove", params, None).await
    }

    fn resolve_params(&self, descriptor: &ActionDescriptor, params: &Params, entity: Option<&Value>) -> Params {
        let mut resolved = Params::new();
        for (name, binding) in self.param_defaults().iter().chain(descriptor.params.iter()) {
            match binding.resolve(entity) {
                Some(value) => {
                    resolved.insert(name.clone(), value);
                }
                None => {
                    resolved.remove(name);
                }
            }
        }
        resolved.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        resolved
    }
}

fn encode(descriptor: &ActionDescriptor, entity: &Value) -> Result<String, ResourceError> {
    match &descriptor.request_transform {
        Some(transform) => transform.encode(entity),
        None => Ok(serde_json::to_string(entity)?),
    }
}

/// Untransformed bodies are still JSON; an empty body (successful DELETE) is `null`.
fn decode(descriptor: &ActionDescriptor, raw: &str) -> Result<Value, ResourceError> {
    match &descriptor.response_transform {
        Some(transform) => transform.decode(raw),
        None if raw.trim().is_empty() => Ok(Value::Null),
        None => parse_json(raw),
    }
}

/// Array actions must answer with an array and the rest with anything else. `null` passes.
fn check_shape(descriptor: &ActionDescriptor, value: &Value) -> Result<(), ResourceError> {
    let shape = |is_array: bool| if is_array { "an array" } else { "a single value" };
    if value.is_null() || value.is_array() == descriptor.is_array {
        return Ok(());
    }
    Err(ResourceError::ShapeMismatch {
        action: descriptor.name.clone(),
        expected: shape(descriptor.is_array),
        actual: shape(value.is_array()),
    })
}
