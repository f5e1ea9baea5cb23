//! Action specs (what the caller declares) and descriptors (what the factory wires).

use crate::resource::template::{parse_bindings, Bindings, Params};
use crate::resource::transform::{wire_transforms, RequestTransform, ResponseTransform, Transformers};
use axum::http::Method;

/// A caller-declared action. An action without a method is a GET.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionSpec {
    pub method: Option<Method>,
    /// The response is a JSON array.
    pub is_array: bool,
    /// Extra default bindings for this action; `@field` reads the entity.
    pub params: Params,
}

impl ActionSpec {
    pub fn new(method: Method) -> Self {
        ActionSpec {
            method: Some(method),
            ..Self::default()
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }
}

/// One action's wiring, built once when the resource is made.
#[derive(Clone, Debug)]
pub struct ActionDescriptor {
    pub name: String,
    pub method: Method,
    pub is_array: bool,
    pub params: Bindings,
    pub request_transform: Option<RequestTransform>,
    pub response_transform: Option<ResponseTransform>,
}

impl ActionDescriptor {
    /// Wiring is decided by the method alone, never by the action's name.
    pub fn build(name: &str, spec: &ActionSpec, generated: &Transformers) -> Self {
        let method = spec.method();
        let wired = wire_transforms(&method, generated);
        ActionDescriptor {
            name: name.to_string(),
            method,
            is_array: spec.is_array,
            params: parse_bindings(&spec.params),
            request_transform: wired.request,
            response_transform: wired.response,
        }
    }

    /// Whether requests for this action carry the entity as a body.
    pub fn has_body(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}

/// `get`, `query`, `save`, `update`, and `delete`/`remove`, in that order.
pub fn standard_actions() -> Vec<(String, ActionSpec)> {
    vec![
        ("get".into(), ActionSpec::default()),
        ("query".into(), ActionSpec::default().array()),
        ("save".into(), ActionSpec::new(Method::POST)),
        ("update".into(), ActionSpec::new(Method::PUT)),
        ("delete".into(), ActionSpec::new(Method::DELETE)),
        ("remove".into(), ActionSpec::new(Method::DELETE)),
    ]
}

/// Ordered merge, last writer wins.
///
/// An extra whose name matches an existing action silently replaces it in place;
/// callers rely on this to customize standard actions, so it is not an error.
pub fn merge_actions(
    base: Vec<(String, ActionSpec)>,
    extras: impl IntoIterator<Item = (String, ActionSpec)>,
) -> Vec<(String, ActionSpec)> {
    let mut merged = base;
    for (name, spec) in extras {
        match merged.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => {
                tracing::debug!(action = %name, "extra action overrides existing action");
                slot.1 = spec;
            }
            None => merged.push((name, spec)),
        }
    }
    merged
}
