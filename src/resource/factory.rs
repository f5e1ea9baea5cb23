//! Resource factory: template + options → a fully wired `Resource`. Performs no I/O.

use crate::error::{BoxError, ResourceError};
use crate::resource::action::{merge_actions, standard_actions, ActionDescriptor, ActionSpec};
use crate::resource::client::Transport;
use crate::resource::instance::{Behavior, Instance};
use crate::resource::template::{parse_bindings, Bindings, EndpointTemplate, Params};
use crate::resource::transform::{EntityFn, Transformers};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Everything a resource can be built with besides its URL template.
#[derive(Clone, Default)]
pub struct ResourceOptions {
    /// Default parameter bindings, e.g. `id => "@id"`.
    pub params: Params,
    pub request_transformer: Option<EntityFn>,
    pub response_transformer: Option<EntityFn>,
    /// Merged over the standard actions in order; a repeated name wins over earlier ones.
    pub extra_actions: Vec<(String, ActionSpec)>,
    /// Functions attached to every instance of the resource.
    pub behaviors: Vec<(String, Behavior)>,
    /// Opaque backend options, carried through untouched.
    pub options: Value,
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn request_transformer<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.request_transformer = Some(Arc::new(f));
        self
    }

    pub fn response_transformer<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.response_transformer = Some(Arc::new(f));
        self
    }

    pub fn extra_action(mut self, name: impl Into<String>, spec: ActionSpec) -> Self {
        self.extra_actions.push((name.into(), spec));
        self
    }

    pub fn behavior<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Instance) -> Value + Send + Sync + 'static,
    {
        self.behaviors.push((name.into(), Arc::new(f)));
        self
    }

    pub fn options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }
}

pub(crate) struct ResourceInner {
    pub(crate) template: EndpointTemplate,
    pub(crate) params: Bindings,
    pub(crate) actions: BTreeMap<String, ActionDescriptor>,
    pub(crate) behaviors: BTreeMap<String, Behavior>,
    pub(crate) options: Value,
    pub(crate) transport: Arc<dyn Transport>,
}

/// A client for one REST endpoint: its actions, behaviors and transport. Cheap to clone.
#[derive(Clone)]
pub struct Resource {
    pub(crate) inner: Arc<ResourceInner>,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("template", &self.inner.template.as_str())
            .field("actions", &self.inner.actions.keys().collect::<Vec<_>>())
            .field("behaviors", &self.inner.behaviors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Build a resource for `url`. Transformers are generated once and wired into
/// every action, standard and extra alike, by method.
pub fn make_resource(
    url: &str,
    options: ResourceOptions,
    transport: Arc<dyn Transport>,
) -> Result<Resource, ResourceError> {
    let template = EndpointTemplate::parse(url)?;
    let generated = Transformers::from_fns(options.request_transformer, options.response_transformer);

    let actions = merge_actions(standard_actions(), options.extra_actions)
        .into_iter()
        .map(|(name, spec)| {
            let descriptor = ActionDescriptor::build(&name, &spec, &generated);
            (name, descriptor)
        })
        .collect();
    let behaviors = options.behaviors.into_iter().collect();

    tracing::debug!(template = %template.as_str(), "made resource");
    Ok(Resource {
        inner: Arc::new(ResourceInner {
            template,
            params: parse_bindings(&options.params),
            actions,
            behaviors,
            options: options.options,
            transport,
        }),
    })
}

impl Resource {
    pub fn template(&self) -> &EndpointTemplate {
        &self.inner.template
    }

    pub fn action(&self, name: &str) -> Option<&ActionDescriptor> {
        self.inner.actions.get(name)
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.inner.actions.values()
    }

    pub fn param_defaults(&self) -> &Bindings {
        &self.inner.params
    }

    pub fn options(&self) -> &Value {
        &self.inner.options
    }

    pub fn has_behavior(&self, name: &str) -> bool {
        self.inner.behaviors.contains_key(name)
    }

    /// Wrap entity fields as an instance carrying this resource's behaviors and actions.
    pub fn instance(&self, fields: Value) -> Instance {
        Instance::new(self.clone(), fields)
    }

    /// Wrap each element of a list response (or a single value) as instances.
    pub fn instances(&self, data: Value) -> Vec<Instance> {
        match data {
            Value::Array(items) => items.into_iter().map(|v| self.instance(v)).collect(),
            single => vec![self.instance(single)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::client::{WireRequest, WireResponse};
    use crate::resource::template::Binding;
    use async_trait::async_trait;
    use axum::http::Method;
    use serde_json::json;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _request: WireRequest) -> Result<WireResponse, ResourceError> {
            Err(ResourceError::Transport("factory must not send".into()))
        }
    }

    fn make(options: ResourceOptions) -> Resource {
        make_resource("/the-url/:id", options, Arc::new(Unreachable)).unwrap()
    }

    fn wiring(resource: &Resource, name: &str) -> (bool, bool) {
        let action = resource.action(name).unwrap();
        (action.request_transform.is_some(), action.response_transform.is_some())
    }

    #[test]
    fn standard_actions_always_exist() {
        let resource = make(ResourceOptions::new());
        for name in ["get", "query", "save", "update", "delete", "remove"] {
            assert!(resource.action(name).is_some(), "missing {name}");
        }
        assert_eq!(resource.template().as_str(), "/the-url/:id");
    }

    #[test]
    fn malformed_template_fails_at_construction() {
        let err = make_resource("/the-url", ResourceOptions::new(), Arc::new(Unreachable)).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidTemplate { .. }));
    }

    #[test]
    fn transformers_are_wired_by_method() {
        let resource = make(
            ResourceOptions::new()
                .request_transformer(Ok)
                .response_transformer(Ok)
                .extra_action("anAction", ActionSpec::default())
                .extra_action("anotherAction", ActionSpec::new(Method::POST)),
        );
        assert_eq!(wiring(&resource, "get"), (false, true));
        assert_eq!(wiring(&resource, "query"), (false, true));
        assert_eq!(wiring(&resource, "save"), (true, true));
        assert_eq!(wiring(&resource, "update"), (true, true));
        assert_eq!(wiring(&resource, "delete"), (false, false));
        assert_eq!(wiring(&resource, "remove"), (false, false));
        assert_eq!(wiring(&resource, "anAction"), (false, true));
        assert_eq!(wiring(&resource, "anotherAction"), (true, true));
    }

    #[test]
    fn no_transformers_means_no_hooks() {
        let resource = make(ResourceOptions::new());
        assert!(resource.actions().all(|a| a.request_transform.is_none() && a.response_transform.is_none()));
    }

    #[test]
    fn extra_action_overrides_standard_one() {
        let resource = make(ResourceOptions::new().extra_action("update", ActionSpec::new(Method::PATCH)));
        assert_eq!(resource.action("update").unwrap().method, Method::PATCH);
        assert_eq!(resource.actions().count(), 6);
    }

    #[test]
    fn params_options_and_behaviors_are_kept() {
        let resource = make(
            ResourceOptions::new()
                .param("id", "@id")
                .options(json!({ "stripTrailingSlashes": false }))
                .behavior("title", |i: &Instance| i.field("title").cloned().unwrap_or_default()),
        );
        assert_eq!(resource.param_defaults().get("id"), Some(&Binding::Field("id".into())));
        assert_eq!(resource.options(), &json!({ "stripTrailingSlashes": false }));
        assert!(resource.has_behavior("title"));
        assert!(!resource.has_behavior("missing"));
    }
}
