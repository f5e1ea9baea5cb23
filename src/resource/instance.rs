//! Entity instances: fields plus the resource's behaviors and instance-bound actions.

use crate::error::ResourceError;
use crate::resource::factory::Resource;
use crate::resource::template::Params;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A named function over an instance's own fields, unrelated to HTTP.
pub type Behavior = Arc<dyn Fn(&Instance) -> Value + Send + Sync>;

#[derive(Clone)]
pub struct Instance {
    resource: Resource,
    fields: Value,
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("fields", &self.fields).finish()
    }
}

impl Instance {
    pub(crate) fn new(resource: Resource, fields: Value) -> Self {
        Instance { resource, fields }
    }

    pub fn fields(&self) -> &Value {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set one field. A non-object instance becomes an object first.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        if !self.fields.is_object() {
            self.fields = Value::Object(Default::default());
        }
        if let Value::Object(map) = &mut self.fields {
            map.insert(name.into(), value);
        }
    }

    pub fn into_value(self) -> Value {
        self.fields
    }

    /// Run a behavior attached by the resource.
    pub fn behave(&self, name: &str) -> Result<Value, ResourceError> {
        let behavior = self
            .resource
            .inner
            .behaviors
            .get(name)
            .ok_or_else(|| ResourceError::UnknownBehavior(name.to_string()))?;
        Ok(behavior(self))
    }

    /// Invoke an action bound to this instance: `@field` bindings and the body
    /// come from its fields. An object response replaces the fields; anything
    /// else (e.g. the empty body of a delete) leaves them untouched.
    pub async fn invoke(&mut self, action: &str) -> Result<(), ResourceError> {
        self.invoke_with(action, &Params::new()).await
    }

    pub async fn invoke_with(&mut self, action: &str, params: &Params) -> Result<(), ResourceError> {
        let result = self.resource.call(action, params, Some(&self.fields)).await?;
        if result.is_object() {
            self.fields = result;
        }
        Ok(())
    }
}
