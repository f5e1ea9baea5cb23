//! Transform pipeline: wraps per-entity encode/decode functions so they apply
//! per HTTP method and per single-vs-array payload.

use crate::error::{BoxError, ResourceError};
use axum::http::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A user-supplied per-entity transformer. It owns its argument, so it may rewrite it freely.
pub type EntityFn = Arc<dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync>;

/// Entity → wire text, applied to a structural copy of the caller's entity.
#[derive(Clone)]
pub struct RequestTransform(EntityFn);

impl RequestTransform {
    pub fn encode(&self, entity: &Value) -> Result<String, ResourceError> {
        let copy = entity.clone();
        let transformed = (self.0)(copy).map_err(ResourceError::Transform)?;
        Ok(serde_json::to_string(&transformed)?)
    }
}

impl fmt::Debug for RequestTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestTransform")
    }
}

/// Wire text → entity (or entities, element-wise and in order).
#[derive(Clone)]
pub struct ResponseTransform(EntityFn);

impl ResponseTransform {
    pub fn decode(&self, raw: &str) -> Result<Value, ResourceError> {
        match parse_json(raw)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| (self.0)(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
                .map_err(ResourceError::Transform),
            single => (self.0)(single).map_err(ResourceError::Transform),
        }
    }
}

impl fmt::Debug for ResponseTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseTransform")
    }
}

pub fn wrap_request_transform<F>(user_fn: F) -> RequestTransform
where
    F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
{
    RequestTransform(Arc::new(user_fn))
}

pub fn wrap_response_transform<F>(user_fn: F) -> ResponseTransform
where
    F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
{
    ResponseTransform(Arc::new(user_fn))
}

/// Parse an API body; the API always answers JSON.
pub fn parse_json(raw: &str) -> Result<Value, ResourceError> {
    serde_json::from_str(raw).map_err(|source| ResourceError::MalformedResponse {
        body: raw.to_string(),
        source,
    })
}

/// A request/response transform pair, generated once per resource and shared by its actions.
#[derive(Clone, Debug, Default)]
pub struct Transformers {
    pub request: Option<RequestTransform>,
    pub response: Option<ResponseTransform>,
}

impl Transformers {
    pub fn from_fns(request: Option<EntityFn>, response: Option<EntityFn>) -> Self {
        Transformers {
            request: request.map(RequestTransform),
            response: response.map(ResponseTransform),
        }
    }
}

/// Pick the transforms an action of `method` carries.
///
/// GET only receives data, POST and PUT send and receive, DELETE does neither.
/// Any other method gets the response transform and a warning.
pub fn wire_transforms(method: &Method, generated: &Transformers) -> Transformers {
    match *method {
        Method::GET => Transformers {
            request: None,
            response: generated.response.clone(),
        },
        Method::POST | Method::PUT => generated.clone(),
        Method::DELETE => Transformers::default(),
        _ => {
            tracing::warn!(%method, "unknown HTTP method");
            Transformers {
                request: None,
                response: generated.response.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn both() -> Transformers {
        Transformers {
            request: Some(wrap_request_transform(Ok)),
            response: Some(wrap_response_transform(Ok)),
        }
    }

    #[test]
    fn wiring_follows_method() {
        let generated = both();
        let cases = [
            (Method::GET, false, true),
            (Method::POST, true, true),
            (Method::PUT, true, true),
            (Method::DELETE, false, false),
            (Method::PATCH, false, true),
        ];
        for (method, request, response) in cases {
            let wired = wire_transforms(&method, &generated);
            assert_eq!(wired.request.is_some(), request, "{method} request");
            assert_eq!(wired.response.is_some(), response, "{method} response");
        }
    }

    #[test]
    fn missing_transformers_stay_missing() {
        let wired = wire_transforms(&Method::POST, &Transformers::default());
        assert!(wired.request.is_none());
        assert!(wired.response.is_none());
    }

    #[test]
    fn request_transform_works_on_a_copy() {
        let transform = wrap_request_transform(|mut book: Value| {
            book["genre"] = book["genre"]["code"].take();
            Ok(book)
        });
        let book = json!({ "title": "Dune", "genre": { "code": "scienceFiction" } });
        let wire = transform.encode(&book).unwrap();

        assert_eq!(
            serde_json::from_str::<Value>(&wire).unwrap(),
            json!({ "title": "Dune", "genre": "scienceFiction" })
        );
        assert_eq!(book["genre"], json!({ "code": "scienceFiction" }));
    }

    #[test]
    fn response_transform_distributes_over_arrays() {
        let transform = wrap_response_transform(|v: Value| Ok(json!({ "wrapped": v })));
        assert_eq!(
            transform.decode(r#"["a","b"]"#).unwrap(),
            json!([{ "wrapped": "a" }, { "wrapped": "b" }])
        );
        assert_eq!(transform.decode(r#""a""#).unwrap(), json!({ "wrapped": "a" }));
    }

    #[test]
    fn non_json_response_is_malformed() {
        let transform = wrap_response_transform(Ok);
        match transform.decode("<html>oops</html>") {
            Err(ResourceError::MalformedResponse { body, .. }) => assert_eq!(body, "<html>oops</html>"),
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn transformer_errors_propagate() {
        let transform = wrap_response_transform(|_| Err("no genre".into()));
        assert!(matches!(transform.decode("[1]"), Err(ResourceError::Transform(_))));
    }
}
