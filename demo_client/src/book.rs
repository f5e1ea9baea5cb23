//! The `Book` resource: genres travel as codes on the wire and as objects in memory.

use crate::genre::{genre, is_fiction};
use resource_pattern::{
    make_resource, ActionSpec, BoxError, Instance, Resource, ResourceError, ResourceOptions, Transport,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn to_wire(mut book: Value) -> Result<Value, BoxError> {
    let fields = book.as_object_mut().ok_or("book must be an object")?;
    let code = fields
        .get("genre")
        .and_then(|g| g.get("code"))
        .cloned()
        .ok_or("book has no genre code")?;
    fields.insert("genre".into(), code);
    Ok(book)
}

fn from_wire(mut book: Value) -> Result<Value, BoxError> {
    if let Some(fields) = book.as_object_mut() {
        if let Some(code) = fields.get("genre").and_then(Value::as_str).map(str::to_string) {
            fields.insert("genre".into(), genre(&code));
        }
    }
    Ok(book)
}

pub fn books(transport: Arc<dyn Transport>) -> Result<Resource, ResourceError> {
    make_resource(
        "/api/books/:id",
        ResourceOptions::new()
            .param("id", "@id")
            .request_transformer(to_wire)
            .response_transformer(from_wire)
            .extra_action("available", ActionSpec::default().array().param("filter", "available"))
            .behavior("is_fiction", |book: &Instance| {
                let code = book.field("genre").and_then(|g| g.get("code")).and_then(Value::as_str);
                json!(code.map(is_fiction).unwrap_or(false))
            }),
        transport,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genres_travel_as_codes() {
        let book = json!({ "title": "Dune", "genre": genre("scienceFiction") });
        assert_eq!(
            to_wire(book).unwrap(),
            json!({ "title": "Dune", "genre": "scienceFiction" })
        );
        assert_eq!(
            from_wire(json!({ "genre": "horror" })).unwrap(),
            json!({ "genre": { "code": "horror", "display": "Horror" } })
        );
    }

    #[test]
    fn book_without_genre_is_rejected() {
        assert!(to_wire(json!({ "title": "Untitled" })).is_err());
    }
}
