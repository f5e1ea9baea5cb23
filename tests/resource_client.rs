mod common;

use axum::http::{Method, StatusCode};
use common::{router, Scratch};
use resource_pattern::resource::{params, Params};
use resource_pattern::{make_resource, ActionSpec, Instance, Resource, ResourceError, ResourceOptions, ServiceTransport};
use serde_json::{json, Value};
use std::sync::Arc;

fn books(scratch: &Scratch) -> Resource {
    make_resource(
        "/api/books/:id",
        ResourceOptions::new()
            .param("id", "@id")
            .request_transformer(|mut book: Value| {
                book["genre"] = book["genre"]["code"].take();
                Ok(book)
            })
            .response_transformer(|mut book: Value| {
                let code = book["genre"].take();
                book["genre"] = json!({ "code": code });
                Ok(book)
            })
            .extra_action("available", ActionSpec::default().array().param("filter", "available"))
            .extra_action("publish", ActionSpec::new(Method::POST))
            .behavior("is_fiction", |book: &Instance| {
                let code = book.field("genre").and_then(|g| g.get("code")).and_then(Value::as_str);
                json!(!matches!(code, Some("science") | Some("nonFiction")))
            }),
        Arc::new(ServiceTransport::new(router(scratch))),
    )
    .unwrap()
}

#[tokio::test]
async fn crud_through_the_resource() {
    let scratch = Scratch::new("client-crud");
    let resource = books(&scratch);

    let draft = json!({ "title": "Dune", "genre": { "code": "scienceFiction" } });
    let saved = resource.save(&draft).await.unwrap();
    assert_eq!(saved["id"], json!(1));
    assert_eq!(saved["genre"], json!({ "code": "scienceFiction" }));
    assert_eq!(draft["genre"], json!({ "code": "scienceFiction" }));

    let fetched = resource.get(&params([("id", "1")])).await.unwrap();
    assert_eq!(fetched, saved);

    let mut changed = fetched.clone();
    changed["title"] = json!("Dune Messiah");
    let updated = resource.update(&changed).await.unwrap();
    assert_eq!(updated["title"], json!("Dune Messiah"));
    assert_eq!(updated["created"], saved["created"]);

    let all = resource.query(&Params::new()).await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["genre"], json!({ "code": "scienceFiction" }));

    let available = resource.call("available", &Params::new(), None).await.unwrap();
    assert_eq!(available, all);

    assert_eq!(resource.delete(&params([("id", "1")])).await.unwrap(), Value::Null);
    let err = resource.get(&params([("id", "1")])).await.unwrap_err();
    assert!(matches!(err, ResourceError::Status { status, .. } if status == StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn instances_carry_behaviors_and_bound_actions() {
    let scratch = Scratch::new("client-instance");
    let resource = books(&scratch);

    let mut book = resource.instance(json!({ "title": "Cosmos", "genre": { "code": "science" } }));
    assert_eq!(book.behave("is_fiction").unwrap(), json!(false));

    book.invoke("save").await.unwrap();
    assert_eq!(book.field("id"), Some(&json!(1)));

    book.set("genre", json!({ "code": "fantasy" }));
    book.invoke("update").await.unwrap();
    assert_eq!(book.behave("is_fiction").unwrap(), json!(true));

    let listed = resource.instances(resource.query(&Params::new()).await.unwrap());
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].behave("is_fiction").unwrap(), json!(true));

    book.invoke("remove").await.unwrap();
    assert_eq!(book.field("id"), Some(&json!(1)));
    let err = resource.get(&params([("id", "1")])).await.unwrap_err();
    assert!(matches!(err, ResourceError::Status { .. }));
}

#[tokio::test]
async fn extra_post_action_uses_both_transforms() {
    let scratch = Scratch::new("client-extra");
    let resource = books(&scratch);
    let published = resource
        .call("publish", &Params::new(), Some(&json!({ "title": "It", "genre": { "code": "horror" } })))
        .await
        .unwrap();
    assert_eq!(published["id"], json!(1));
    assert_eq!(published["genre"], json!({ "code": "horror" }));
}

#[tokio::test]
async fn index_fallback_is_not_json() {
    let scratch = Scratch::new("client-malformed");
    let resource = make_resource(
        "/pages/:id",
        ResourceOptions::new().response_transformer(Ok),
        Arc::new(ServiceTransport::new(router(&scratch))),
    )
    .unwrap();
    let err = resource.get(&params([("id", "1")])).await.unwrap_err();
    match err {
        ResourceError::MalformedResponse { body, .. } => assert_eq!(body, "<html>index</html>"),
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}
