//! Demo: a `Book` resource client talking to the in-memory backend in process.
//!
//! Run from repo root: `cargo run -p demo-client`

mod book;
mod genre;

use resource_pattern::resource::{params, Params};
use resource_pattern::{app, from_env, AppState, EntityStore, ServiceTransport};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("demo_client=info,resource_pattern=info")),
        )
        .init();

    let state = AppState::new(EntityStore::new(), from_env()?);
    let books = book::books(Arc::new(ServiceTransport::new(app(state))))?;
    tracing::info!(genres = ?genre::all(), "known genres");

    for (title, code) in [("Dune", "scienceFiction"), ("Cosmos", "science"), ("Dracula", "horror")] {
        let mut draft = books.instance(json!({ "title": title, "genre": genre::genre(code) }));
        draft.invoke("save").await?;
        tracing::info!(
            book = %draft.fields(),
            fiction = %draft.behave("is_fiction")?,
            "saved"
        );
    }

    let mut dune = books.instance(books.get(&params([("id", "1")])).await?);
    dune.set("title", json!("Dune Messiah"));
    dune.invoke("update").await?;
    tracing::info!(book = %dune.fields(), "updated");

    books.remove(&params([("id", "2")])).await?;
    for book in books.instances(books.call("available", &Params::new(), None).await?) {
        tracing::info!(book = %book.fields(), fiction = %book.behave("is_fiction")?, "available");
    }
    Ok(())
}
