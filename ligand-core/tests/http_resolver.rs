//! Network resolution against a local test server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use ligand_core::vocab::{Actor, Object};
use ligand_core::{
    HttpConfig, HttpResolver, MemoryResolver, Node, Resolve, ResolverChain, Transformer,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::sleep;

async fn note() -> Json<Value> {
    Json(json!({
        "type": "Note",
        "id": "/notes/1",
        "content": "hello from the server",
        "attributedTo": "http://placeholder/users/alice"
    }))
}

async fn alice() -> Json<Value> {
    Json(json!({
        "type": "Person",
        "preferredUsername": "alice",
        "inbox": "http://placeholder/users/alice/inbox"
    }))
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    Json(json!({
        "type": "Note",
        "content": header_value(header::ACCEPT),
        "summary": header_value(header::USER_AGENT)
    }))
}

async fn gone() -> StatusCode {
    StatusCode::GONE
}

async fn garbage() -> &'static str {
    "this is not json"
}

async fn slow() -> Json<Value> {
    sleep(Duration::from_millis(100)).await;
    Json(json!({"type": "Note", "content": "slow"}))
}

async fn fast() -> Json<Value> {
    Json(json!({"type": "Note", "content": "fast"}))
}

async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get server address");
    let router = Router::new()
        .route("/notes/1", get(note))
        .route("/users/alice", get(alice))
        .route("/headers", get(echo_headers))
        .route("/gone", get(gone))
        .route("/garbage", get(garbage))
        .route("/slow", get(slow))
        .route("/fast", get(fast));

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server failed");
    });

    addr
}

fn http_chain(transformer: &Arc<Transformer>) -> ResolverChain {
    ResolverChain::with(HttpResolver::new(Arc::clone(transformer)))
}

#[tokio::test]
async fn fetched_documents_are_typed() {
    let addr = spawn_server().await;
    let transformer = Arc::new(Transformer::with_vocabulary());
    let chain = http_chain(&transformer);

    let href = format!("http://{addr}/notes/1");
    let mut node = transformer.link_from_href(&href).unwrap();
    let resolved = node.resolve(Some(&chain)).await.unwrap();

    assert!(resolved.is("Note"));
    let view = resolved.view::<Object>().unwrap();
    assert_eq!(view.content.as_deref(), Some("hello from the server"));
    assert!(view.attributed_to[0].as_link().unwrap().is_href_only());

    // The link now renders as the resolved document.
    assert_eq!(node.to_json()["content"], json!("hello from the server"));
}

#[tokio::test]
async fn resolved_links_can_be_followed() {
    let addr = spawn_server().await;
    let transformer = Arc::new(Transformer::with_vocabulary());
    let chain = http_chain(&transformer);

    let doc = json!({
        "type": "Create",
        "actor": format!("http://{addr}/users/alice"),
        "object": {"type": "Note", "content": "inline"}
    });
    let mut activity = transformer.transform(&doc);
    let Node::Object(instance) = &mut activity else {
        panic!("expected an object");
    };

    let actor = instance.get_mut("actor").unwrap();
    let resolved = actor.resolve(Some(&chain)).await.unwrap();

    assert!(resolved.is("Person"));
    let person = resolved.view::<Actor>().unwrap();
    assert_eq!(person.preferred_username.as_deref(), Some("alice"));
    assert!(person.inbox.unwrap().as_link().is_some());
}

#[tokio::test]
async fn accept_header_is_sent() {
    let addr = spawn_server().await;
    let transformer = Arc::new(Transformer::with_vocabulary());
    let resolver = HttpResolver::new(Arc::clone(&transformer));

    let body = resolver.fetch(&format!("http://{addr}/headers")).await.unwrap();
    assert_eq!(body["content"], json!("application/json"));
    assert_eq!(body["summary"], Value::Null);
}

#[tokio::test]
async fn request_headers_are_configurable() {
    let addr = spawn_server().await;
    let transformer = Arc::new(Transformer::with_vocabulary());
    let resolver = HttpResolver::with_config(
        Arc::clone(&transformer),
        HttpConfig {
            accept: "application/activity+json".to_string(),
            user_agent: Some("ligand-tests/1.0".to_string()),
        },
    );

    let node = resolver
        .try_resolve(&format!("http://{addr}/headers"))
        .await
        .unwrap();
    let view = node.view::<Object>().unwrap();
    assert_eq!(view.content.as_deref(), Some("application/activity+json"));
    assert_eq!(view.summary.as_deref(), Some("ligand-tests/1.0"));
}

#[tokio::test]
async fn error_statuses_pass_the_href_through() {
    let addr = spawn_server().await;
    let transformer = Arc::new(Transformer::with_vocabulary());
    let chain = http_chain(&transformer);

    for path in ["gone", "does-not-exist", "garbage"] {
        let href = format!("http://{addr}/{path}");
        let mut node = transformer.link_from_href(&href).unwrap();
        let resolved = node.resolve(Some(&chain)).await.unwrap();
        assert_eq!(resolved.as_str(), Some(href.as_str()), "{path}");
        assert_eq!(node.to_json(), json!(href));
    }
}

#[tokio::test]
async fn connection_failures_pass_the_href_through() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transformer = Arc::new(Transformer::with_vocabulary());
    let chain = http_chain(&transformer);

    let href = format!("http://{addr}/anything");
    let resolved = chain.handle(&href).await;
    assert_eq!(resolved.as_str(), Some(href.as_str()));
}

#[tokio::test]
async fn failures_fall_back_to_the_next_strategy() {
    let addr = spawn_server().await;
    let transformer = Arc::new(Transformer::with_vocabulary());

    let href = format!("http://{addr}/gone");
    let archive = MemoryResolver::new();
    archive.insert(
        href.clone(),
        transformer.transform(&json!({"type": "Tombstone", "formerType": "Note"})),
    );

    let mut chain = http_chain(&transformer);
    chain.set_next(ResolverChain::with(archive));

    let resolved = chain.handle(&href).await;
    assert!(resolved.is("Tombstone"));
}

#[tokio::test]
async fn collections_resolve_concurrently_in_order() {
    let addr = spawn_server().await;
    let transformer = Arc::new(Transformer::with_vocabulary());
    let chain = http_chain(&transformer);

    let mut collection = transformer.transform(&json!({
        "type": "OrderedCollection",
        "orderedItems": [
            format!("http://{addr}/slow"),
            format!("http://{addr}/gone"),
            format!("http://{addr}/fast")
        ]
    }));
    let Node::Object(instance) = &mut collection else {
        panic!("expected an object");
    };

    let items = instance.get_mut("orderedItems").unwrap();
    let resolved = items.resolve(Some(&chain)).await.unwrap();

    let contents: Vec<Value> = resolved
        .as_sequence()
        .unwrap()
        .iter()
        .map(|item| item.to_json())
        .collect();
    assert_eq!(contents[0]["content"], json!("slow"));
    assert_eq!(contents[1], json!(format!("http://{addr}/gone")));
    assert_eq!(contents[2]["content"], json!("fast"));
}

#[tokio::test]
async fn links_resolve_through_the_default_chain() {
    let addr = spawn_server().await;
    let transformer = Transformer::global();
    assert!(Arc::ptr_eq(transformer, Transformer::global()));
    assert_eq!(ligand_core::default_chain().len(), 1);

    let href = format!("http://{addr}/notes/1");
    let mut node = transformer.link_from_href(&href).unwrap();
    let resolved = node.resolve(None).await.unwrap();
    assert!(resolved.is("Note"));
    assert_eq!(node.to_json()["content"], json!("hello from the server"));

    let href = format!("http://{addr}/gone");
    let mut node = transformer.link_from_href(&href).unwrap();
    let resolved = node.resolve(None).await.unwrap();
    assert_eq!(resolved.as_str(), Some(href.as_str()));
}
