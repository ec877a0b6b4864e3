use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pdl_rest::{CacheTier, RestClient, RestError, build_url, item_key, list_key};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn committees(State(hits): State<Hits>) -> Json<Value> {
    hits.0.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "items": [{ "id": 1, "name": "Health" }], "totalResults": 1 }))
}

async fn broken(State(hits): State<Hits>) -> StatusCode {
    hits.0.fetch_add(1, Ordering::SeqCst);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn app(hits: Hits) -> Router {
    Router::new()
        .route("/api/Committees", get(committees))
        .route("/api/Broken", get(broken))
        .with_state(hits)
}

#[tokio::test]
async fn successful_responses_are_cached() {
    let hits = Hits::default();
    let base = spawn(app(hits.clone())).await;
    let client = RestClient::builder().build().unwrap();

    let url = build_url(&base, "/api/Committees", &[("Take", "20".to_owned())]).unwrap();
    for _ in 0..3 {
        let body = client.get_cached(CacheTier::List, list_key("committee", &url), &url).await;
        assert_eq!(body.unwrap()["items"][0]["name"], "Health");
    }
    assert_eq!(hits.0.load(Ordering::SeqCst), 1);

    client.invalidate_all();
    client.get_cached(CacheTier::List, list_key("committee", &url), &url).await.unwrap();
    assert_eq!(hits.0.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let hits = Hits::default();
    let base = spawn(app(hits.clone())).await;
    let client = RestClient::builder().build().unwrap();

    let url = build_url(&base, "/api/Broken", &[]).unwrap();
    assert!(client.get_cached(CacheTier::Item, item_key("committee", "1"), &url).await.is_none());
    assert!(client.get_cached(CacheTier::Item, item_key("committee", "1"), &url).await.is_none());
    assert_eq!(hits.0.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn get_json_reports_status() {
    let base = spawn(app(Hits::default())).await;
    let client = RestClient::builder().build().unwrap();

    let url = build_url(&base, "/api/Missing", &[]).unwrap();
    let err = client.get_json(&url).await.unwrap_err();
    assert!(matches!(err, RestError::Status { status: 404, .. }));
}
