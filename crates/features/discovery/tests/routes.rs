use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pdl_discovery::Discovery;
use pdl_kernel::domain::config::ApiConfig;
use pdl_kernel::server::ApiState;
use pdl_kernel::upstream::Upstreams;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(config: ApiConfig) -> Router {
    let upstreams = Upstreams::from_config(&config).unwrap();
    let slice = pdl_discovery::init(&config, &upstreams).unwrap();
    let state = ApiState::builder()
        .config(config)
        .upstreams(upstreams)
        .register_slice(slice)
        .build()
        .unwrap();

    let (router, _) = pdl_discovery::router().split_for_parts();
    router.with_state(state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri)
        .header(header::HOST, "api.test")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[test]
fn init_creates_slice() {
    let config = ApiConfig::default();
    let upstreams = Upstreams::from_config(&config).unwrap();
    let slice = pdl_discovery::init(&config, &upstreams).expect("init should succeed");
    assert_eq!(slice.id, std::any::TypeId::of::<Discovery>());
}

#[tokio::test]
async fn home_links_to_the_api_root() {
    let (status, body) = get(&app(ApiConfig::default()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "name": "UK Parliament Linked Data API",
            "current_version": "v1",
            "api_root": "https://api.test/api/v1",
        })
    );
}

#[tokio::test]
async fn overview_quotes_configured_page_sizes() {
    let mut config = ApiConfig::default();
    config.pagination.default_per_page = 10;
    config.pagination.max_per_page = 50;

    let (status, body) = get(&app(config), "/api/v1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "UK Parliament Data Library API");
    assert_eq!(body["documentation"], "https://api.test/api/v1/resource-types");
    assert_eq!(body["parameters"]["per_page"], "Results per page (default: 10, max: 50)");
    assert_eq!(
        body["endpoints"]["research-briefings"]["list"]["url"],
        "https://api.test/api/v1/research-briefings"
    );
    assert_eq!(body["filtering"]["examples"][2], "https://api.test/api/v1/committees?house=Commons");
    assert_eq!(body["sources"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn resource_types_are_listed_in_catalog_order() {
    let (status, body) = get(&app(ApiConfig::default()), "/api/v1/resource-types").await;
    assert_eq!(status, StatusCode::OK);

    let types = body["resource_types"].as_array().unwrap();
    assert_eq!(types.len(), 11);
    assert_eq!(
        types[0],
        json!({
            "id": "research-briefings",
            "url": "https://api.test/api/v1/research-briefings",
            "documentation": "https://api.test/api/v1/resource-types/research-briefings",
        })
    );
    assert_eq!(types[10]["id"], "countries");
}

#[tokio::test]
async fn resource_type_documents_fields_and_filters() {
    let (status, body) = get(&app(ApiConfig::default()), "/api/v1/resource-types/committees").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "committees");
    assert_eq!(body["endpoints"]["show"]["description"], "Returns a single committee by ID");
    assert_eq!(
        body["filters"][0],
        json!({
            "parameter": "house",
            "label": "house",
            "example": "?house=Commons",
            "values": ["Commons", "Lords"],
        })
    );
    assert_eq!(body["example_response"]["meta"]["page"], "integer");
    assert_eq!(body["example_response"]["items"][0]["id"], "string");
}

#[tokio::test]
async fn unknown_resource_type_is_a_json_404() {
    let (status, body) = get(&app(ApiConfig::default()), "/api/v1/resource-types/widgets").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Unknown resource type: widgets" }));
}
