use axum::body::Body;
use axum::extract::Path;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use pdl_kernel::domain::config::ApiConfig;
use pdl_kernel::server::ApiState;
use pdl_kernel::upstream::Upstreams;
use pdl_resources::Resources;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

const BRIEFINGS: &str = r#"[
  {"@id":"http://data.parliament.uk/resources/CBP-2",
   "@type":["http://data.parliament.uk/schema/parl#ResearchBriefing"],
   "http://purl.org/dc/terms/title":[{"@value":"Older"}],
   "http://purl.org/dc/terms/identifier":[{"@value":"CBP-2"}],
   "http://purl.org/dc/terms/date":[{"@value":"2023-05-01T00:00:00","@type":"http://www.w3.org/2001/XMLSchema#dateTime"}]},
  {"@id":"http://data.parliament.uk/resources/CBP-1",
   "@type":["http://data.parliament.uk/schema/parl#ResearchBriefing"],
   "http://purl.org/dc/terms/title":[{"@value":"Energy prices"}],
   "http://purl.org/dc/terms/identifier":[{"@value":"CBP-1"}],
   "http://purl.org/dc/terms/date":[{"@value":"2024-01-02T00:00:00","@type":"http://www.w3.org/2001/XMLSchema#dateTime"}],
   "http://data.parliament.uk/schema/parl#topic":[{"@id":"http://data.parliament.uk/terms/10"}]},
  {"@id":"http://data.parliament.uk/terms/10",
   "http://www.w3.org/2004/02/skos/core#prefLabel":[{"@value":"Energy"}]}
]"#;

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn sparql_mock(headers: HeaderMap, query: String) -> String {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()).unwrap_or_default();
    if accept == "application/sparql-results+json" {
        return r#"{"head":{"vars":["total"]},"results":{"bindings":[{"total":{"type":"literal","value":"2"}}]}}"#
            .to_owned();
    }
    let nodes: Vec<Value> = serde_json::from_str(BRIEFINGS).unwrap_or_default();
    let Some(start) = query.find("FILTER(?item = <") else {
        return BRIEFINGS.to_owned();
    };
    let requested = query[start + 16..].split('>').next().unwrap_or_default();
    let selected: Vec<&Value> = nodes
        .iter()
        .filter(|node| node["@id"] == requested || node.get("@type").is_none())
        .collect();
    if selected.iter().all(|node| node.get("@type").is_none()) {
        return "[]".to_owned();
    }
    serde_json::to_string(&selected).unwrap_or_default()
}

fn rest_mock() -> Router {
    Router::new()
        .route(
            "/api/Committees",
            get(|| async {
                Json(json!({ "items": [{ "id": 1, "name": "Treasury Committee", "house": "Commons" }], "totalResults": 41 }))
            }),
        )
        .route(
            "/api/Committees/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "1" {
                    Ok(Json(json!({ "id": 1, "name": "Treasury Committee", "purpose": "Scrutiny" })))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        )
        .route(
            "/api/Countries",
            get(|| async {
                Json(json!([
                    { "id": 3, "text": "France", "isoCode": "FR" },
                    { "id": 4, "text": "Germany", "isoCode": "DE" },
                ]))
            }),
        )
}

async fn app() -> Router {
    let sparql = spawn(Router::new().route("/sparql", post(sparql_mock))).await;
    let rest = spawn(rest_mock()).await;

    let mut config = ApiConfig::default();
    config.sparql.endpoint = format!("{sparql}/sparql");
    config.rest.base_url = Some(rest);
    let upstreams = Upstreams::from_config(&config).unwrap();
    let slice = pdl_resources::init(&config, &upstreams).unwrap();
    let state = ApiState::builder()
        .config(config)
        .upstreams(upstreams)
        .register_slice(slice)
        .build()
        .unwrap();

    let (router, _) = pdl_resources::router().split_for_parts();
    router.with_state(state)
}

async fn get_response(uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::get(uri).header(header::HOST, "api.test").body(Body::empty()).unwrap();
    let response = app().await.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(uri: &str) -> (StatusCode, HeaderMap, Value) {
    let (status, headers, body) = get_response(uri).await;
    (status, headers, serde_json::from_str(&body).unwrap())
}

#[test]
fn init_creates_slice() {
    let config = ApiConfig::default();
    let upstreams = Upstreams::from_config(&config).unwrap();
    let slice = pdl_resources::init(&config, &upstreams).expect("init should succeed");
    assert_eq!(slice.id, std::any::TypeId::of::<Resources>());
}

#[tokio::test]
async fn linked_data_list_is_sorted_and_formatted() {
    let (status, _, body) = get_json("/api/v1/research-briefings?topic=10&per_page=5").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["meta"]["per_page"], 5);
    assert_eq!(body["meta"]["total_pages"], 1);
    assert_eq!(body["meta"]["items_in_response"], 2);
    assert_eq!(body["meta"]["type"], "research_briefing");
    assert_eq!(body["meta"]["sort"], json!({ "field": "date", "order": "desc", "sortable_fields": ["date"] }));
    assert!(body["meta"].get("upstream_url").is_none());

    assert_eq!(body["links"]["self"], "http://api.test/api/v1/research-briefings?topic=10&per_page=5");
    assert_eq!(body["links"]["first"], "http://api.test/api/v1/research-briefings?page=1&per_page=5&topic=10");
    assert!(body["links"].get("next").is_none());

    assert_eq!(body["items"][0]["id"], "CBP-1");
    assert_eq!(body["items"][0]["uri"], "http://data.parliament.uk/resources/CBP-1");
    assert_eq!(body["items"][0]["date"], "2024-01-02T00:00:00");
    assert_eq!(
        body["items"][0]["topic"],
        json!([{ "id": "http://data.parliament.uk/terms/10", "label": "Energy" }])
    );
    assert_eq!(body["items"][1]["id"], "CBP-2");

    let query = body["queries"][0].as_str().unwrap();
    assert!(query.contains("FILTER (?10_term IN (<http://data.parliament.uk/terms/10>))"));
    assert!(query.contains("LIMIT 5"));
}

#[tokio::test]
async fn invalid_sort_is_a_plain_404() {
    let (status, headers, body) = get_response("/api/v1/research-briefings?sort=title").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
    assert_eq!(body, "Invalid sort field 'title'. Valid fields: date");

    let (_, _, body) = get_response("/api/v1/research-briefings?order=up").await;
    assert_eq!(body, "Invalid sort order 'up'. Valid orders: asc, desc");
}

#[tokio::test]
async fn page_overflow_is_a_plain_404() {
    let (status, _, body) = get_response("/api/v1/research-briefings?page=5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "expected :page in 1..1; got 5");
}

#[tokio::test]
async fn linked_data_show_includes_the_query() {
    let (status, _, body) = get_json("/api/v1/research-briefings/CBP-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["id"], "CBP-1");
    assert_eq!(body["meta"]["type"], "research_briefing");
    assert_eq!(body["meta"]["uri"], "http://data.parliament.uk/resources/CBP-1");
    assert_eq!(body["data"]["title"], "Energy prices");
    assert_eq!(body["data"]["topic"], json!([{ "id": "http://data.parliament.uk/terms/10", "label": "Energy" }]));
    assert!(body["queries"][0].as_str().unwrap().contains("FILTER(?item = <http://data.parliament.uk/resources/CBP-1>)"));
}

#[tokio::test]
async fn missing_items_are_plain_404s() {
    let (status, _, body) = get_response("/api/v1/research-briefings/CBP-404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Item not found");

    let (status, _, body) = get_response("/api/v1/committees/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Item not found");
}

#[tokio::test]
async fn unknown_resources_are_json_404s() {
    let (status, _, body) = get_json("/api/v1/ministers").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn rest_list_uses_the_upstream_total() {
    let (status, headers, body) = get_json("/api/v1/committees?house=Commons").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "max-age=300, public");

    assert_eq!(body["meta"]["total"], 41);
    assert_eq!(body["meta"]["total_pages"], 3);
    assert_eq!(body["meta"]["items_in_response"], 1);
    assert_eq!(body["meta"]["sort"]["field"], "name");
    assert_eq!(body["meta"]["sort"]["order"], "asc");
    let upstream = body["meta"]["upstream_url"].as_str().unwrap();
    assert!(upstream.ends_with("/api/Committees?House=Commons&CommitteeStatus=Current&Skip=0&Take=20"));
    assert!(body.get("queries").is_none());

    assert_eq!(body["items"][0]["id"], "1");
    assert_eq!(body["items"][0]["uri"], "https://committees-api.parliament.uk/api/Committees/1");
    assert_eq!(body["items"][0]["name"], "Treasury Committee");
    assert_eq!(body["links"]["next"], "http://api.test/api/v1/committees?house=Commons&page=2");
}

#[tokio::test]
async fn rest_show_reports_the_upstream_url() {
    let (status, headers, body) = get_json("/api/v1/committees/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "max-age=900, public");
    assert_eq!(body["meta"]["id"], "1");
    assert!(body["meta"]["upstream_url"].as_str().unwrap().ends_with("/api/Committees/1"));
    assert_eq!(body["data"]["purpose"], "Scrutiny");
}

#[tokio::test]
async fn array_resources_are_paged_and_searched_locally() {
    let (_, _, body) = get_json("/api/v1/countries?per_page=1&page=2").await;
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["items"], json!([{ "id": "4", "uri": "https://committees-api.parliament.uk/api/Countries/4", "name": "Germany", "iso_code": "DE" }]));

    let (status, _, body) = get_json("/api/v1/countries/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "name": "France", "iso_code": "FR" }));
    assert!(body["meta"]["upstream_url"].as_str().unwrap().ends_with("/api/Countries/3"));
}
