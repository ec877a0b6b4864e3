use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::routing::post;
use http_body_util::BodyExt;
use pdl_kernel::domain::config::ApiConfig;
use pdl_kernel::server::ApiState;
use pdl_kernel::upstream::Upstreams;
use pdl_legacy::Legacy;
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
   "http://data.parliament.uk/schema/parl#topic":[{"@id":"http://data.parliament.uk/terms/10"}],
   "http://data.parliament.uk/schema/parl#relatedLink":[{"@id":"_:l1"},{"@id":"_:l2"}]},
  {"@id":"_:l1",
   "http://schema.org/url":[{"@value":"https://www.ofgem.gov.uk"}],
   "http://www.w3.org/2000/01/rdf-schema#label":[{"@value":"Ofgem price cap"}]},
  {"@id":"_:l2",
   "http://schema.org/url":[{"@value":"https://www.ons.gov.uk"}],
   "http://www.w3.org/2000/01/rdf-schema#label":[{"@value":"Consumer price inflation"}]},
  {"@id":"http://data.parliament.uk/terms/10",
   "http://www.w3.org/2004/02/skos/core#prefLabel":[{"@value":"Energy"}]}
]"#;

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/sparql")
}

/// Counts report 25 items; show queries only see the requested briefing.
async fn sparql_mock(headers: HeaderMap, query: String) -> String {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()).unwrap_or_default();
    if accept == "application/sparql-results+json" {
        return r#"{"head":{"vars":["total"]},"results":{"bindings":[{"total":{"type":"literal","value":"25"}}]}}"#
            .to_owned();
    }
    let Some(start) = query.find("FILTER(?item = <") else {
        return BRIEFINGS.to_owned();
    };
    let requested = query[start + 16..].split('>').next().unwrap_or_default();
    let nodes: Vec<Value> = serde_json::from_str(BRIEFINGS).unwrap_or_default();
    let selected: Vec<&Value> = nodes
        .iter()
        .filter(|node| node["@id"] == requested || node.get("@type").is_none())
        .collect();
    if selected.iter().all(|node| node.get("@type").is_none()) {
        return "[]".to_owned();
    }
    serde_json::to_string(&selected).unwrap_or_default()
}

async fn app() -> Router {
    let mut config = ApiConfig::default();
    config.sparql.endpoint = spawn(Router::new().route("/sparql", post(sparql_mock))).await;
    let upstreams = Upstreams::from_config(&config).unwrap();
    let slice = pdl_legacy::init(&config, &upstreams).unwrap();
    let state = ApiState::builder()
        .config(config)
        .upstreams(upstreams)
        .register_slice(slice)
        .build()
        .unwrap();

    let (router, _) = pdl_legacy::router().split_for_parts();
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
    let slice = pdl_legacy::init(&config, &upstreams).expect("init should succeed");
    assert_eq!(slice.id, std::any::TypeId::of::<Legacy>());
}

#[tokio::test]
async fn list_uses_the_lda_envelope() {
    let (status, headers, body) = get_json("/api/v0/research-briefings?_page=1&_pageSize=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "max-age=300, public");
    assert_eq!(body["format"], "linked-data-api");
    assert_eq!(body["version"], "0.2");

    let result = &body["result"];
    assert_eq!(result["_about"], "http://api.test/api/v0/research-briefings?_page=1&_pageSize=10");
    assert_eq!(result["page"], 1);
    assert_eq!(result["itemsPerPage"], 10);
    assert_eq!(result["startIndex"], 11);
    assert_eq!(result["totalResults"], 25);
    assert_eq!(result["next"], "http://api.test/api/v0/research-briefings?_page=2");
    assert_eq!(result["prev"], "http://api.test/api/v0/research-briefings?_page=0");

    let first = &result["items"][0];
    assert_eq!(first["_about"], "http://data.parliament.uk/resources/CBP-1");
    assert_eq!(first["title"], "Energy prices");
    assert_eq!(first["identifier"], json!({ "_value": "CBP-1" }));
    assert_eq!(first["date"], json!({ "_value": "2024-01-02T00:00:00", "_datatype": "dateTime" }));
    assert_eq!(
        first["topic"],
        json!({ "_about": "http://data.parliament.uk/terms/10", "prefLabel": { "_value": "Energy" } })
    );
    assert_eq!(first["type"], "http://data.parliament.uk/schema/parl#ResearchBriefing");
    assert_eq!(result["items"][1]["_about"], "http://data.parliament.uk/resources/CBP-2");
}

#[tokio::test]
async fn lda_parameters_are_validated() {
    let (status, _, body) = get_response("/api/v0/research-briefings?_sort=title").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Invalid sort field 'title'. Valid fields: date");

    let (status, _, body) = get_response("/api/v0/research-briefings?_page=3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "expected :page in 1..3; got 4");
}

#[tokio::test]
async fn show_marks_the_primary_topic() {
    let (status, headers, body) = get_json("/api/v0/research-briefings/CBP-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "max-age=900, public");

    let result = &body["result"];
    assert_eq!(result["extendedMetadataVersion"], "http://api.test/api/v0/research-briefings/CBP-1?_metadata=all");
    assert_eq!(result["primaryTopic"]["identifier"], json!({ "_value": "CBP-1" }));
    assert_eq!(result["primaryTopic"]["isPrimaryTopicOf"], "http://api.test/api/v0/research-briefings/CBP-1");
    assert_eq!(
        result["primaryTopic"]["relatedLink"],
        json!([
            {
                "_about": null,
                "website": { "_value": "https://www.ofgem.gov.uk" },
                "label": { "_value": "Ofgem price cap" },
            },
            {
                "_about": null,
                "website": { "_value": "https://www.ons.gov.uk" },
                "label": { "_value": "Consumer price inflation" },
            },
        ])
    );
    assert_eq!(
        result["type"],
        json!(["http://purl.org/linked-data/api/vocab#ItemEndpoint", "http://purl.org/linked-data/api/vocab#Page"])
    );
}

#[tokio::test]
async fn missing_briefings_are_plain_404s() {
    let (status, _, body) = get_response("/api/v0/research-briefings/CBP-404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Item not found");
}
