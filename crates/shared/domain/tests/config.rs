use pdl_domain::config::{
    ApiConfig, PaginationConfig, RestConfig, SearchConfig, SecurityConfig, ServerConfig,
    SparqlConfig,
};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 3000);
    assert!(server.ssl.is_none());
    assert!(server.public_url.is_none());

    let sparql = SparqlConfig::default();
    assert!(sparql.endpoint.ends_with("/sparql"));
    assert_eq!(sparql.terms_count_ttl_secs, 3600);

    let rest = RestConfig::default();
    assert_eq!(rest.connect_timeout_secs, 10);
    assert_eq!(rest.list_ttl_secs, 300);
    assert_eq!(rest.item_ttl_secs, 900);

    let search = SearchConfig::default();
    assert_eq!(search.index, "parliament_resources");

    let pagination = PaginationConfig::default();
    assert_eq!(pagination.default_per_page, 20);
    assert_eq!(pagination.max_per_page, 250);
}

#[test]
fn api_config_deserializes_partial_sections() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "sparql": { "endpoint": "http://localhost:7200/sparql", "subscription_key": "k" },
        "pagination": { "max_per_page": 100 }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.sparql.subscription_key, "k");
    assert_eq!(cfg.sparql.timeout_secs, 30);
    assert_eq!(cfg.pagination.max_per_page, 100);
    assert_eq!(cfg.pagination.default_per_page, 20);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn blank_api_key_disables_protection() {
    let mut security = SecurityConfig::default();
    assert_eq!(security.active_api_key(), None);

    security.api_key = Some("   ".to_owned());
    assert_eq!(security.active_api_key(), None);

    security.api_key = Some(" secret ".to_owned());
    assert_eq!(security.active_api_key(), Some("secret"));
}
