use crate::error::{SearchError, SearchErrorExt};
use crate::query::SearchRequest;
use pdl_derive::api_model;
use pdl_elastic::ElasticClient;
use serde_json::{Map, Value};
use tracing::debug;

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct SearchMeta {
    pub total_count: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub query: String,
}

/// One ranked document.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct SearchHit {
    pub id: Option<String>,
    pub resource_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub identifier: Option<String>,
    pub date: Option<String>,
    pub score: Option<f64>,
    /// Field name to highlighted fragments.
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub highlight: Map<String, Value>,
}

#[api_model]
#[derive(Clone, PartialEq)]
pub struct SearchResponse {
    pub meta: SearchMeta,
    pub items: Vec<SearchHit>,
}

impl SearchResponse {
    /// Reshapes a raw `_search` answer.
    #[must_use]
    pub fn from_hits(response: &Value, request: &SearchRequest) -> Self {
        let total = response.pointer("/hits/total/value").and_then(Value::as_u64).unwrap_or(0);
        let items = response
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .map(|hits| hits.iter().map(SearchHit::from_hit).collect())
            .unwrap_or_default();

        Self {
            meta: SearchMeta {
                total_count: total,
                page: request.page,
                per_page: request.per_page,
                total_pages: total.div_ceil(request.per_page),
                query: request.query.clone(),
            },
            items,
        }
    }
}

impl SearchHit {
    fn from_hit(hit: &Value) -> Self {
        let source = |field: &str| {
            hit.get("_source").and_then(|source| source.get(field)).and_then(Value::as_str).map(str::to_owned)
        };
        Self {
            id: source("resource_id"),
            resource_type: source("resource_type"),
            title: source("title"),
            description: source("description"),
            identifier: source("identifier"),
            date: source("date"),
            score: hit.get("_score").and_then(Value::as_f64),
            highlight: hit.get("highlight").and_then(Value::as_object).cloned().unwrap_or_default(),
        }
    }
}

/// Full-text search over the resource index.
#[derive(Debug, Clone)]
pub struct SearchService {
    client: ElasticClient,
    index: String,
}

impl SearchService {
    #[must_use]
    pub fn new(client: ElasticClient, index: impl Into<String>) -> Self {
        Self { client, index: index.into() }
    }

    /// # Errors
    /// [`SearchError::Elastic`] when the cluster is unreachable or rejects the query.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        debug!(query = %request.query, page = request.page, "Searching resources");
        let response =
            self.client.search(&self.index, &request.body()).await.context("Searching resources")?;
        Ok(SearchResponse::from_hits(&response, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdl_kernel::params::QueryParams;
    use serde_json::json;

    #[test]
    fn hits_are_reshaped_with_page_arithmetic() {
        let request = SearchRequest::from_params(&QueryParams::parse("q=energy&per_page=2")).unwrap();
        let response = json!({
            "hits": {
                "total": { "value": 5, "relation": "eq" },
                "hits": [{
                    "_score": 7.5,
                    "_source": {
                        "resource_id": "CBP-1",
                        "resource_type": "research_briefing",
                        "title": "Energy prices",
                        "date": "2024-01-02",
                    },
                    "highlight": { "title": ["<em>Energy</em> prices"] },
                }],
            },
        });

        let result = SearchResponse::from_hits(&response, &request);
        assert_eq!(result.meta.total_count, 5);
        assert_eq!(result.meta.total_pages, 3);
        assert_eq!(result.meta.query, "energy");

        let rendered = serde_json::to_value(&result.items[0]).unwrap();
        assert_eq!(
            rendered,
            json!({
                "id": "CBP-1",
                "resource_type": "research_briefing",
                "title": "Energy prices",
                "description": null,
                "identifier": null,
                "date": "2024-01-02",
                "score": 7.5,
                "highlight": { "title": ["<em>Energy</em> prices"] },
            })
        );
    }

    #[test]
    fn missing_hits_mean_no_results() {
        let request = SearchRequest::from_params(&QueryParams::parse("q=x")).unwrap();
        let result = SearchResponse::from_hits(&json!({}), &request);
        assert_eq!(result.meta.total_count, 0);
        assert_eq!(result.meta.total_pages, 0);
        assert!(result.items.is_empty());
    }
}
