//! Search request parsing and the Elasticsearch query body.

use pdl_kernel::params::QueryParams;
use serde_json::{Value, json};

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// Taxonomy filter parameters and the keyword fields they match.
pub const FILTER_FIELDS: &[(&str, &str)] = &[
    ("topic", "topic_ids"),
    ("subject", "subject_ids"),
    ("publisher", "publisher_ids"),
    ("section", "section_ids"),
    ("subtype", "subtype_ids"),
    ("category", "category_ids"),
    ("depositing-department", "depositing_department_ids"),
    ("corporate-author", "corporate_author_ids"),
    ("legislature", "legislature_ids"),
];

const SEARCH_FIELDS: [&str; 7] =
    ["title^3", "description^1.5", "identifier.text", "summary", "topics", "subjects", "publisher"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed, never blank.
    pub query: String,
    pub resource_type: Option<String>,
    /// `(keyword field, term id)` in [`FILTER_FIELDS`] order.
    pub filters: Vec<(&'static str, String)>,
    pub page: u64,
    pub per_page: u64,
}

impl SearchRequest {
    /// `None` when `q` is missing or blank.
    #[must_use]
    pub fn from_params(params: &QueryParams) -> Option<Self> {
        let query = params.get("q").map(str::trim).filter(|q| !q.is_empty())?.to_owned();

        let page = u64::try_from(params.int("page").unwrap_or(0).max(1)).unwrap_or(1);
        let per_page = params.present("per_page").map_or(DEFAULT_PER_PAGE, |_| {
            let requested = params.int("per_page").unwrap_or(0);
            requested.clamp(1, MAX_PER_PAGE.cast_signed()).cast_unsigned()
        });

        let filters = FILTER_FIELDS
            .iter()
            .filter_map(|(param, field)| params.present(param).map(|id| (*field, id.to_owned())))
            .collect();

        Some(Self {
            query,
            resource_type: params.present("type").map(str::to_owned),
            filters,
            page,
            per_page,
        })
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// The `_search` body: fuzzy multi-field match, optional filters, highlights and
    /// score-then-date ordering.
    #[must_use]
    pub fn body(&self) -> Value {
        json!({
            "from": self.offset(),
            "size": self.per_page,
            "query": self.query_clause(),
            "highlight": {
                "fields": {
                    "title": { "number_of_fragments": 0 },
                    "description": { "fragment_size": 200, "number_of_fragments": 1 },
                    "summary": { "fragment_size": 200, "number_of_fragments": 1 },
                    "topics": { "number_of_fragments": 0 },
                    "subjects": { "number_of_fragments": 0 },
                },
                "pre_tags": ["<em>"],
                "post_tags": ["</em>"],
            },
            "sort": [
                { "_score": "desc" },
                { "date": { "order": "desc", "unmapped_type": "date" } },
            ],
        })
    }

    fn query_clause(&self) -> Value {
        let matcher = json!({
            "multi_match": {
                "query": self.query,
                "fields": SEARCH_FIELDS,
                "type": "best_fields",
                "fuzziness": "AUTO",
            }
        });

        let filters: Vec<Value> = self
            .resource_type
            .iter()
            .map(|kind| json!({ "term": { "resource_type": kind } }))
            .chain(self.filters.iter().map(|(field, id)| json!({ "term": { (*field): id } })))
            .collect();

        if filters.is_empty() {
            matcher
        } else {
            json!({ "bool": { "must": matcher, "filter": filters } })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: &str) -> Option<SearchRequest> {
        SearchRequest::from_params(&QueryParams::parse(query))
    }

    #[test]
    fn query_is_required_and_trimmed() {
        assert_eq!(request("q=%20%20"), None);
        assert_eq!(request("page=2"), None);
        assert_eq!(request("q=+energy+").map(|r| r.query), Some("energy".to_owned()));
    }

    #[test]
    fn paging_is_clamped() {
        let defaults = request("q=x").unwrap();
        assert_eq!((defaults.page, defaults.per_page, defaults.offset()), (1, 20, 0));

        let clamped = request("q=x&page=3&per_page=500").unwrap();
        assert_eq!((clamped.page, clamped.per_page, clamped.offset()), (3, 100, 200));

        let low = request("q=x&page=-1&per_page=0").unwrap();
        assert_eq!((low.page, low.per_page), (1, 1));
    }

    #[test]
    fn plain_queries_are_a_bare_multi_match() {
        let body = request("q=energy").unwrap().body();
        assert_eq!(body["query"]["multi_match"]["query"], "energy");
        assert_eq!(body["query"]["multi_match"]["fuzziness"], "AUTO");
        assert_eq!(body["query"]["multi_match"]["fields"][0], "title^3");
        assert_eq!(body["sort"][1]["date"]["unmapped_type"], "date");
        assert_eq!(body["highlight"]["pre_tags"], json!(["<em>"]));
    }

    #[test]
    fn filters_wrap_the_match_in_a_bool_query() {
        let body = request("q=energy&legislature=2&type=deposited_paper&topic=10&colour=red")
            .unwrap()
            .body();
        assert_eq!(body["query"]["bool"]["must"]["multi_match"]["query"], "energy");
        assert_eq!(
            body["query"]["bool"]["filter"],
            json!([
                { "term": { "resource_type": "deposited_paper" } },
                { "term": { "topic_ids": "10" } },
                { "term": { "legislature_ids": "2" } },
            ])
        );
    }
}
