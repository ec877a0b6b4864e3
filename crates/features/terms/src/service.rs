use crate::error::{TermsError, TermsErrorExt};
use crate::term::{self, TermDetail, TermSummary};
use moka::future::Cache;
use pdl_kernel::params::parse_leading_int;
use pdl_sparql::{SelectResults, SparqlClient, binding_value};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, error};

const TOTAL_KEY: &str = "terms_total_count";

/// One page of terms.
#[derive(Debug, Clone)]
pub struct TermsPage {
    /// `None` when the count query failed.
    pub total: Option<u64>,
    pub items: Vec<TermSummary>,
    pub query: String,
}

/// Terms over the triple store, with the total count memoized.
#[derive(Debug, Clone)]
pub struct TermsService {
    client: SparqlClient,
    totals: Cache<&'static str, u64>,
}

impl TermsService {
    #[must_use]
    pub fn new(client: SparqlClient, count_ttl: Duration) -> Self {
        Self { client, totals: Cache::builder().max_capacity(1).time_to_live(count_ttl).build() }
    }

    /// Number of SES concepts; failures are not cached.
    pub async fn total(&self) -> Option<u64> {
        self.totals
            .optionally_get_with(TOTAL_KEY, async {
                debug!("Terms count cache miss");
                match self.select(term::COUNT_QUERY).await {
                    Ok(results) => {
                        let count = results.first_value("count").map_or(0, parse_leading_int);
                        Some(u64::try_from(count).unwrap_or_default())
                    },
                    Err(err) => {
                        error!(error = %err, "Terms count failed");
                        None
                    },
                }
            })
            .await
    }

    /// A page ordered by label. An upstream failure gives an empty page.
    pub async fn list(&self, page: u64, per_page: u64) -> TermsPage {
        let total = self.total().await;
        let query = term::index_query(per_page, (page - 1).saturating_mul(per_page));

        let items = match self.select(&query).await {
            Ok(results) => results.rows().map(TermSummary::from_solution).collect(),
            Err(err) => {
                error!(error = %err, "Terms list failed");
                Vec::new()
            },
        };

        TermsPage { total, items, query }
    }

    /// The concept's triples, or `None` for unknown, non-numeric or unreachable terms.
    pub async fn get(&self, id: &str) -> Option<TermDetail> {
        if !term::is_term_id(id) {
            return None;
        }
        let query = term::show_query(id);

        let results = match self.select(&query).await {
            Ok(results) => results,
            Err(err) => {
                error!(id, error = %err, "Term lookup failed");
                return None;
            },
        };

        if results.is_empty() {
            return None;
        }
        let mut data = Map::new();
        for row in results.rows() {
            if let (Some(predicate), Some(object)) = (binding_value(row, "predicate"), binding_value(row, "object")) {
                data.insert(predicate.to_owned(), Value::String(object.to_owned()));
            }
        }

        Some(TermDetail::new(id, data, query))
    }

    async fn select(&self, query: &str) -> Result<SelectResults, TermsError> {
        self.client.select(query).await.context("SELECT")
    }
}
