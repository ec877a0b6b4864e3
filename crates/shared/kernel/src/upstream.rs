//! Upstream client bundle built once from configuration and shared by every slice.

use pdl_domain::config::ApiConfig;
use pdl_elastic::{ElasticClient, ElasticError};
use pdl_rest::{RestClient, RestError};
use pdl_sparql::{SparqlClient, SparqlError};
use std::borrow::Cow;
use std::time::Duration;
use tracing::info;

#[pdl_derive::pdl_error]
pub enum UpstreamError {
    #[error("SPARQL client setup failed{}: {source}", format_context(.context))]
    Sparql { source: SparqlError, context: Option<Cow<'static, str>> },

    #[error("REST client setup failed{}: {source}", format_context(.context))]
    Rest { source: RestError, context: Option<Cow<'static, str>> },

    #[error("Elasticsearch client setup failed{}: {source}", format_context(.context))]
    Elastic { source: ElasticError, context: Option<Cow<'static, str>> },
}

/// Every outbound client. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Upstreams {
    pub sparql: SparqlClient,
    pub rest: RestClient,
    pub elastic: ElasticClient,
}

impl Upstreams {
    /// # Errors
    /// Fails when a client rejects its settings (missing SPARQL endpoint, bad search URL).
    pub fn from_config(config: &ApiConfig) -> Result<Self, UpstreamError> {
        let sparql = SparqlClient::builder()
            .endpoint(config.sparql.endpoint.as_str())
            .subscription_key(config.sparql.subscription_key.as_str())
            .timeout(Duration::from_secs(config.sparql.timeout_secs))
            .accept_invalid_certs(config.sparql.accept_invalid_certs)
            .build()?;

        let rest = RestClient::builder()
            .connect_timeout(Duration::from_secs(config.rest.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.rest.read_timeout_secs))
            .list_ttl(Duration::from_secs(config.rest.list_ttl_secs))
            .item_ttl(Duration::from_secs(config.rest.item_ttl_secs))
            .capacity(config.rest.cache_capacity)
            .build()?;

        let elastic = ElasticClient::builder()
            .url(config.search.url.as_str())
            .timeout(Duration::from_secs(config.search.timeout_secs))
            .build()?;

        info!(sparql = %sparql.endpoint(), search = %elastic.url(), "Upstream clients ready");
        Ok(Self { sparql, rest, elastic })
    }
}
