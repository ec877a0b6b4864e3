//! Search feature slice: full-text search over the Elasticsearch resource index, plus the
//! [`SearchIndexer`] that builds that index from the triple store.

mod error;
#[cfg(feature = "server")]
mod handlers;
pub mod indexer;
pub mod query;
mod service;

pub use error::{SearchError, SearchErrorExt};
#[cfg(feature = "server")]
pub use handlers::router;
pub use indexer::SearchIndexer;
pub use service::{SearchHit, SearchMeta, SearchResponse, SearchService};

#[cfg(feature = "server")]
use pdl_kernel::{
    domain::{config::ApiConfig, registry::InitializedSlice},
    upstream::Upstreams,
};

/// Search feature state
#[pdl_derive::pdl_slice]
pub struct Search {
    pub service: SearchService,
}

/// Initialize the search feature against the configured index.
///
/// # Errors
/// Never fails today; the signature matches the other slices.
#[cfg(feature = "server")]
pub fn init(config: &ApiConfig, upstreams: &Upstreams) -> Result<InitializedSlice, SearchError> {
    let inner = SearchInner {
        service: SearchService::new(upstreams.elastic.clone(), config.search.index.as_str()),
    };

    tracing::info!(index = %config.search.index, "Search server slice initialized");

    Ok(InitializedSlice::new(Search::new(inner)))
}
