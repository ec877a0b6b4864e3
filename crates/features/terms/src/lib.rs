//! Terms feature slice: the SES thesaurus concepts used to filter resources.

mod error;
#[cfg(feature = "server")]
mod handlers;
mod service;
pub mod term;

pub use error::{TermsError, TermsErrorExt};
#[cfg(feature = "server")]
pub use handlers::{TermsMeta, TermsResponse, router};
pub use service::{TermsPage, TermsService};

#[cfg(feature = "server")]
use pdl_kernel::{
    domain::{config::ApiConfig, registry::InitializedSlice},
    upstream::Upstreams,
};

/// Terms feature state
#[pdl_derive::pdl_slice]
pub struct Terms {
    pub service: TermsService,
}

/// Initialize the terms feature.
///
/// # Errors
/// Never fails today; the signature matches the other slices.
#[cfg(feature = "server")]
pub fn init(config: &ApiConfig, upstreams: &Upstreams) -> Result<InitializedSlice, TermsError> {
    let ttl = std::time::Duration::from_secs(config.sparql.terms_count_ttl_secs);
    let inner = TermsInner { service: TermsService::new(upstreams.sparql.clone(), ttl) };

    tracing::info!("Terms server slice initialized");

    Ok(InitializedSlice::new(Terms::new(inner)))
}
