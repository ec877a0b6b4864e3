//! Legacy feature slice: `/api/v0/research-briefings` in the Linked Data API (LDA) format
//! served by the previous platform.

mod error;
#[cfg(feature = "server")]
mod handlers;
pub mod lda;

pub use error::{LegacyError, LegacyErrorExt};
#[cfg(feature = "server")]
pub use handlers::router;

use pdl_resources::linked_data::LinkedDataService;
#[cfg(feature = "server")]
use pdl_kernel::{
    domain::{config::ApiConfig, registry::InitializedSlice},
    upstream::Upstreams,
};

/// Legacy feature state
#[pdl_derive::pdl_slice]
pub struct Legacy {
    pub linked_data: LinkedDataService,
}

/// Initialize the legacy feature.
///
/// # Errors
/// Never fails today; the signature matches the other slices.
#[cfg(feature = "server")]
pub fn init(_config: &ApiConfig, upstreams: &Upstreams) -> Result<InitializedSlice, LegacyError> {
    let inner = LegacyInner { linked_data: LinkedDataService::new(upstreams.sparql.clone()) };

    tracing::info!("Legacy server slice initialized");

    Ok(InitializedSlice::new(Legacy::new(inner)))
}
