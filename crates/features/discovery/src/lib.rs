//! Discovery feature slice: the API root, the `/api/v1` overview and per-type documentation.

pub mod docs;
mod error;
#[cfg(feature = "server")]
mod handlers;

pub use error::{DiscoveryError, DiscoveryErrorExt};
#[cfg(feature = "server")]
pub use handlers::router;

use pdl_domain::config::PaginationConfig;
#[cfg(feature = "server")]
use pdl_kernel::{
    domain::{config::ApiConfig, registry::InitializedSlice},
    upstream::Upstreams,
};

/// Discovery feature state
#[pdl_derive::pdl_slice]
pub struct Discovery {
    /// Page size limits quoted in the parameter documentation.
    pub pagination: PaginationConfig,
}

/// Initialize the discovery feature.
///
/// # Errors
/// Never fails today; the signature matches the other slices.
#[cfg(feature = "server")]
pub fn init(config: &ApiConfig, _upstreams: &Upstreams) -> Result<InitializedSlice, DiscoveryError> {
    let inner = DiscoveryInner { pagination: config.pagination };

    tracing::info!("Discovery server slice initialized");

    Ok(InitializedSlice::new(Discovery::new(inner)))
}
