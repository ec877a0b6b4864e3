//! Resources feature slice: paginated lists and single items of every catalog resource
//! under `/api/v1/{resource}`, read from the triple store or an upstream REST API.

mod error;
#[cfg(feature = "server")]
mod handlers;
pub mod linked_data;
pub mod rest;
pub mod sort;

pub use error::{ResourcesError, ResourcesErrorExt};
#[cfg(feature = "server")]
pub use handlers::{ListMeta, ListResponse, ShowResponse, SortMeta, router};

use linked_data::LinkedDataService;
use rest::RestService;
#[cfg(feature = "server")]
use pdl_kernel::{
    domain::{config::ApiConfig, registry::InitializedSlice},
    upstream::Upstreams,
};

/// Resources feature state
#[pdl_derive::pdl_slice]
pub struct Resources {
    pub linked_data: LinkedDataService,
    pub rest: RestService,
}

/// Initialize the resources feature: query templates plus the upstream services.
///
/// # Errors
/// Reserved for upstream wiring failures; template generation itself cannot fail.
#[cfg(feature = "server")]
pub fn init(config: &ApiConfig, upstreams: &Upstreams) -> Result<InitializedSlice, ResourcesError> {
    let inner = ResourcesInner {
        linked_data: LinkedDataService::new(upstreams.sparql.clone()),
        rest: RestService::new(upstreams.rest.clone(), config.rest.base_url.clone()),
    };

    tracing::info!("Resources server slice initialized");

    Ok(InitializedSlice::new(Resources::new(inner)))
}
