//! Facade crate for the Parliament Data Library features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `pdl` with the `server` feature.
//! - Call `pdl::init` to register feature slices and `pdl::server::router::api_router`
//!   for their routes; extend both as new slices appear.

pub use pdl_domain as domain;
#[cfg(feature = "server")]
use pdl_domain::config::ApiConfig;
pub use pdl_kernel as kernel;
#[cfg(feature = "server")]
use pdl_kernel::upstream::Upstreams;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        use pdl_kernel::server::ApiState;
        pub use pdl_kernel::server::system_router;
        use utoipa_axum::router::OpenApiRouter;

        /// Every slice's routes. Static paths (`/api/v1/terms`, `/api/v1/search`,
        /// `/api/v1/resource-types`) win over the `/api/v1/{resource}` capture.
        pub fn api_router() -> OpenApiRouter<ApiState> {
            OpenApiRouter::new()
                .merge(crate::features::discovery::router())
                .merge(crate::features::terms::router())
                .merge(crate::features::search::router())
                .merge(crate::features::legacy::router())
                .merge(crate::features::resources::router())
        }
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use pdl_discovery as discovery;
    pub use pdl_legacy as legacy;
    pub use pdl_resources as resources;
    pub use pdl_search as search;
    pub use pdl_terms as terms;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "server")]
        "discovery",
        #[cfg(feature = "server")]
        "resources",
        #[cfg(feature = "server")]
        "terms",
        #[cfg(feature = "server")]
        "search",
        #[cfg(feature = "server")]
        "legacy",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init(
    config: &ApiConfig,
    upstreams: &Upstreams,
) -> anyhow::Result<Vec<domain::registry::InitializedSlice>> {
    Ok(vec![
        features::discovery::init(config, upstreams)?,
        features::resources::init(config, upstreams)?,
        features::terms::init(config, upstreams)?,
        features::search::init(config, upstreams)?,
        features::legacy::init(config, upstreams)?,
    ])
}
