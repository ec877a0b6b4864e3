//! Kernel utilities shared across slices.
//!
//! Everything a slice needs besides its own logic: layered config loading, the upstream
//! client bundle, query parameter parsing with lenient integer semantics, page window
//! pagination, the JSON item formatter and (behind `server`) the axum state, extractors,
//! error mapping and API key guard.
//!
//! ## Config loading
//! ```rust,no_run
//! use pdl_kernel::config::load_config;
//! use pdl_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server")).unwrap_or_default();
//! assert!(cfg.server.port > 0);
//! ```

pub mod config;
pub mod format;
pub mod pagination;
pub mod params;
pub mod resource;
#[cfg(feature = "server")]
pub mod server;
pub mod upstream;

pub use pdl_domain as domain;
