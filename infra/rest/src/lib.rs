//! # REST Infrastructure
//!
//! A small JSON client for upstream REST APIs with two TTL cache tiers: short-lived list
//! pages and longer-lived single items. Upstream failures are logged and surface as `None`
//! from the cached accessors; they are never cached.

mod client;
mod error;

pub use client::{
    CacheTier, RestClient, RestClientBuilder, array_key, build_url, item_key, item_url, list_key,
};
pub use error::{RestError, RestErrorExt};
