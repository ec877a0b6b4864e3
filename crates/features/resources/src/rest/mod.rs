//! Resources proxied from upstream REST APIs.

pub mod filter;
mod service;

pub use service::{RestItem, RestItems, RestService};
