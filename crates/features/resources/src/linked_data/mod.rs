//! Resources backed by the Parliament triple store.

pub mod filter;
pub mod query;
mod service;

pub use query::{ListRequest, QueryTemplates, count_query};
pub use service::{ItemResult, ItemsResult, LinkedDataService};
