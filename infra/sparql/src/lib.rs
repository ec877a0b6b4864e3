//! # SPARQL Infrastructure
//!
//! HTTP client for the Parliament triple store plus a small JSON-LD framing engine that
//! turns CONSTRUCT results into predictable, prefix-compacted node trees.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pdl_sparql::{Frame, SparqlClient, SparqlError};
//!
//! # async fn run() -> Result<(), SparqlError> {
//! let client = SparqlClient::builder()
//!     .endpoint("https://data-services.parliament.uk/sparql")
//!     .subscription_key("key")
//!     .build()?;
//!
//! let frame = Frame::new("http://data.parliament.uk/schema/parl#ResearchBriefing", [
//!     ("dc-term", "http://purl.org/dc/terms/"),
//! ]);
//! let document = client.construct("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o } LIMIT 1").await?;
//! let framed = pdl_sparql::frame(&document, &frame)?;
//! # let _ = framed;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod frame;
mod results;

pub use client::{SUBSCRIPTION_KEY_HEADER, SparqlClient, SparqlClientBuilder};
pub use error::{SparqlError, SparqlErrorExt};
pub use frame::{Frame, frame};
pub use results::{SelectResults, binding_value};
pub use sparesults::QuerySolution;
