//! axum plumbing shared by every slice router.

pub mod cache;
mod context;
mod error;
mod health;
mod router;
pub mod security;
mod state;

pub use context::{PageLinks, RequestContext, cgi_escape};
pub use error::{ApiError, ApiErrorExt};
pub use health::mark_started;
pub use router::system_router;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
