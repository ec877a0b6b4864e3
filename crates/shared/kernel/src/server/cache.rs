use axum::http::{HeaderName, HeaderValue, header};
use std::time::Duration;

/// `Cache-Control: max-age=N, public`, for the `[(name, value)]` tuple of a handler response.
#[must_use]
pub fn public_cache(max_age: Duration) -> [(HeaderName, HeaderValue); 1] {
    let value = HeaderValue::from_str(&format!("max-age={}, public", max_age.as_secs()))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"));
    [(header::CACHE_CONTROL, value)]
}

pub const LIST_MAX_AGE: Duration = Duration::from_secs(300);
pub const ITEM_MAX_AGE: Duration = Duration::from_secs(900);
