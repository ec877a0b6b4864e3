//! Optional shared-key protection for the API routes.

use super::error::ApiError;
use super::state::ApiState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use pdl_domain::constants::API_KEY_HEADER;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Rejects requests whose `X-Api-Key` does not match `security.api_key`.
/// Passes everything through while no key is configured.
///
/// # Errors
/// [`ApiError::Unauthorized`] on a missing or wrong key.
pub async fn require_api_key(
    State(state): State<ApiState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.security.active_api_key() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !keys_match(provided, expected) {
        warn!(path = %request.uri().path(), "Rejected request with invalid API key");
        return Err(ApiError::Unauthorized {});
    }

    Ok(next.run(request).await)
}

/// Constant-time comparison over fixed-length digests.
fn keys_match(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided.iter().zip(expected.iter()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}
