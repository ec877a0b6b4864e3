use axum::Json;
use axum::http::header;
use axum::response::IntoResponse;
use pdl_derive::{api_handler, api_model};
use pdl_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;

static BOOTED_AT: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Pins the uptime origin to process start rather than the first `/up` request.
pub fn mark_started() {
    LazyLock::force(&BOOTED_AT);
}

/// Liveness report
#[api_model]
struct UpResponse {
    /// `up` whenever the process answers
    status: String,
    /// Server build version
    version: String,
    /// Seconds since boot
    uptime: u64,
}

#[api_handler(
    get,
    path = "/up",
    responses((status = OK, description = "The process is serving requests", body = UpResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn up_handler() -> impl IntoResponse {
    let report = UpResponse {
        status: "up".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        uptime: BOOTED_AT.elapsed().as_secs(),
    };
    ([(header::CACHE_CONTROL, "no-store")], Json(report))
}
