use axum::Router;
use axum::middleware;
use pdl::domain::constants::{
    DISCOVERY_TAG, LEGACY_TAG, RESOURCES_TAG, SEARCH_TAG, SYSTEM_TAG, TERMS_TAG,
};
use pdl::kernel::server::security::require_api_key;
use pdl::kernel::server::{ApiError, ApiState};
use pdl::server::router::{api_router, system_router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "UK Parliament Data Library API",
        description = "Parliament research briefings, deposited papers, committees and reference data as JSON."
    ),
    tags(
        (name = DISCOVERY_TAG, description = "API root and resource type documentation"),
        (name = RESOURCES_TAG, description = "Paginated resource lists and single items"),
        (name = TERMS_TAG, description = "Parliamentary thesaurus terms"),
        (name = SEARCH_TAG, description = "Full-text search"),
        (name = LEGACY_TAG, description = "Linked Data API (LDA) v0 compatibility"),
        (name = SYSTEM_TAG, description = "Liveness"),
    )
)]
struct ApiDoc;

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Full application: guarded API routes, the open `/up` probe and Scalar docs at `/api`.
pub fn init(state: ApiState) -> Router {
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(api_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .merge(system_router())
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Router::new()
        .merge(openapi_routes)
        .merge(scalar_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
