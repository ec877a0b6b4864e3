use crate::Search;
use crate::query::SearchRequest;
use crate::service::SearchResponse;
use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use pdl_derive::api_handler;
use pdl_domain::constants::SEARCH_TAG;
use pdl_kernel::server::cache::{LIST_MAX_AGE, public_cache};
use pdl_kernel::server::{ApiError, ApiState, RequestContext};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(search_handler))
}

#[api_handler(
    get,
    path = "/api/v1/search",
    params(
        ("q" = String, Query, description = "Search text"),
        ("type" = Option<String>, Query, description = "`research_briefing` or `deposited_paper`"),
        ("topic" = Option<String>, Query, description = "Term id; also subject, publisher, section, subtype, category, depositing-department, corporate-author, legislature"),
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("per_page" = Option<u64>, Query, description = "Results per page (default 20, max 100)"),
    ),
    responses(
        (status = OK, description = "Ranked results", body = SearchResponse),
        (status = BAD_REQUEST, description = "Missing query"),
        (status = BAD_GATEWAY, description = "Search cluster unavailable"),
    ),
    tag = SEARCH_TAG,
)]
pub(crate) async fn search_handler(
    State(state): State<ApiState>,
    ctx: RequestContext,
) -> Result<Response, ApiError> {
    let search = state.try_get_slice::<Search>()?;
    let request = SearchRequest::from_params(&ctx.params)
        .ok_or_else(|| ApiError::bad_request("Query parameter q is required"))?;

    let results = search.service.search(&request).await?;
    Ok((public_cache(LIST_MAX_AGE), Json(results)).into_response())
}
