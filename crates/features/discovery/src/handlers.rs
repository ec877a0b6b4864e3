use crate::Discovery;
use crate::docs::{self, ApiOverview, HomeResponse, ResourceTypeDoc, ResourceTypeList};
use axum::Json;
use axum::extract::{Path, State};
use pdl_derive::api_handler;
use pdl_domain::constants::DISCOVERY_TAG;
use pdl_kernel::server::{ApiError, ApiState, RequestContext};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(home_handler))
        .routes(routes!(overview_handler))
        .routes(routes!(resource_types_handler))
        .routes(routes!(resource_type_handler))
}

#[api_handler(
    get,
    path = "/",
    responses((status = OK, description = "API name and versioned root", body = HomeResponse)),
    tag = DISCOVERY_TAG,
)]
pub(crate) async fn home_handler(ctx: RequestContext) -> Json<HomeResponse> {
    Json(docs::home(&ctx.base_url))
}

#[api_handler(
    get,
    path = "/api/v1",
    responses((status = OK, description = "Endpoints, parameters and filters", body = ApiOverview)),
    tag = DISCOVERY_TAG,
)]
pub(crate) async fn overview_handler(
    State(state): State<ApiState>,
    ctx: RequestContext,
) -> Result<Json<ApiOverview>, ApiError> {
    let discovery = state.try_get_slice::<Discovery>()?;
    Ok(Json(docs::overview(&ctx.base_url, &discovery.pagination)))
}

#[api_handler(
    get,
    path = "/api/v1/resource-types",
    responses((status = OK, description = "Every resource type", body = ResourceTypeList)),
    tag = DISCOVERY_TAG,
)]
pub(crate) async fn resource_types_handler(ctx: RequestContext) -> Json<ResourceTypeList> {
    Json(docs::resource_types(&ctx.base_url))
}

#[api_handler(
    get,
    path = "/api/v1/resource-types/{id}",
    params(("id" = String, Path, description = "Resource path, e.g. `research-briefings`")),
    responses(
        (status = OK, description = "Fields, filters and an example response", body = ResourceTypeDoc),
        (status = NOT_FOUND, description = "Unknown resource type"),
    ),
    tag = DISCOVERY_TAG,
)]
pub(crate) async fn resource_type_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ctx: RequestContext,
) -> Result<Json<ResourceTypeDoc>, ApiError> {
    let discovery = state.try_get_slice::<Discovery>()?;
    Ok(Json(docs::resource_type(&ctx.base_url, &id, &discovery.pagination)?))
}
