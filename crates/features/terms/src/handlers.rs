use crate::Terms;
use crate::term::{TermDetail, TermSummary};
use axum::Json;
use axum::extract::{Path, State};
use pdl_derive::{api_handler, api_model};
use pdl_domain::constants::TERMS_TAG;
use pdl_kernel::params::QueryParams;
use pdl_kernel::server::{ApiError, ApiState, RequestContext};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 250;

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TermsMeta {
    pub total: Option<u64>,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: Option<u64>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct TermsResponse {
    pub meta: TermsMeta,
    pub items: Vec<TermSummary>,
    pub queries: Vec<String>,
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(list_handler)).routes(routes!(show_handler))
}

/// `page` at least 1; `per_page` clamped to 1..=250, 20 when blank.
fn page_params(params: &QueryParams) -> (u64, u64) {
    let page = u64::try_from(params.int("page").unwrap_or(0).max(1)).unwrap_or(1);
    let per_page = params.present("per_page").map_or(DEFAULT_PER_PAGE, |_| {
        let requested = params.int("per_page").unwrap_or(0).clamp(1, MAX_PER_PAGE.cast_signed());
        requested.cast_unsigned()
    });
    (page, per_page)
}

#[api_handler(
    get,
    path = "/api/v1/terms",
    params(
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("per_page" = Option<u64>, Query, description = "Terms per page (default 20, max 250)"),
    ),
    responses((status = OK, description = "Thesaurus terms ordered by label", body = TermsResponse)),
    tag = TERMS_TAG,
)]
pub(crate) async fn list_handler(
    State(state): State<ApiState>,
    ctx: RequestContext,
) -> Result<Json<TermsResponse>, ApiError> {
    let terms = state.try_get_slice::<Terms>()?;
    let (page, per_page) = page_params(&ctx.params);

    let result = terms.service.list(page, per_page).await;
    let meta = TermsMeta {
        total: result.total,
        page,
        per_page,
        total_pages: result.total.map(|total| total.div_ceil(per_page)),
    };

    Ok(Json(TermsResponse { meta, items: result.items, queries: vec![result.query] }))
}

#[api_handler(
    get,
    path = "/api/v1/terms/{id}",
    params(("id" = String, Path, description = "Numeric SES term id")),
    responses(
        (status = OK, description = "A single term", body = TermDetail),
        (status = NOT_FOUND, description = "Term not found"),
    ),
    tag = TERMS_TAG,
)]
pub(crate) async fn show_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<TermDetail>, ApiError> {
    let terms = state.try_get_slice::<Terms>()?;
    terms.service.get(&id).await.map(Json).ok_or_else(|| ApiError::not_found("Term not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(query: &str) -> (u64, u64) {
        page_params(&QueryParams::parse(query))
    }

    #[test]
    fn page_parameters_follow_integer_coercion() {
        assert_eq!(read(""), (1, 20));
        assert_eq!(read("page=3&per_page=50"), (3, 50));
        assert_eq!(read("page=-2&per_page=0"), (1, 1));
        assert_eq!(read("per_page=abc"), (1, 1));
        assert_eq!(read("per_page=%20"), (1, 20));
        assert_eq!(read("per_page=1000"), (1, 250));
    }
}
