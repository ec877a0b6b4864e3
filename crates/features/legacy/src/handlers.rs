use crate::Legacy;
use crate::error::LegacyErrorExt;
use crate::lda::{self, LdaEnvelope, ListPage, RequestUrls};
use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use pdl_derive::api_handler;
use pdl_domain::constants::LEGACY_TAG;
use pdl_domain::resource::{RESEARCH_BRIEFING, SparqlSource};
use pdl_kernel::pagination::PageRequest;
use pdl_kernel::server::cache::{ITEM_MAX_AGE, LIST_MAX_AGE, public_cache};
use pdl_kernel::server::{ApiError, ApiState, RequestContext};
use pdl_resources::linked_data::{ListRequest, filter as term_filter};
use pdl_resources::sort::SortRequest;
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 500;

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(list_handler)).routes(routes!(show_handler))
}

fn briefing_source() -> Result<&'static SparqlSource, ApiError> {
    RESEARCH_BRIEFING
        .sparql()
        .ok_or_else(|| ApiError::from("research briefings are not backed by the triple store"))
}

fn urls<'a>(ctx: &'a RequestContext, original_url: &'a str) -> RequestUrls<'a> {
    RequestUrls { base_url: &ctx.base_url, path: &ctx.path, original_url }
}

#[api_handler(
    get,
    path = "/api/v0/research-briefings",
    params(
        ("_page" = Option<u64>, Query, description = "Page number, from 0"),
        ("_pageSize" = Option<u64>, Query, description = "Items per page (default 10, max 500)"),
        ("_sort" = Option<String>, Query, description = "Sortable field"),
        ("_orderBy" = Option<String>, Query, description = "`asc` or `desc`"),
        ("topic" = Option<String>, Query, description = "Term id; also subject, publisher, section, subtype, category, author"),
    ),
    responses(
        (status = OK, description = "An LDA list page", body = LdaEnvelope),
        (status = NOT_FOUND, description = "Invalid parameter or page out of range"),
    ),
    tag = LEGACY_TAG,
)]
pub(crate) async fn list_handler(
    State(state): State<ApiState>,
    ctx: RequestContext,
) -> Result<Response, ApiError> {
    let legacy = state.try_get_slice::<Legacy>()?;
    let definition = &RESEARCH_BRIEFING;

    let filter = term_filter::build(briefing_source()?, &ctx.params)?;
    let sort = SortRequest::parse(definition, &ctx.params, "_sort", "_orderBy")?;
    let page =
        PageRequest::read(&ctx.params, "_page", "_pageSize", DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, 0);

    let count = legacy.linked_data.count(definition, &filter).await;
    let window = page.paginate(count)?;

    let request =
        ListRequest { filter, offset: window.offset, limit: window.limit, all_fields: true, sort };
    let result =
        legacy.linked_data.get_items(definition, &request).await.context("Listing briefings")?;

    let items = result.items.iter().map(|item| Value::Object(lda::format_item(item))).collect();
    let position = ListPage { total: count, page: window.page - 1, page_size: window.limit };
    let original_url = ctx.original_url();
    let body = lda::list_envelope(items, position, &urls(&ctx, &original_url));

    Ok((public_cache(LIST_MAX_AGE), Json(body)).into_response())
}

#[api_handler(
    get,
    path = "/api/v0/research-briefings/{id}",
    params(("id" = String, Path, description = "Briefing identifier, e.g. `CBP-9999`")),
    responses(
        (status = OK, description = "An LDA item page", body = LdaEnvelope),
        (status = NOT_FOUND, description = "Item not found"),
    ),
    tag = LEGACY_TAG,
)]
pub(crate) async fn show_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ctx: RequestContext,
) -> Result<Response, ApiError> {
    let legacy = state.try_get_slice::<Legacy>()?;

    let result = legacy
        .linked_data
        .get_item(&RESEARCH_BRIEFING, &id)
        .await
        .context("Reading briefing")?;
    let item = result.item.ok_or_else(ApiError::item_not_found)?;

    let original_url = ctx.original_url();
    let mut formatted = lda::format_item(&item);
    formatted.insert("isPrimaryTopicOf".to_owned(), Value::String(original_url.clone()));
    let body = lda::show_envelope(formatted, &urls(&ctx, &original_url));

    Ok((public_cache(ITEM_MAX_AGE), Json(body)).into_response())
}
