use crate::Resources;
use crate::linked_data::{ListRequest, filter as term_filter};
use crate::rest::filter as rest_filter;
use crate::sort::SortRequest;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use pdl_derive::{api_handler, api_model};
use pdl_domain::constants::RESOURCES_TAG;
use pdl_domain::resource::{self, ResourceDefinition, RestSource, SortOrder, Source, SparqlSource};
use pdl_kernel::format::{ItemMeta, format_index, format_show};
use pdl_kernel::pagination::{PageRequest, PageWindow};
use pdl_kernel::server::cache::{ITEM_MAX_AGE, LIST_MAX_AGE, public_cache};
use pdl_kernel::server::{ApiError, ApiState, PageLinks, RequestContext};
use serde_json::{Map, Value};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct SortMeta {
    pub field: String,
    pub order: String,
    pub sortable_fields: Vec<String>,
}

impl SortMeta {
    #[must_use]
    pub fn new(definition: &ResourceDefinition, field: &str, order: SortOrder) -> Self {
        Self {
            field: field.to_owned(),
            order: order.to_string(),
            sortable_fields: definition.sortable_fields.iter().map(|f| (*f).to_owned()).collect(),
        }
    }
}

/// `meta` block of a v1 list.
#[api_model(skip_none = true)]
#[derive(Clone, PartialEq, Eq)]
pub struct ListMeta {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub items_in_response: usize,
    #[serde(rename = "type")]
    pub kind: String,
    pub sort: SortMeta,
    /// REST resources only.
    pub upstream_url: Option<String>,
}

impl ListMeta {
    #[must_use]
    pub fn new(window: &PageWindow, definition: &ResourceDefinition, items_in_response: usize, sort: SortMeta) -> Self {
        Self {
            total: window.count,
            page: window.page,
            per_page: window.limit,
            total_pages: window.pages,
            items_in_response,
            kind: definition.type_key.to_owned(),
            sort,
            upstream_url: None,
        }
    }
}

#[api_model(skip_none = true)]
#[derive(Clone, PartialEq)]
pub struct ListResponse {
    pub meta: ListMeta,
    pub links: PageLinks,
    #[cfg_attr(feature = "server", schema(value_type = Vec<Object>))]
    pub items: Vec<Value>,
    /// SPARQL sent upstream (linked data resources only).
    pub queries: Option<Vec<String>>,
}

#[api_model(skip_none = true)]
#[derive(Clone, PartialEq)]
pub struct ShowResponse {
    pub meta: ItemMeta,
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub data: Map<String, Value>,
    pub queries: Option<Vec<String>>,
}

/// `/api/v1/{resource}` list and show routes.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(list_handler)).routes(routes!(show_handler))
}

fn find_definition(resource: &str) -> Result<&'static ResourceDefinition, ApiError> {
    resource::find(resource).ok_or_else(|| ApiError::not_found("Not found"))
}

#[api_handler(
    get,
    path = "/api/v1/{resource}",
    params(
        ("resource" = String, Path, description = "Resource type path, e.g. `research-briefings`"),
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default 20, max 250)"),
        ("fields" = Option<String>, Query, description = "`all` for every attribute"),
        ("sort" = Option<String>, Query, description = "Sortable field (linked data resources)"),
        ("order" = Option<String>, Query, description = "`asc` or `desc` (linked data resources)"),
    ),
    responses(
        (status = OK, description = "Paginated items", body = ListResponse),
        (status = NOT_FOUND, description = "Unknown resource, invalid parameter or page out of range"),
    ),
    tag = RESOURCES_TAG,
)]
pub(crate) async fn list_handler(
    State(state): State<ApiState>,
    Path(resource): Path<String>,
    ctx: RequestContext,
) -> Result<Response, ApiError> {
    let definition = find_definition(&resource)?;
    let resources = state.try_get_slice::<Resources>()?;
    let limits = state.config.pagination;
    let page = PageRequest::from_params(&ctx.params, limits.default_per_page, limits.max_per_page);

    match &definition.source {
        Source::Sparql(source) => linked_data_list(resources, definition, source, &ctx, page).await,
        Source::Rest(source) => rest_list(resources, definition, source, &ctx, page).await,
    }
}

async fn linked_data_list(
    resources: &Resources,
    definition: &'static ResourceDefinition,
    source: &SparqlSource,
    ctx: &RequestContext,
    page: PageRequest,
) -> Result<Response, ApiError> {
    let filter = term_filter::build(source, &ctx.params)?;
    let all_fields = ctx.params.get("fields") == Some("all");
    let sort = SortRequest::parse(definition, &ctx.params, "sort", "order")?;

    let count = resources.linked_data.count(definition, &filter).await;
    let window = page.paginate(count)?;

    let request = ListRequest { filter, offset: window.offset, limit: window.limit, all_fields, sort };
    let result = resources.linked_data.get_items(definition, &request).await?;

    let sort_meta = SortMeta::new(
        definition,
        sort.field_or_default(definition),
        sort.order_or_default(definition),
    );
    let body = ListResponse {
        meta: ListMeta::new(&window, definition, result.items.len(), sort_meta),
        links: ctx.pagination_links(&window),
        items: format_index(&result.items, all_fields),
        queries: Some(vec![result.query]),
    };
    Ok(Json(body).into_response())
}

async fn rest_list(
    resources: &Resources,
    definition: &'static ResourceDefinition,
    source: &RestSource,
    ctx: &RequestContext,
    page: PageRequest,
) -> Result<Response, ApiError> {
    let params = rest_filter::build(source, &ctx.params);
    let offset = (page.page - 1).saturating_mul(page.per_page);
    let all_fields = ctx.params.get("fields") == Some("all");

    let result = resources.rest.get_items(definition, params, page.per_page, offset).await?;
    let window = page.paginate(result.total)?;

    let sort_meta = SortMeta::new(definition, definition.sort_field, definition.sort_order);
    let mut meta = ListMeta::new(&window, definition, result.items.len(), sort_meta);
    meta.upstream_url = Some(result.url);

    let body = ListResponse {
        meta,
        links: ctx.pagination_links(&window),
        items: format_index(&result.items, all_fields),
        queries: None,
    };
    Ok((public_cache(LIST_MAX_AGE), Json(body)).into_response())
}

#[api_handler(
    get,
    path = "/api/v1/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Resource type path"),
        ("id" = String, Path, description = "Item id"),
    ),
    responses(
        (status = OK, description = "A single item", body = ShowResponse),
        (status = NOT_FOUND, description = "Unknown resource or item"),
    ),
    tag = RESOURCES_TAG,
)]
pub(crate) async fn show_handler(
    State(state): State<ApiState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let definition = find_definition(&resource)?;
    let resources = state.try_get_slice::<Resources>()?;

    if definition.sparql().is_some() {
        let result = resources.linked_data.get_item(definition, &id).await?;
        let item = result.item.ok_or_else(ApiError::item_not_found)?;
        let document = format_show(&item);
        let body = ShowResponse {
            meta: document.meta,
            data: document.data,
            queries: Some(vec![result.query]),
        };
        return Ok(Json(body).into_response());
    }

    let result = resources.rest.get_item(definition, &id).await?;
    let item = result.item.ok_or_else(ApiError::item_not_found)?;
    let mut document = format_show(&item);
    document.meta.upstream_url = Some(result.url);
    let body = ShowResponse { meta: document.meta, data: document.data, queries: None };
    Ok((public_cache(ITEM_MAX_AGE), Json(body)).into_response())
}
