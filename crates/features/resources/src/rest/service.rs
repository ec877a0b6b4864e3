use crate::error::ResourcesError;
use pdl_domain::resource::{ResourceDefinition, ResponseFormat, RestSource};
use pdl_kernel::resource::ResourceItem;
use pdl_rest::{CacheTier, RestClient, array_key, build_url, item_key, item_url, list_key};
use serde_json::Value;
use tracing::debug;

/// One page of upstream items.
#[derive(Debug, Clone)]
pub struct RestItems {
    pub items: Vec<ResourceItem>,
    pub total: u64,
    /// The upstream URL the page was read from.
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct RestItem {
    pub item: Option<ResourceItem>,
    pub url: String,
}

/// List and show over the upstream REST APIs, cached by [`RestClient`].
#[derive(Debug, Clone)]
pub struct RestService {
    client: RestClient,
    base_url: Option<String>,
}

impl RestService {
    /// `base_url` replaces every resource's built-in upstream base when set.
    #[must_use]
    pub fn new(client: RestClient, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|base| base.trim().trim_end_matches('/').to_owned())
            .filter(|base| !base.is_empty());
        Self { client, base_url }
    }

    fn base<'a>(&'a self, source: &'a RestSource) -> &'a str {
        self.base_url.as_deref().unwrap_or(source.base_url)
    }

    /// Collections are paged upstream with `Skip`/`Take`; arrays are fetched whole and
    /// paged here.
    ///
    /// # Errors
    /// [`ResourcesError::Rest`] when the upstream URL cannot be built,
    /// [`ResourcesError::Internal`] for linked data resources.
    pub async fn get_items(
        &self,
        definition: &'static ResourceDefinition,
        mut params: Vec<(&'static str, String)>,
        limit: u64,
        offset: u64,
    ) -> Result<RestItems, ResourcesError> {
        let source = rest_source(definition)?;
        if source.format == ResponseFormat::Collection {
            params.push(("Skip", offset.to_string()));
            params.push(("Take", limit.to_string()));
        }

        let url = build_url(self.base(source), source.api_path, &params)?;
        let key = list_key(definition.type_key, &url);
        debug!(resource = definition.type_key, %url, "Fetching REST items");

        let Some(body) = self.client.get_cached(CacheTier::List, key, &url).await else {
            return Ok(RestItems { items: Vec::new(), total: 0, url: url.into() });
        };

        let (raw, reported_total) = match (source.format, body.as_ref()) {
            (ResponseFormat::Array, Value::Array(items)) => (items.as_slice(), None),
            (ResponseFormat::Collection, body) => (
                body.get("items").and_then(Value::as_array).map_or(&[][..], Vec::as_slice),
                body.get("totalResults").and_then(Value::as_u64),
            ),
            (ResponseFormat::Array, _) => (&[][..], None),
        };
        let items = instantiate(raw, definition, source.id_field);

        let result = match source.format {
            ResponseFormat::Collection => {
                let total = reported_total.unwrap_or(items.len() as u64);
                RestItems { items, total, url: url.into() }
            },
            ResponseFormat::Array => {
                let total = items.len() as u64;
                let offset = usize::try_from(offset).unwrap_or(usize::MAX);
                let limit = usize::try_from(limit).unwrap_or(usize::MAX);
                let page = items.into_iter().skip(offset).take(limit).collect();
                RestItems { items: page, total, url: url.into() }
            },
        };
        Ok(result)
    }

    /// A single item: `GET {base}{path}/{id}` for collections, a lookup in the cached full
    /// array otherwise.
    ///
    /// # Errors
    /// Same as [`Self::get_items`].
    pub async fn get_item(
        &self,
        definition: &'static ResourceDefinition,
        id: &str,
    ) -> Result<RestItem, ResourcesError> {
        let source = rest_source(definition)?;
        let base = self.base(source);
        let url = item_url(base, source.api_path, id)?;

        if source.format == ResponseFormat::Array {
            let list_url = build_url(base, source.api_path, &[])?;
            let cached = self.client.get_cached(CacheTier::Item, array_key(definition.type_key), &list_url).await;
            let item = cached.as_deref().and_then(Value::as_array).and_then(|items| {
                items
                    .iter()
                    .find(|data| data.get(source.id_field).and_then(id_text).as_deref() == Some(id))
                    .and_then(|data| instantiate(std::slice::from_ref(data), definition, source.id_field).pop())
            });
            return Ok(RestItem { item, url: url.into() });
        }

        let key = item_key(definition.type_key, id);
        let item = self.client.get_cached(CacheTier::Item, key, &url).await.and_then(|body| {
            let data = body.as_object()?.clone();
            let id = data.get(source.id_field).and_then(id_text).unwrap_or_default();
            Some(ResourceItem::new(id, data, definition))
        });
        Ok(RestItem { item, url: url.into() })
    }
}

fn rest_source(definition: &ResourceDefinition) -> Result<&RestSource, ResourcesError> {
    definition.rest().ok_or_else(|| ResourcesError::Internal {
        message: format!("{} is not a REST resource", definition.type_key).into(),
        context: None,
    })
}

/// Objects with an id become items; the id is stringified.
fn instantiate(
    raw: &[Value],
    definition: &'static ResourceDefinition,
    id_field: &str,
) -> Vec<ResourceItem> {
    raw.iter()
        .filter_map(|value| {
            let data = value.as_object()?;
            let id = data.get(id_field).and_then(id_text)?;
            Some(ResourceItem::new(id, data.clone(), definition))
        })
        .collect()
}

/// `null` and `false` are not ids; everything else is its display form.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
