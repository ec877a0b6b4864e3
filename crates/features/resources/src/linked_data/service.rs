use super::query::{ListRequest, QueryTemplates, count_query};
use crate::error::ResourcesError;
use fxhash::FxHashMap;
use pdl_domain::resource::{ResourceDefinition, SortOrder, linked_data_resources};
use pdl_kernel::format::unwrap_value;
use pdl_kernel::params::parse_leading_int;
use pdl_kernel::resource::ResourceItem;
use pdl_sparql::{SparqlClient, frame};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Items of one page plus the query that produced them.
#[derive(Debug, Clone)]
pub struct ItemsResult {
    pub items: Vec<ResourceItem>,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct ItemResult {
    pub item: Option<ResourceItem>,
    /// Empty when the id was rejected before querying.
    pub query: String,
}

/// Count, list and show over the triple store.
#[derive(Debug, Clone)]
pub struct LinkedDataService {
    client: SparqlClient,
    templates: Arc<FxHashMap<&'static str, QueryTemplates>>,
}

impl LinkedDataService {
    /// Generates the query templates of every linked data resource.
    #[must_use]
    pub fn new(client: SparqlClient) -> Self {
        let templates: FxHashMap<_, _> = linked_data_resources()
            .filter_map(|definition| {
                QueryTemplates::generate(definition).map(|templates| (definition.type_key, templates))
            })
            .collect();
        info!(resources = templates.len(), "SPARQL query templates generated");

        Self { client, templates: Arc::new(templates) }
    }

    /// # Errors
    /// [`ResourcesError::Internal`] for resources that are not backed by the triple store.
    pub fn templates(&self, definition: &ResourceDefinition) -> Result<&QueryTemplates, ResourcesError> {
        self.templates.get(definition.type_key).ok_or_else(|| ResourcesError::Internal {
            message: format!("no SPARQL templates for {}", definition.type_key).into(),
            context: None,
        })
    }

    /// Total of matching items; any failure is logged and counts as 0.
    pub async fn count(&self, definition: &ResourceDefinition, filter: &str) -> u64 {
        let Some(source) = definition.sparql() else {
            return 0;
        };
        let query = count_query(source, filter);

        match self.client.select(&query).await {
            Ok(results) => results
                .first_value("total")
                .map(parse_leading_int)
                .and_then(|total| u64::try_from(total).ok())
                .unwrap_or_default(),
            Err(err) => {
                error!(resource = definition.type_key, error = %err, "SPARQL count request failed");
                0
            },
        }
    }

    /// One page of items, ordered by the requested sort attribute.
    ///
    /// Upstream failures are logged and yield an empty page.
    ///
    /// # Errors
    /// Only for resources without templates.
    pub async fn get_items(
        &self,
        definition: &'static ResourceDefinition,
        request: &ListRequest,
    ) -> Result<ItemsResult, ResourcesError> {
        let templates = self.templates(definition)?;
        let query = templates.list_query(definition, request);
        debug!(resource = definition.type_key, "Fetching linked data items");

        let framed = match self.client.construct(&query).await {
            Ok(document) => frame(&document, templates.frame()),
            Err(err) => Err(err),
        };
        let mut items = match framed {
            Ok(framed) => instantiate(&framed, definition),
            Err(err) => {
                error!(resource = definition.type_key, error = %err, "SPARQL list request failed");
                Vec::new()
            },
        };

        let field = request.sort.field_or_default(definition);
        let order = request.sort.order_or_default(definition);
        sort_items(&mut items, field, order);

        Ok(ItemsResult { items, query })
    }

    /// A single item by id. Ids outside `[A-Za-z0-9._~-]+` never reach the store.
    ///
    /// # Errors
    /// Only for resources without templates.
    pub async fn get_item(
        &self,
        definition: &'static ResourceDefinition,
        id: &str,
    ) -> Result<ItemResult, ResourcesError> {
        let templates = self.templates(definition)?;
        if !is_item_id(id) {
            debug!(resource = definition.type_key, id, "Rejected item id");
            return Ok(ItemResult { item: None, query: String::new() });
        }

        let query = templates.show_query(&definition.construct_uri(id));
        debug!(resource = definition.type_key, id, "Fetching linked data item");

        let framed = match self.client.construct(&query).await {
            Ok(document) => frame(&document, templates.frame()),
            Err(err) => Err(err),
        };
        let item = match framed {
            Ok(framed) => instantiate(&framed, definition).into_iter().next(),
            Err(err) => {
                error!(resource = definition.type_key, id, error = %err, "SPARQL item request failed");
                None
            },
        };

        Ok(ItemResult { item, query })
    }
}

/// Items from `@graph` nodes (or a lone node); nodes without `@id` are dropped.
fn instantiate(framed: &Value, definition: &'static ResourceDefinition) -> Vec<ResourceItem> {
    let nodes = match framed.get("@graph") {
        Some(Value::Array(nodes)) => nodes.as_slice(),
        Some(node) => std::slice::from_ref(node),
        None => std::slice::from_ref(framed),
    };

    nodes
        .iter()
        .filter_map(|node| {
            let object = node.as_object()?;
            let iri = object.get("@id")?.as_str()?;
            let id = iri.rsplit('/').next().unwrap_or(iri);
            Some(ResourceItem::new(id.to_owned(), object.clone(), definition))
        })
        .collect()
}

/// Stable sort on the attribute's value; items without one go last.
fn sort_items(items: &mut [ResourceItem], field: &str, order: SortOrder) {
    items.sort_by(|a, b| match (sort_key(a, field), sort_key(b, field)) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn sort_key(item: &ResourceItem, field: &str) -> Option<String> {
    let value = match item.raw(field)? {
        Value::Array(values) => values.first()?,
        value => value,
    };
    match unwrap_value(value) {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn is_item_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b"._~-".contains(&b))
}
