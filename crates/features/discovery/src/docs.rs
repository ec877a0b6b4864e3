//! Self-documentation built from the resource catalog.
//!
//! Every URL is absolute and built from the request's base URL, so the documents are
//! assembled per request rather than cached.

use crate::error::DiscoveryError;
use pdl_derive::api_model;
use pdl_domain::config::PaginationConfig;
use pdl_domain::constants::{API_NAME, API_VERSION};
use pdl_domain::resource::{self, RESOURCES, ResourceDefinition, Source};
use serde_json::{Map, Value, json};

const HOME_NAME: &str = "UK Parliament Linked Data API";
const DESCRIPTION: &str = "API for accessing data from UK Parliament's data platforms.";
const SOURCES: [&str; 2] = [
    "UK Parliament SPARQL endpoint (research briefings, deposited papers)",
    "UK Parliament Committees API (committees)",
];

/// Answer of `GET /`.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct HomeResponse {
    pub name: String,
    pub current_version: String,
    pub api_root: String,
}

#[api_model(skip_none = true)]
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointDoc {
    pub url: String,
    pub method: String,
    pub description: String,
    /// Query parameters accepted as filters; overview only.
    pub filterable_by: Option<Vec<String>>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointPair {
    pub list: EndpointDoc,
    pub show: EndpointDoc,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ParameterDocs {
    pub page: String,
    pub per_page: String,
    pub fields: String,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct FilteringDoc {
    pub description: String,
    pub format: String,
    pub examples: Vec<String>,
    /// Resource path to `{parameter: label}`.
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub filters_by_resource: Map<String, Value>,
}

/// Answer of `GET /api/v1`.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ApiOverview {
    pub name: String,
    pub version: String,
    pub description: String,
    pub documentation: String,
    /// Resource path (and `terms`) to its list and show endpoints.
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub endpoints: Map<String, Value>,
    pub parameters: ParameterDocs,
    pub filtering: FilteringDoc,
    pub sources: Vec<String>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ResourceTypeLink {
    pub id: String,
    pub url: String,
    pub documentation: String,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ResourceTypeList {
    pub resource_types: Vec<ResourceTypeLink>,
}

#[api_model(skip_none = true)]
#[derive(Clone, PartialEq, Eq)]
pub struct FilterDoc {
    pub parameter: String,
    pub label: String,
    pub example: String,
    pub values: Option<Vec<String>>,
    pub default: Option<String>,
}

#[api_model(skip_none = true)]
#[derive(Clone, PartialEq, Eq)]
pub struct FieldDetail {
    pub name: String,
    /// `simple` or `nested`.
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Option<Vec<String>>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct FieldsDoc {
    pub index_fields: Vec<String>,
    pub all_fields: Vec<String>,
    pub field_details: Vec<FieldDetail>,
}

/// Answer of `GET /api/v1/resource-types/{id}`.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ResourceTypeDoc {
    pub id: String,
    pub endpoints: EndpointPair,
    pub parameters: ParameterDocs,
    pub filters: Vec<FilterDoc>,
    pub fields: FieldsDoc,
    /// Shape of a list response with placeholder type names.
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub example_response: Value,
}

#[must_use]
pub fn home(base_url: &str) -> HomeResponse {
    HomeResponse {
        name: HOME_NAME.to_owned(),
        current_version: API_VERSION.to_owned(),
        api_root: format!("{base_url}/api/v1"),
    }
}

#[must_use]
pub fn overview(base_url: &str, pagination: &PaginationConfig) -> ApiOverview {
    let mut endpoints = Map::new();
    for definition in &RESOURCES {
        let mut pair = endpoint_pair(
            base_url,
            definition.path,
            format!("List all {}", definition.label()),
            format!("Get a single {} by ID", definition.singular_label()),
        );
        pair.list.filterable_by = Some(
            definition.filter_labels().into_iter().map(|(param, _)| param.to_owned()).collect(),
        );
        endpoints.insert(definition.path.to_owned(), json!(pair));
    }
    let terms = endpoint_pair(
        base_url,
        "terms",
        "List all parliamentary thesaurus terms".to_owned(),
        "Get a single term by ID".to_owned(),
    );
    endpoints.insert("terms".to_owned(), json!(terms));

    let filters_by_resource = RESOURCES
        .iter()
        .map(|definition| {
            let labels: Map<String, Value> = definition
                .filter_labels()
                .into_iter()
                .map(|(param, label)| (param.to_owned(), Value::from(label)))
                .collect();
            (definition.path.to_owned(), Value::Object(labels))
        })
        .collect();

    ApiOverview {
        name: API_NAME.to_owned(),
        version: API_VERSION.to_owned(),
        description: DESCRIPTION.to_owned(),
        documentation: format!("{base_url}/api/v1/resource-types"),
        endpoints,
        parameters: parameters(
            pagination,
            "Comma-separated list of fields to include, or 'all' for all fields",
        ),
        filtering: FilteringDoc {
            description: "Filter results using query parameters (multiple filters supported)"
                .to_owned(),
            format: "/api/v1/:resource?:term_type=:term_id".to_owned(),
            examples: vec![
                format!("{base_url}/api/v1/research-briefings?topic=123"),
                format!("{base_url}/api/v1/research-briefings?topic=123&publisher=456"),
                format!("{base_url}/api/v1/committees?house=Commons"),
            ],
            filters_by_resource,
        },
        sources: SOURCES.iter().map(|source| (*source).to_owned()).collect(),
    }
}

#[must_use]
pub fn resource_types(base_url: &str) -> ResourceTypeList {
    let resource_types = RESOURCES
        .iter()
        .map(|definition| ResourceTypeLink {
            id: definition.path.to_owned(),
            url: format!("{base_url}/api/v1/{}", definition.path),
            documentation: format!("{base_url}/api/v1/resource-types/{}", definition.path),
        })
        .collect();
    ResourceTypeList { resource_types }
}

/// Documentation of one resource type.
///
/// # Errors
/// [`DiscoveryError::UnknownResourceType`] when `id` is not a catalog path.
pub fn resource_type(
    base_url: &str,
    id: &str,
    pagination: &PaginationConfig,
) -> Result<ResourceTypeDoc, DiscoveryError> {
    let definition = resource::find(id)
        .ok_or_else(|| DiscoveryError::UnknownResourceType { id: id.to_owned() })?;

    Ok(ResourceTypeDoc {
        id: definition.path.to_owned(),
        endpoints: endpoint_pair(
            base_url,
            definition.path,
            format!("Returns paginated list of {}", definition.label()),
            format!("Returns a single {} by ID", definition.singular_label()),
        ),
        parameters: parameters(pagination, "Use 'all' to include all fields (default: index fields only)"),
        filters: filters(definition),
        fields: fields(definition),
        example_response: example_response(definition),
    })
}

fn endpoint_pair(base_url: &str, path: &str, list: String, show: String) -> EndpointPair {
    let endpoint = |url: String, description: String| EndpointDoc {
        url,
        method: "GET".to_owned(),
        description,
        filterable_by: None,
    };
    EndpointPair {
        list: endpoint(format!("{base_url}/api/v1/{path}"), list),
        show: endpoint(format!("{base_url}/api/v1/{path}/:id"), show),
    }
}

fn parameters(pagination: &PaginationConfig, fields: &str) -> ParameterDocs {
    ParameterDocs {
        page: "Page number (default: 1)".to_owned(),
        per_page: format!(
            "Results per page (default: {}, max: {})",
            pagination.default_per_page, pagination.max_per_page
        ),
        fields: fields.to_owned(),
    }
}

fn filters(definition: &ResourceDefinition) -> Vec<FilterDoc> {
    match &definition.source {
        Source::Rest(source) => source
            .filter_mappings
            .iter()
            .map(|mapping| FilterDoc {
                parameter: mapping.param.to_owned(),
                label: mapping.label.to_owned(),
                example: format!(
                    "?{}={}",
                    mapping.param,
                    mapping.values.first().copied().unwrap_or("value")
                ),
                values: (!mapping.values.is_empty())
                    .then(|| mapping.values.iter().map(|value| (*value).to_owned()).collect()),
                default: mapping.default.map(str::to_owned),
            })
            .collect(),
        Source::Sparql(source) => source
            .term_mappings
            .iter()
            .map(|mapping| FilterDoc {
                parameter: mapping.param.to_owned(),
                label: mapping.label.to_owned(),
                example: format!("?{}=12345", mapping.param),
                values: None,
                default: None,
            })
            .collect(),
    }
}

fn fields(definition: &ResourceDefinition) -> FieldsDoc {
    let field_details = definition
        .attributes
        .iter()
        .map(|attribute| FieldDetail {
            name: attribute.name.to_owned(),
            kind: if attribute.is_nested() { "nested" } else { "simple" }.to_owned(),
            properties: attribute
                .is_nested()
                .then(|| attribute.properties.iter().map(|p| p.name.to_owned()).collect()),
        })
        .collect();

    FieldsDoc {
        index_fields: definition.index_attributes.iter().map(|name| (*name).to_owned()).collect(),
        all_fields: definition.attributes.iter().map(|a| a.name.to_owned()).collect(),
        field_details,
    }
}

fn example_response(definition: &ResourceDefinition) -> Value {
    let mut item = Map::new();
    item.insert("id".to_owned(), json!("string"));
    item.insert("uri".to_owned(), json!("string"));
    for attribute in definition.index_fields() {
        let value = if attribute.is_nested() {
            let mut nested = Map::new();
            nested.insert("id".to_owned(), json!("string"));
            for property in attribute.properties {
                nested.insert(property.name.to_owned(), json!("string"));
            }
            json!([nested])
        } else {
            json!("string")
        };
        item.insert(attribute.name.to_owned(), value);
    }

    json!({
        "meta": {
            "total_count": "integer",
            "page": "integer",
            "per_page": "integer",
            "total_pages": "integer",
        },
        "links": {
            "self": "string (current page URL)",
            "first": "string",
            "last": "string",
            "next": "string or null",
            "prev": "string or null",
        },
        "items": [item],
    })
}
