//! Linked Data API (LDA) v0 rendering.
//!
//! Items keep the legacy field names and value wrapping (`{"_value": ..}` objects,
//! `prefLabel` on terms, single nested objects unwrapped) so existing LDA clients can
//! switch endpoints without changes.

use pdl_derive::api_model;
use pdl_domain::resource::{Attribute, Property};
use pdl_kernel::params::parse_leading_int;
use pdl_kernel::resource::ResourceItem;
use regex::Regex;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

const FORMAT: &str = "linked-data-api";
const VERSION: &str = "0.2";

pub const ITEM_TYPE: &str = "http://data.parliament.uk/schema/parl#ResearchBriefing";
const LIST_ENDPOINT: &str = "http://purl.org/linked-data/api/vocab#ListEndpoint";
const ITEM_ENDPOINT: &str = "http://purl.org/linked-data/api/vocab#ItemEndpoint";
const PAGE: &str = "http://purl.org/linked-data/api/vocab#Page";
const PERSON: &str = "http://schema.org/Person";

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("static pattern is valid"));

/// Attribute names that differ in the LDA output.
const FIELD_NAMES: &[(&str, &str)] = &[
    ("content_location", "contentLocation"),
    ("external_location", "externalLocation"),
    ("html_summary", "htmlsummary"),
    ("subtype", "subType"),
    ("author", "creator"),
    ("related_link", "relatedLink"),
];

/// Nested attributes rendered as an array even when they hold one object.
const ALWAYS_ARRAY: &[&str] = &["section"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldStyle {
    /// `{"_value": .., "_datatype"?: ..}`
    Wrapped,
    /// The bare literal.
    Plain,
    /// The bare literal inside an array.
    PlainArray,
    /// The `@id` of a reference.
    Uri,
}

fn field_style(name: &str) -> FieldStyle {
    match name {
        "title" | "html_summary" => FieldStyle::Plain,
        "description" => FieldStyle::PlainArray,
        "content_location" | "external_location" => FieldStyle::Uri,
        _ => FieldStyle::Wrapped,
    }
}

/// Per-attribute property naming and value rules for nested objects.
#[derive(Debug, Clone, Copy, Default)]
struct NestedRules {
    names: &'static [(&'static str, &'static str)],
    plain: &'static [&'static str],
    integer_arrays: &'static [&'static str],
}

impl NestedRules {
    fn renames(&self, property: &str) -> Option<&'static str> {
        self.names.iter().find(|(from, _)| *from == property).map(|(_, to)| *to)
    }
}

fn nested_rules(attribute: &str) -> NestedRules {
    match attribute {
        "related_link" => {
            NestedRules { names: &[("url", "website"), ("label", "label")], ..NestedRules::default() }
        },
        "attachment" => NestedRules {
            names: &[("title", "attachmentTitle"), ("file_size", "sizeOfFile")],
            plain: &["title", "media_type"],
            integer_arrays: &["file_size"],
        },
        _ => NestedRules::default(),
    }
}

/// `{format, version, result}` wrapper of every v0 response.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct LdaEnvelope {
    pub format: String,
    pub version: String,
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub result: Map<String, Value>,
}

impl LdaEnvelope {
    fn new(result: Map<String, Value>) -> Self {
        Self { format: FORMAT.to_owned(), version: VERSION.to_owned(), result }
    }
}

/// The URLs of the request being answered.
#[derive(Debug, Clone, Copy)]
pub struct RequestUrls<'a> {
    /// Scheme and authority.
    pub base_url: &'a str,
    pub path: &'a str,
    /// Full URL including the query string.
    pub original_url: &'a str,
}

impl RequestUrls<'_> {
    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    fn definition(&self) -> String {
        format!("{}/meta{}.json", self.base_url, self.path)
    }
}

/// Position of a list page; `page` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPage {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Renders every attribute that has a value, then the item type.
#[must_use]
pub fn format_item(item: &ResourceItem) -> Map<String, Value> {
    let mut result = Map::new();
    result.insert("_about".to_owned(), Value::String(item.uri()));

    for attribute in item.definition.attributes {
        let Some(value) = item.raw(attribute.name) else {
            continue;
        };
        let formatted = if attribute.is_nested() {
            format_nested(value, attribute)
        } else {
            match field_style(attribute.name) {
                FieldStyle::Plain => plain(value),
                FieldStyle::PlainArray => match value {
                    Value::Array(values) => values.iter().map(plain).collect(),
                    single => Value::Array(vec![plain(single)]),
                },
                FieldStyle::Uri => uri(value),
                FieldStyle::Wrapped => wrap(value),
            }
        };
        result.insert(field_name(attribute.name).to_owned(), formatted);
    }

    result.insert("type".to_owned(), Value::String(ITEM_TYPE.to_owned()));
    result
}

/// List envelope. `next` and `prev` carry only `_page`, never `_pageSize`.
#[must_use]
pub fn list_envelope(items: Vec<Value>, page: ListPage, urls: &RequestUrls<'_>) -> LdaEnvelope {
    let endpoint = urls.endpoint();
    let separator = if urls.original_url.contains('?') { '&' } else { '?' };
    let total_pages = if page.total == 0 { 1 } else { page.total.div_ceil(page.page_size) };

    let mut result = Map::new();
    result.insert("_about".to_owned(), json!(urls.original_url));
    result.insert("definition".to_owned(), json!(urls.definition()));
    result.insert(
        "extendedMetadataVersion".to_owned(),
        json!(format!("{}{separator}_metadata=all", urls.original_url)),
    );
    result.insert("first".to_owned(), json!(format!("{endpoint}?_page=0")));
    result.insert(
        "isPartOf".to_owned(),
        json!({
            "_about": endpoint,
            "definition": urls.definition(),
            "hasPart": urls.original_url,
            "type": LIST_ENDPOINT,
        }),
    );
    result.insert("items".to_owned(), Value::Array(items));
    result.insert("itemsPerPage".to_owned(), json!(page.page_size));
    result.insert("page".to_owned(), json!(page.page));
    result.insert("startIndex".to_owned(), json!(page.page * page.page_size + 1));
    result.insert("totalResults".to_owned(), json!(page.total));
    result.insert("type".to_owned(), json!(PAGE));

    if page.page + 1 < total_pages {
        result.insert("next".to_owned(), json!(format!("{endpoint}?_page={}", page.page + 1)));
    }
    if page.page > 0 {
        result.insert("prev".to_owned(), json!(format!("{endpoint}?_page={}", page.page - 1)));
    }

    LdaEnvelope::new(result)
}

/// Show envelope around an item that already carries `isPrimaryTopicOf`.
#[must_use]
pub fn show_envelope(item: Map<String, Value>, urls: &RequestUrls<'_>) -> LdaEnvelope {
    let mut result = Map::new();
    result.insert("_about".to_owned(), json!(urls.original_url));
    result.insert("definition".to_owned(), json!(urls.definition()));
    // The legacy service always appends with `?`, even after an existing query.
    result.insert(
        "extendedMetadataVersion".to_owned(),
        json!(format!("{}?_metadata=all", urls.original_url)),
    );
    result.insert("primaryTopic".to_owned(), Value::Object(item));
    result.insert("type".to_owned(), json!([ITEM_ENDPOINT, PAGE]));

    LdaEnvelope::new(result)
}

fn field_name(name: &str) -> &str {
    FIELD_NAMES.iter().find(|(from, _)| *from == name).map_or(name, |(_, to)| *to)
}

/// Text form of a literal: strings as-is, other scalars and structures as JSON.
fn literal_text(value: &Value) -> String {
    match unwrap_literal(value) {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `{"@value": x}` becomes `x`; anything else is returned untouched.
fn unwrap_literal(value: &Value) -> &Value {
    value.get("@value").filter(|inner| !inner.is_null()).unwrap_or(value)
}

fn plain(value: &Value) -> Value {
    unwrap_literal(value).clone()
}

fn uri(value: &Value) -> Value {
    match value.get("@id").and_then(Value::as_str) {
        Some(iri) => Value::String(iri.to_owned()),
        None => Value::String(literal_text(value)),
    }
}

/// `_datatype` is only emitted for dates and booleans. Arrays wrap each element.
#[must_use]
pub fn wrap(value: &Value) -> Value {
    if let Value::Array(values) = value {
        return values.iter().map(wrap).collect();
    }

    let text = literal_text(value);
    if DATE_PREFIX.is_match(&text) {
        json!({ "_value": text, "_datatype": "dateTime" })
    } else if text == "true" || text == "false" {
        json!({ "_value": text, "_datatype": "boolean" })
    } else {
        json!({ "_value": text })
    }
}

fn format_nested(value: &Value, attribute: &Attribute) -> Value {
    let rules = nested_rules(attribute.name);
    let mut formatted: Vec<Value> = match value {
        Value::Array(values) => {
            values.iter().map(|v| format_nested_object(v, attribute, rules)).collect()
        },
        single => vec![format_nested_object(single, attribute, rules)],
    };

    // Only term-like entries, whose label becomes `prefLabel`, are ordered.
    if attribute.has_property("label") && rules.renames("label").is_none() && formatted.len() > 1 {
        formatted.sort_by_cached_key(|entry| {
            entry.pointer("/prefLabel/_value").map(literal_text).unwrap_or_default().to_lowercase()
        });
    }

    if ALWAYS_ARRAY.contains(&attribute.name) || formatted.len() != 1 {
        Value::Array(formatted)
    } else {
        formatted.swap_remove(0)
    }
}

fn format_nested_object(value: &Value, attribute: &Attribute, rules: NestedRules) -> Value {
    let Value::Object(object) = value else {
        return value.clone();
    };

    let mut nested = Map::new();
    nested.insert("_about".to_owned(), object.get("@id").cloned().unwrap_or(Value::Null));

    for property in attribute.properties {
        let Some(raw) = object.get(property.key).filter(|raw| !raw.is_null()) else {
            continue;
        };

        let formatted = if rules.integer_arrays.contains(&property.name) {
            json!([parse_leading_int(&literal_text(raw))])
        } else if rules.plain.contains(&property.name) {
            plain(raw)
        } else if let Some(iri) = raw.get("@id").filter(|iri| !iri.is_null()) {
            iri.clone()
        } else {
            wrap(raw)
        };
        nested.insert(property_name(property, rules), formatted);
    }

    if attribute.name == "author" {
        nested.insert("type".to_owned(), Value::String(PERSON.to_owned()));
    }
    Value::Object(nested)
}

fn property_name(property: &Property, rules: NestedRules) -> String {
    if let Some(name) = rules.renames(property.name) {
        return name.to_owned();
    }
    if property.name == "label" {
        return "prefLabel".to_owned();
    }
    lower_camel(property.name)
}

/// `given_name` → `givenName`.
fn lower_camel(name: &str) -> String {
    let mut parts = name.split('_');
    let mut result = parts.next().unwrap_or_default().to_owned();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}
