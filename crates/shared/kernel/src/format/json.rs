//! `/api/v1` item shapes.
//!
//! Linked data arrives as framed JSON-LD and REST data as plain JSON; both are reduced to
//! the same flat objects keyed by attribute name.

use crate::resource::ResourceItem;
use pdl_derive::api_model;
use pdl_domain::resource::{Attribute, Property};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// `meta` block of a single-item response.
#[api_model(skip_none = true)]
#[derive(Clone, PartialEq, Eq)]
pub struct ItemMeta {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub uri: String,
    /// REST resources only: the upstream URL the item was read from.
    pub upstream_url: Option<String>,
}

/// A formatted item for show endpoints.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct ShowDocument {
    pub meta: ItemMeta,
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub data: Map<String, Value>,
}

/// Formats the chosen attributes of one item. Index views prepend `id` and `uri`.
pub fn format_item<'a>(
    item: &ResourceItem,
    attributes: impl IntoIterator<Item = &'a Attribute>,
    include_base: bool,
) -> Map<String, Value> {
    let mut result = Map::new();
    if include_base {
        result.insert("id".to_owned(), Value::String(item.id.clone()));
        result.insert("uri".to_owned(), Value::String(item.definition.construct_uri(&item.id)));
    }

    for attribute in attributes {
        let Some(value) = item.data.get(attribute.key).filter(|value| !value.is_null()) else {
            continue;
        };

        let formatted = if attribute.is_nested() {
            Value::Array(format_nested(value, attribute.properties))
        } else {
            unwrap_value(value).clone()
        };
        result.insert(attribute.name.to_owned(), formatted);
    }

    result
}

/// List entries: index attributes, or every attribute with `fields=all`.
#[must_use]
pub fn format_index(items: &[ResourceItem], all_fields: bool) -> Vec<Value> {
    items
        .iter()
        .map(|item| {
            let definition = item.definition;
            let formatted = if all_fields {
                format_item(item, definition.attributes, true)
            } else {
                format_item(item, definition.index_fields(), true)
            };
            Value::Object(formatted)
        })
        .collect()
}

/// `{meta: {id, type, uri}, data}` with every attribute.
#[must_use]
pub fn format_show(item: &ResourceItem) -> ShowDocument {
    ShowDocument {
        meta: ItemMeta {
            id: item.id.clone(),
            kind: item.type_key().to_owned(),
            uri: item.uri(),
            upstream_url: None,
        },
        data: format_item(item, item.definition.attributes, false),
    }
}

/// `{"@value": x}` becomes `x`; a lone `{"@id": iri}` becomes `iri`.
#[must_use]
pub fn unwrap_value(value: &Value) -> &Value {
    let Value::Object(object) = value else {
        return value;
    };
    if let Some(inner) = object.get("@value") {
        return inner;
    }
    match object.get("@id") {
        Some(iri) if object.len() == 1 => iri,
        _ => value,
    }
}

fn format_nested(value: &Value, properties: &[Property]) -> Vec<Value> {
    let mut formatted: Vec<Value> = match value {
        Value::Array(values) => values.iter().map(|v| extract_properties(v, properties)).collect(),
        single => vec![extract_properties(single, properties)],
    };

    if properties.iter().any(|p| p.name == "label") {
        formatted.sort_by_cached_key(|entry| sort_text(entry.get("label")).to_lowercase());
    } else {
        formatted.sort_by(|a, b| compare_trailing_digits(&id_text(a), &id_text(b)));
    }
    formatted
}

fn extract_properties(value: &Value, properties: &[Property]) -> Value {
    let Value::Object(object) = value else {
        return value.clone();
    };

    let mut nested = Map::new();
    let id = object.get("@id").filter(|id| !id.is_null()).or_else(|| object.get("id"));
    if let Some(id) = id.filter(|id| !id.is_null()) {
        nested.insert("id".to_owned(), id.clone());
    }
    for property in properties {
        if let Some(found) = object.get(property.key).filter(|v| !v.is_null()) {
            nested.insert(property.name.to_owned(), unwrap_value(found).clone());
        }
    }
    Value::Object(nested)
}

fn sort_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn id_text(entry: &Value) -> String {
    sort_text(entry.get("id"))
}

/// Orders by the numeric value of each id's trailing digits; ids without digits count as 0.
fn compare_trailing_digits(a: &str, b: &str) -> Ordering {
    let a = significant_digits(a);
    let b = significant_digits(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn significant_digits(id: &str) -> &str {
    let start = id.len() - id.bytes().rev().take_while(u8::is_ascii_digit).count();
    id[start..].trim_start_matches('0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdl_domain::resource::{COMMITTEE, RESEARCH_BRIEFING};
    use serde_json::json;

    fn briefing(data: Value) -> ResourceItem {
        ResourceItem::new(
            "CBP-9".to_owned(),
            data.as_object().cloned().unwrap_or_default(),
            &RESEARCH_BRIEFING,
        )
    }

    #[test]
    fn unwraps_json_ld_wrappers() {
        assert_eq!(unwrap_value(&json!({ "@value": "2024-01-01", "@type": "xsd:date" })), &json!("2024-01-01"));
        assert_eq!(unwrap_value(&json!({ "@id": "http://x/1" })), &json!("http://x/1"));
        let labelled = json!({ "@id": "http://x/1", "skos:prefLabel": "A" });
        assert_eq!(unwrap_value(&labelled), &labelled);
        assert_eq!(unwrap_value(&json!(["a", "b"])), &json!(["a", "b"]));
    }

    #[test]
    fn index_view_has_base_fields_and_skips_missing_values() {
        let item = briefing(json!({
            "@id": "http://data.parliament.uk/resources/CBP-9",
            "dc-term:title": "Energy",
            "dc-term:identifier": "CBP-9",
            "dc-term:description": null,
            "dc-term:date": { "@value": "2024-03-01T00:00:00", "@type": "xsd:dateTime" },
        }));

        let formatted = format_index(std::slice::from_ref(&item), false);
        assert_eq!(
            formatted[0],
            json!({
                "id": "CBP-9",
                "uri": "http://data.parliament.uk/resources/CBP-9",
                "title": "Energy",
                "identifier": "CBP-9",
                "date": "2024-03-01T00:00:00",
            })
        );
    }

    #[test]
    fn terms_are_sorted_by_label_case_insensitively() {
        let item = briefing(json!({
            "parl:topic": [
                { "@id": "http://data.parliament.uk/terms/2", "skos:prefLabel": "energy" },
                { "@id": "http://data.parliament.uk/terms/1", "skos:prefLabel": "Agriculture" },
            ],
        }));

        let formatted = format_item(&item, RESEARCH_BRIEFING.attribute("topic"), false);
        assert_eq!(
            formatted["topic"],
            json!([
                { "id": "http://data.parliament.uk/terms/1", "label": "Agriculture" },
                { "id": "http://data.parliament.uk/terms/2", "label": "energy" },
            ])
        );
    }

    #[test]
    fn sub_objects_are_sorted_by_trailing_number() {
        let item = briefing(json!({
            "dc-term:creator": [
                { "@id": "http://data.parliament.uk/resources/CBP-9/authors/10", "schema:familyName": "B" },
                { "@id": "http://data.parliament.uk/resources/CBP-9/authors/2", "schema:familyName": "A" },
            ],
        }));

        let formatted = format_item(&item, RESEARCH_BRIEFING.attribute("author"), false);
        let names: Vec<&Value> = formatted["author"]
            .as_array()
            .map(|a| a.iter().map(|entry| &entry["family_name"]).collect())
            .unwrap_or_default();
        assert_eq!(names, vec![&json!("A"), &json!("B")]);
    }

    #[test]
    fn a_single_nested_object_becomes_an_array() {
        let item = briefing(json!({
            "dc-term:publisher": { "@id": "http://data.parliament.uk/terms/5", "skos:prefLabel": "House of Commons Library" },
        }));
        let formatted = format_item(&item, RESEARCH_BRIEFING.attribute("publisher"), false);
        assert_eq!(
            formatted["publisher"],
            json!([{ "id": "http://data.parliament.uk/terms/5", "label": "House of Commons Library" }])
        );
    }

    #[test]
    fn show_view_uses_meta_and_data() {
        let item = ResourceItem::new(
            "12".to_owned(),
            json!({ "id": 12, "name": "Treasury Committee" }).as_object().cloned().unwrap_or_default(),
            &COMMITTEE,
        );
        let formatted = serde_json::to_value(format_show(&item)).unwrap();
        assert_eq!(
            formatted["meta"],
            json!({ "id": "12", "type": "committee", "uri": "https://committees-api.parliament.uk/api/Committees/12" })
        );
        assert_eq!(formatted["data"]["name"], json!("Treasury Committee"));
        assert!(formatted["data"].get("uri").is_none());
    }

    #[test]
    fn trailing_digits_compare_numerically() {
        assert_eq!(compare_trailing_digits("a/9", "a/10"), Ordering::Less);
        assert_eq!(compare_trailing_digits("a/007", "a/7"), Ordering::Equal);
        assert_eq!(compare_trailing_digits("none", "a/0"), Ordering::Equal);
    }
}
