//! A fetched item of any resource type, before formatting.

use pdl_domain::resource::ResourceDefinition;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceItem {
    pub id: String,
    /// Framed JSON-LD node or upstream JSON object.
    pub data: Map<String, Value>,
    pub definition: &'static ResourceDefinition,
}

impl ResourceItem {
    #[must_use]
    pub const fn new(
        id: String,
        data: Map<String, Value>,
        definition: &'static ResourceDefinition,
    ) -> Self {
        Self { id, data, definition }
    }

    /// The node's own `@id` for linked data, the catalog URI otherwise.
    #[must_use]
    pub fn uri(&self) -> String {
        match self.data.get("@id").and_then(Value::as_str) {
            Some(iri) if self.definition.sparql().is_some() => iri.to_owned(),
            _ => self.definition.construct_uri(&self.id),
        }
    }

    /// Raw value stored under an attribute's key.
    #[must_use]
    pub fn raw(&self, attribute: &str) -> Option<&Value> {
        let attribute = self.definition.attribute(attribute)?;
        self.data.get(attribute.key).filter(|value| !value.is_null())
    }

    /// `meta.type`.
    #[must_use]
    pub const fn type_key(&self) -> &'static str {
        self.definition.type_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdl_domain::resource::{COMMITTEE, RESEARCH_BRIEFING};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn linked_data_items_use_their_own_iri() {
        let item = ResourceItem::new(
            "CBP-1".to_owned(),
            object(json!({ "@id": "http://data.parliament.uk/resources/CBP-1", "dc-term:title": "T" })),
            &RESEARCH_BRIEFING,
        );
        assert_eq!(item.uri(), "http://data.parliament.uk/resources/CBP-1");
        assert_eq!(item.raw("title"), Some(&json!("T")));
        assert_eq!(item.raw("date"), None);
    }

    #[test]
    fn rest_items_use_the_catalog_uri() {
        let item = ResourceItem::new("7".to_owned(), object(json!({ "name": null })), &COMMITTEE);
        assert_eq!(item.uri(), "https://committees-api.parliament.uk/api/Committees/7");
        assert_eq!(item.raw("name"), None);
        assert_eq!(item.type_key(), "committee");
    }
}
