//! Static definitions of the published resource types.
//!
//! A [`ResourceDefinition`] describes where a resource comes from (the triple store or an
//! upstream REST API), which attributes it exposes and how lists are sorted and filtered.
//! Everything here is `const` data; behavior lives in the kernel and feature crates.

mod catalog;
mod rest;
mod sparql;

pub use catalog::{RESOURCES, find, linked_data_resources};
pub use rest::{
    BILL_PETITION, COMMITTEE, COMMITTEE_BUSINESS, COMMITTEE_BUSINESS_TYPE, COMMITTEE_TYPE,
    COUNTRY, EVENT, ORAL_EVIDENCE, WRITTEN_EVIDENCE,
};
pub use sparql::{DEPOSITED_PAPER, RESEARCH_BRIEFING};

use strum::{AsRefStr, Display, EnumString};

/// Sort direction accepted by list endpoints (`asc` / `desc`, case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const VALID: &'static [&'static str] = &["asc", "desc"];

    /// Keyword used in SPARQL `ORDER BY` clauses.
    #[must_use]
    pub const fn sparql_keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A property of a nested attribute: output name and upstream key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub key: &'static str,
}

impl Property {
    #[must_use]
    pub const fn new(name: &'static str, key: &'static str) -> Self {
        Self { name, key }
    }
}

/// An exposed attribute. `key` is a prefixed predicate for linked data and a JSON key for
/// REST data; attributes with properties are nested objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub key: &'static str,
    pub properties: &'static [Property],
}

impl Attribute {
    #[must_use]
    pub const fn simple(name: &'static str, key: &'static str) -> Self {
        Self { name, key, properties: &[] }
    }

    #[must_use]
    pub const fn nested(
        name: &'static str,
        key: &'static str,
        properties: &'static [Property],
    ) -> Self {
        Self { name, key, properties }
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        !self.properties.is_empty()
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }
}

/// Thesaurus term filter for linked data resources (`?topic=12345`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermMapping {
    pub param: &'static str,
    pub predicate: &'static str,
    pub label: &'static str,
    /// When set, the term hangs off an intermediate resource (`?author ov:seeAlso ?term`).
    pub nested_predicate: Option<&'static str>,
}

impl TermMapping {
    #[must_use]
    pub const fn new(param: &'static str, predicate: &'static str, label: &'static str) -> Self {
        Self { param, predicate, label, nested_predicate: None }
    }

    #[must_use]
    pub const fn through(mut self, nested_predicate: &'static str) -> Self {
        self.nested_predicate = Some(nested_predicate);
        self
    }
}

/// Case-insensitive literal restriction baked into every query of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFilter {
    pub predicate: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparqlSource {
    /// Full IRI of the RDF class.
    pub rdf_type: &'static str,
    /// Item IRI template containing `{id}`.
    pub item_uri: &'static str,
    pub term_mappings: &'static [TermMapping],
    pub required_filter: Option<RequiredFilter>,
}

/// Shape of an upstream list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `{"items": [...], "totalResults": n}`, paged upstream with `Skip`/`Take`.
    Collection,
    /// A bare JSON array, paged locally.
    Array,
}

/// Query parameter forwarded to a REST upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMapping {
    pub param: &'static str,
    pub upstream_param: &'static str,
    pub label: &'static str,
    pub default: Option<&'static str>,
    pub values: &'static [&'static str],
}

impl FilterMapping {
    #[must_use]
    pub const fn new(
        param: &'static str,
        upstream_param: &'static str,
        label: &'static str,
    ) -> Self {
        Self { param, upstream_param, label, default: None, values: &[] }
    }

    #[must_use]
    pub const fn values(mut self, values: &'static [&'static str]) -> Self {
        self.values = values;
        self
    }

    #[must_use]
    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestSource {
    pub base_url: &'static str,
    pub api_path: &'static str,
    pub id_field: &'static str,
    pub format: ResponseFormat,
    pub filter_mappings: &'static [FilterMapping],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Sparql(SparqlSource),
    Rest(RestSource),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDefinition {
    /// URL segment under `/api/v1`, e.g. `research-briefings`.
    pub path: &'static str,
    /// Snake-case singular used in `meta.type` and cache keys.
    pub type_key: &'static str,
    pub source: Source,
    pub sort_field: &'static str,
    pub sort_order: SortOrder,
    pub sortable_fields: &'static [&'static str],
    pub attributes: &'static [Attribute],
    pub index_attributes: &'static [&'static str],
    pub required_attributes: &'static [&'static str],
}

impl ResourceDefinition {
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'static Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attributes listed in `index_attributes`, in that order.
    pub fn index_fields(&self) -> impl Iterator<Item = &'static Attribute> + '_ {
        self.index_attributes.iter().filter_map(|name| self.attribute(name))
    }

    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required_attributes.iter().any(|required| *required == name)
    }

    #[must_use]
    pub const fn sparql(&self) -> Option<&SparqlSource> {
        match &self.source {
            Source::Sparql(source) => Some(source),
            Source::Rest(_) => None,
        }
    }

    #[must_use]
    pub const fn rest(&self) -> Option<&RestSource> {
        match &self.source {
            Source::Rest(source) => Some(source),
            Source::Sparql(_) => None,
        }
    }

    /// Canonical URI of an item, used for the `uri` field of formatted items.
    #[must_use]
    pub fn construct_uri(&self, id: &str) -> String {
        match &self.source {
            Source::Sparql(source) => source.item_uri.replace("{id}", id),
            Source::Rest(source) => format!("{}{}/{id}", source.base_url, source.api_path),
        }
    }

    /// The path with dashes as spaces: `committee business types`.
    #[must_use]
    pub fn label(&self) -> String {
        self.path.replace('-', " ")
    }

    /// Singular form of [`Self::label`]: `countries` → `country`, `committee business` stays.
    #[must_use]
    pub fn singular_label(&self) -> String {
        singularize(&self.label())
    }

    /// Parameter → label pairs of every supported filter.
    #[must_use]
    pub fn filter_labels(&self) -> Vec<(&'static str, &'static str)> {
        match &self.source {
            Source::Sparql(source) => source.term_mappings.iter().map(|m| (m.param, m.label)).collect(),
            Source::Rest(source) => {
                source.filter_mappings.iter().map(|m| (m.param, m.label)).collect()
            },
        }
    }
}

fn singularize(label: &str) -> String {
    if let Some(stem) = label.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if label.ends_with("ss") {
        return label.to_owned();
    }
    label.strip_suffix('s').unwrap_or(label).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singularize_handles_catalog_labels() {
        assert_eq!(singularize("research briefings"), "research briefing");
        assert_eq!(singularize("countries"), "country");
        assert_eq!(singularize("committee business"), "committee business");
        assert_eq!(singularize("oral evidence"), "oral evidence");
    }

    #[test]
    fn sort_order_parses_case_insensitively() {
        assert_eq!("ASC".parse::<SortOrder>().ok(), Some(SortOrder::Asc));
        assert_eq!("desc".parse::<SortOrder>().ok(), Some(SortOrder::Desc));
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Desc.to_string(), "desc");
    }
}
