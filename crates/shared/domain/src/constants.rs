//! Shared string constants: `OpenAPI` tags, RDF namespaces and the API key header.

pub const SYSTEM_TAG: &str = "System";
pub const DISCOVERY_TAG: &str = "Discovery";
pub const RESOURCES_TAG: &str = "Resources";
pub const TERMS_TAG: &str = "Terms";
pub const SEARCH_TAG: &str = "Search";
pub const LEGACY_TAG: &str = "Legacy";

pub const API_NAME: &str = "UK Parliament Data Library API";
pub const API_VERSION: &str = "v1";

/// Namespace prefixes used in generated SPARQL and JSON-LD frames, in declaration order.
pub const PREFIXES: &[(&str, &str)] = &[
    ("parl", "http://data.parliament.uk/schema/parl#"),
    ("dc-term", "http://purl.org/dc/terms/"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("schema", "http://schema.org/"),
    ("nfo", "http://www.semanticdesktop.org/ontologies/2007/03/22/nfo#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("ov", "http://open.vocab.org/terms/"),
];

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const PARL_NS: &str = "http://data.parliament.uk/schema/parl#";
pub const DC_TERMS_NS: &str = "http://purl.org/dc/terms/";
pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const FOAF_NS: &str = "http://xmlns.com/foaf/0.1/";

/// Thesaurus concept IRIs are `TERMS_BASE` followed by a numeric id.
pub const TERMS_BASE: &str = "http://data.parliament.uk/terms/";

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Expands a `prefix:local` name against [`PREFIXES`]; unknown prefixes are returned as-is.
#[must_use]
pub fn expand_prefixed(name: &str) -> String {
    name.split_once(':')
        .and_then(|(prefix, local)| {
            PREFIXES.iter().find(|(p, _)| *p == prefix).map(|(_, ns)| format!("{ns}{local}"))
        })
        .unwrap_or_else(|| name.to_owned())
}
