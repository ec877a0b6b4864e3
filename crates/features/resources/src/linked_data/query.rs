//! SPARQL text for linked data resources.
//!
//! Each resource gets its templates generated once at startup from the catalog: a list query
//! over the index attributes, a list query over every attribute, a show query and the
//! JSON-LD frame. Requests then only substitute the `{{...}}` placeholders.

use crate::sort::SortRequest;
use pdl_domain::constants::{DC_TERMS_NS, PARL_NS, PREFIXES, RDF_NS};
use pdl_domain::resource::{Attribute, ResourceDefinition, SparqlSource};
use pdl_sparql::Frame;
use std::fmt::Write as _;

const FILTER: &str = "{{FILTER}}";
const OFFSET: &str = "{{OFFSET}}";
const LIMIT: &str = "{{LIMIT}}";
const SORT_BINDING: &str = "{{SORT_BINDING}}";
const SORT_DIRECTION: &str = "{{SORT_DIRECTION}}";

/// One page of a linked data list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Term filter clauses, possibly empty.
    pub filter: String,
    pub offset: u64,
    pub limit: u64,
    /// Fetch every attribute instead of the index attributes.
    pub all_fields: bool,
    pub sort: SortRequest,
}

/// Pre-generated query text for one resource.
#[derive(Debug, Clone)]
pub struct QueryTemplates {
    list: String,
    list_all: String,
    show: String,
    frame: Frame,
}

impl QueryTemplates {
    /// Templates for a triple store resource; `None` for REST resources.
    #[must_use]
    pub fn generate(definition: &ResourceDefinition) -> Option<Self> {
        let source = definition.sparql()?;
        let index: Vec<&Attribute> = definition.index_fields().collect();
        let all: Vec<&Attribute> = definition.attributes.iter().collect();

        let frame = definition
            .attributes
            .iter()
            .fold(Frame::new(source.rdf_type, PREFIXES.iter().copied()), |frame, attribute| {
                frame.embed(attribute.key)
            });

        Some(Self {
            list: list_template(definition, source, &index),
            list_all: list_template(definition, source, &all),
            show: show_template(definition, source),
            frame,
        })
    }

    /// Substitutes filter, window and sort into the list template.
    #[must_use]
    pub fn list_query(&self, definition: &ResourceDefinition, request: &ListRequest) -> String {
        let template = if request.all_fields { &self.list_all } else { &self.list };
        let field = request.sort.field_or_default(definition);
        let direction = request.sort.order_or_default(definition).sparql_keyword();

        template
            .replace(FILTER, &request.filter)
            .replace(OFFSET, &request.offset.to_string())
            .replace(LIMIT, &request.limit.to_string())
            .replace(SORT_BINDING, &sort_binding(definition, field))
            .replace(SORT_DIRECTION, direction)
    }

    /// Show query restricted to one item IRI.
    #[must_use]
    pub fn show_query(&self, item_uri: &str) -> String {
        self.show.replace(FILTER, &format!("FILTER(?item = <{item_uri}>)"))
    }

    #[must_use]
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }
}

/// `SELECT (COUNT(DISTINCT ?item) AS ?total)` over the filtered resource.
#[must_use]
pub fn count_query(source: &SparqlSource, filter: &str) -> String {
    let rdf_type = source.rdf_type;
    format!(
        "PREFIX rdf: <{RDF_NS}>
PREFIX dc-term: <{DC_TERMS_NS}>
PREFIX parl: <{PARL_NS}>
SELECT (COUNT(DISTINCT ?item) AS ?total)
WHERE {{
  ?item a <{rdf_type}> .
  {filter}
}}"
    )
}

/// `PREFIX p: <ns>` lines for every standard prefix.
#[must_use]
pub fn prefix_block() -> String {
    PREFIXES.iter().map(|(prefix, ns)| format!("PREFIX {prefix}: <{ns}>")).collect::<Vec<_>>().join("\n")
}

fn sort_binding(definition: &ResourceDefinition, field: &str) -> String {
    let predicate = definition.attribute(field).map_or(field, |attribute| attribute.key);
    format!("{predicate} ?sortValue")
}

fn required(definition: &ResourceDefinition) -> Vec<&'static Attribute> {
    definition.required_attributes.iter().filter_map(|name| definition.attribute(name)).collect()
}

fn list_template(
    definition: &ResourceDefinition,
    source: &SparqlSource,
    attributes: &[&Attribute],
) -> String {
    let prefixes = prefix_block();
    let rdf_type = source.rdf_type;
    let construct = construct_clause(attributes);
    let optional_required = required_optional(definition);
    let optional = where_clause(definition, attributes);
    let required_filter = required_filter_clause(source);

    let mut select_triples: Vec<String> =
        required(definition).iter().map(|a| format!("{} ?{}", a.key, a.name)).collect();
    select_triples.push(SORT_BINDING.to_owned());
    let select_triples = select_triples.join(" ;\n        ");

    format!(
        "{prefixes}
CONSTRUCT {{
  ?item a <{rdf_type}> ;
{construct}
}}
WHERE {{
  {optional_required}
{optional}

  {{
    SELECT ?item ?sortValue
    WHERE {{
      ?item a <{rdf_type}> ;
        {select_triples} .
      {required_filter}{FILTER}
    }}
    ORDER BY {SORT_DIRECTION}(?sortValue)
    OFFSET {OFFSET}
    LIMIT {LIMIT}
  }}
}}"
    )
}

fn show_template(definition: &ResourceDefinition, source: &SparqlSource) -> String {
    let prefixes = prefix_block();
    let rdf_type = source.rdf_type;
    let all: Vec<&Attribute> = definition.attributes.iter().collect();
    let construct = construct_clause(&all);
    let optional_required = required_optional(definition);
    let optional = where_clause(definition, &all);
    let required_filter = required_filter_clause(source);

    format!(
        "{prefixes}
CONSTRUCT {{
  ?item a <{rdf_type}> ;
{construct}
}}
WHERE {{
  ?item a <{rdf_type}> .
  {optional_required}
{optional}
  {required_filter}{FILTER}
}}"
    )
}

/// Main triples, then one `?n a <uri> ; props .` block per nested attribute.
fn construct_clause(attributes: &[&Attribute]) -> String {
    let mut main = Vec::with_capacity(attributes.len());
    let mut nested = Vec::new();

    for attribute in attributes {
        let (key, name) = (attribute.key, attribute.name);
        main.push(format!("    {key} ?{name}"));
        if attribute.is_nested() {
            let properties = attribute
                .properties
                .iter()
                .map(|p| format!("    {} ?{name}_{}", p.key, p.name))
                .collect::<Vec<_>>()
                .join(" ;\n");
            nested.push(format!("?{name} a {key} ;\n{properties}\n ."));
        }
    }

    let mut clause = main.join(" ;\n");
    clause.push_str(" .");
    if !nested.is_empty() {
        clause.push_str("\n  ");
        clause.push_str(&nested.join("\n  "));
    }
    clause
}

/// OPTIONAL blocks for the non-required attributes.
fn where_clause(definition: &ResourceDefinition, attributes: &[&Attribute]) -> String {
    attributes
        .iter()
        .filter(|attribute| !definition.is_required(attribute.name))
        .map(|attribute| {
            let (key, name) = (attribute.key, attribute.name);
            if !attribute.is_nested() {
                return format!("  OPTIONAL {{ ?item {key} ?{name} . }}");
            }
            let mut block = format!("  OPTIONAL {{ ?item {key} ?{name} .");
            for property in attribute.properties {
                let _ = write!(block, "\n      ?{name} {} ?{name}_{} .", property.key, property.name);
            }
            block.push_str("\n    }");
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Required attributes are guaranteed by the sub-select, so the outer query only binds them.
fn required_optional(definition: &ResourceDefinition) -> String {
    required(definition)
        .iter()
        .map(|a| format!("OPTIONAL {{ ?item {} ?{} . }}", a.key, a.name))
        .collect::<Vec<_>>()
        .join("\n    ")
}

fn required_filter_clause(source: &SparqlSource) -> String {
    source.required_filter.map_or_else(String::new, |filter| {
        format!(
            "?item {} ?_rf_value .\n      FILTER(LCASE(STR(?_rf_value)) = \"{}\")\n",
            filter.predicate,
            filter.value.to_lowercase()
        )
    })
}
