//! Thesaurus term filters (`?topic=12345`) rendered as SPARQL graph patterns.

use crate::error::ResourcesError;
use pdl_domain::constants::TERMS_BASE;
use pdl_domain::resource::{SparqlSource, TermMapping};
use pdl_kernel::params::QueryParams;

/// Clauses for every term mapping present in `params`, in mapping order, joined by newlines.
///
/// # Errors
/// [`ResourcesError::InvalidArgument`] when a term id is not `[A-Za-z0-9_]+`; ids are
/// interpolated into the query and into variable names.
pub fn build(source: &SparqlSource, params: &QueryParams) -> Result<String, ResourcesError> {
    let mut clauses = Vec::new();
    for mapping in source.term_mappings {
        let Some(term_id) = params.present(mapping.param) else {
            continue;
        };
        if !is_term_id(term_id) {
            return Err(ResourcesError::invalid_argument(format!(
                "Invalid {} id '{term_id}'",
                mapping.param
            )));
        }
        clauses.push(clause(mapping, term_id));
    }
    Ok(clauses.join("\n"))
}

fn clause(mapping: &TermMapping, id: &str) -> String {
    let predicate = mapping.predicate;
    let restriction = format!("FILTER (?{id}_term IN (<{TERMS_BASE}{id}>))");
    match mapping.nested_predicate {
        Some(nested) => format!(
            "?item {predicate} ?{id}_resource .\n       ?{id}_resource {nested} ?{id}_term .\n       {restriction}"
        ),
        None => format!("?item {predicate} ?{id}_term .\n       {restriction}"),
    }
}

fn is_term_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
