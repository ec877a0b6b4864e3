//! Thesaurus concepts (SES terms): queries, labels and the show document.

use pdl_derive::api_model;
use pdl_domain::constants::{FOAF_NS, PARL_NS, SKOS_NS, TERMS_BASE};
use pdl_sparql::{QuerySolution, binding_value};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// `Surname, Given names`.
static INVERTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+),\s*(.+)$").expect("static pattern is valid"));

pub const COUNT_QUERY: &str = r#"PREFIX skos: <http://www.w3.org/2004/02/skos/core#>

SELECT (COUNT(DISTINCT ?term) as ?count)
WHERE {
  ?term a skos:Concept .
  FILTER(REGEX(STR(?term), "^http://data.parliament.uk/terms/[0-9]+$"))
}
"#;

const INDEX_QUERY: &str = r#"PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX foaf: <http://xmlns.com/foaf/0.1/>

SELECT DISTINCT ?term ?prefLabel ?firstName ?surname
WHERE {
  ?term a skos:Concept .
  FILTER(REGEX(STR(?term), "^http://data.parliament.uk/terms/[0-9]+$"))
  OPTIONAL { ?term skos:prefLabel ?prefLabel . }
  OPTIONAL { ?term foaf:firstName ?firstName . }
  OPTIONAL { ?term foaf:surname ?surname . }
}
ORDER BY ?prefLabel ?surname
LIMIT {{LIMIT}}
OFFSET {{OFFSET}}
"#;

const SHOW_QUERY: &str = "SELECT ?predicate ?object
WHERE {
  <{{TERM_URI}}> ?predicate ?object .
}
LIMIT 100
";

#[must_use]
pub fn index_query(limit: u64, offset: u64) -> String {
    INDEX_QUERY.replace("{{LIMIT}}", &limit.to_string()).replace("{{OFFSET}}", &offset.to_string())
}

#[must_use]
pub fn show_query(id: &str) -> String {
    SHOW_QUERY.replace("{{TERM_URI}}", &term_uri(id))
}

#[must_use]
pub fn term_uri(id: &str) -> String {
    format!("{TERMS_BASE}{id}")
}

/// Only numeric ids name SES concepts.
#[must_use]
pub fn is_term_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Display label: "first surname" for people, otherwise the preferred label with an
/// inverted "Surname, Given" form turned around.
#[must_use]
pub fn display_label(pref_label: Option<&str>, first_name: Option<&str>, surname: Option<&str>) -> Option<String> {
    if let (Some(first), Some(last)) = (first_name, surname) {
        return Some(format!("{first} {last}"));
    }
    let label = pref_label?;
    Some(match INVERTED_NAME.captures(label) {
        Some(captures) => format!("{} {}", &captures[2], &captures[1]),
        None => label.to_owned(),
    })
}

/// One row of the terms list.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct TermSummary {
    pub id: Option<String>,
    pub uri: Option<String>,
    pub label: Option<String>,
}

impl TermSummary {
    #[must_use]
    pub fn from_solution(row: &QuerySolution) -> Self {
        let value = |var: &str| binding_value(row, var);
        let uri = value("term");
        Self {
            id: uri.and_then(|uri| uri.rsplit('/').next()).map(str::to_owned),
            uri: uri.map(str::to_owned),
            label: display_label(value("prefLabel"), value("firstName"), value("surname")),
        }
    }
}

/// A single concept with its raw predicate/object map.
#[api_model(skip_none = true)]
#[derive(Clone, PartialEq)]
pub struct TermDetail {
    pub id: String,
    pub uri: String,
    pub pref_label: Option<String>,
    pub alt_label: Option<String>,
    pub first_name: Option<String>,
    pub family_name: Option<String>,
    pub uncontrolled: Option<String>,
    pub broader: Option<String>,
    pub narrower: Option<String>,
    /// Predicate IRI to object value; repeated predicates keep the last object.
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub data: Map<String, Value>,
    pub queries: Vec<String>,
}

impl TermDetail {
    #[must_use]
    pub fn new(id: &str, data: Map<String, Value>, query: String) -> Self {
        let lookup = |ns: &str, local: &str| {
            data.get(&format!("{ns}{local}")).and_then(Value::as_str).map(str::to_owned)
        };
        Self {
            id: id.to_owned(),
            uri: term_uri(id),
            pref_label: lookup(SKOS_NS, "prefLabel"),
            alt_label: lookup(SKOS_NS, "altLabel"),
            first_name: lookup(FOAF_NS, "firstName"),
            family_name: lookup(FOAF_NS, "surname"),
            uncontrolled: lookup(PARL_NS, "uncontrolledName"),
            broader: lookup(SKOS_NS, "broader"),
            narrower: lookup(SKOS_NS, "narrower"),
            data,
            queries: vec![query],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdl_sparql::SelectResults;
    use serde_json::json;

    #[test]
    fn people_use_given_name_then_surname() {
        assert_eq!(display_label(Some("Smith, Jane"), Some("Jane"), Some("Smith")), Some("Jane Smith".to_owned()));
    }

    #[test]
    fn inverted_labels_are_turned_around() {
        assert_eq!(display_label(Some("Smith, Jane"), None, None), Some("Jane Smith".to_owned()));
        assert_eq!(display_label(Some("Energy"), Some("Jane"), None), Some("Energy".to_owned()));
        assert_eq!(display_label(Some("Doe, Smith, Ann"), None, None), Some("Ann Doe, Smith".to_owned()));
        assert_eq!(display_label(None, None, Some("Smith")), None);
    }

    #[test]
    fn queries_are_filled_in() {
        let query = index_query(20, 40);
        assert!(query.contains("LIMIT 20\nOFFSET 40"));
        assert!(query.contains("ORDER BY ?prefLabel ?surname"));
        assert!(show_query("123").contains("<http://data.parliament.uk/terms/123> ?predicate ?object ."));
    }

    #[test]
    fn only_numeric_ids_are_terms() {
        assert!(is_term_id("90996"));
        assert!(!is_term_id(""));
        assert!(!is_term_id("12a"));
        assert!(!is_term_id("1> ?p ?o } #"));
    }

    #[test]
    fn summaries_come_from_solutions() {
        let raw = r#"{
            "head": {"vars": ["term", "prefLabel", "firstName", "surname"]},
            "results": {"bindings": [
                {"term": {"type": "uri", "value": "http://data.parliament.uk/terms/42"},
                 "prefLabel": {"type": "literal", "value": "Health services"}},
                {"term": {"type": "uri", "value": "http://data.parliament.uk/terms/7"},
                 "prefLabel": {"type": "literal", "value": "Smith, Jane", "xml:lang": "en"},
                 "firstName": {"type": "literal", "value": "Jane"},
                 "surname": {"type": "literal", "value": "Smith"}}
            ]}
        }"#;
        let results = SelectResults::parse(raw.as_bytes()).unwrap();
        let summaries: Vec<_> = results.rows().map(TermSummary::from_solution).collect();

        assert_eq!(summaries[0].id.as_deref(), Some("42"));
        assert_eq!(summaries[0].uri.as_deref(), Some("http://data.parliament.uk/terms/42"));
        assert_eq!(summaries[0].label.as_deref(), Some("Health services"));
        assert_eq!(summaries[1].label.as_deref(), Some("Jane Smith"));
    }

    #[test]
    fn detail_reads_known_predicates() {
        let data = json!({
            "http://www.w3.org/2004/02/skos/core#prefLabel": "Smith, Jane",
            "http://xmlns.com/foaf/0.1/firstName": "Jane",
            "http://xmlns.com/foaf/0.1/surname": "Smith",
        });
        let detail = TermDetail::new("7", data.as_object().cloned().unwrap(), "Q".to_owned());
        assert_eq!(detail.uri, "http://data.parliament.uk/terms/7");
        assert_eq!(detail.pref_label.as_deref(), Some("Smith, Jane"));
        assert_eq!(detail.family_name.as_deref(), Some("Smith"));

        let rendered = serde_json::to_value(&detail).unwrap();
        assert!(rendered.get("alt_label").is_none());
        assert_eq!(rendered["queries"], json!(["Q"]));
    }
}
