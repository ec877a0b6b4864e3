use crate::error::SparqlError;
use oxrdf::{Term, Variable};
use sparesults::{QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput};

/// Solutions of a SELECT query, read from `application/sparql-results+json`.
#[derive(Debug, Default)]
pub struct SelectResults {
    variables: Vec<Variable>,
    solutions: Vec<QuerySolution>,
}

impl SelectResults {
    /// # Errors
    /// [`SparqlError::Results`] for malformed documents and
    /// [`SparqlError::NotSolutions`] for boolean (ASK) answers.
    pub fn parse(body: &[u8]) -> Result<Self, SparqlError> {
        match QueryResultsParser::from_format(QueryResultsFormat::Json).for_reader(body)? {
            ReaderQueryResultsParserOutput::Solutions(parser) => {
                let variables = parser.variables().to_vec();
                let solutions = parser.collect::<Result<Vec<_>, _>>()?;
                Ok(Self { variables, solutions })
            },
            ReaderQueryResultsParserOutput::Boolean(_) => Err(SparqlError::NotSolutions { context: None }),
        }
    }

    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn rows(&self) -> impl Iterator<Item = &QuerySolution> {
        self.solutions.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Value of `var` in the first row.
    #[must_use]
    pub fn first_value(&self, var: &str) -> Option<&str> {
        binding_value(self.solutions.first()?, var)
    }
}

/// Lexical value of `var` in `row`: the IRI, blank node id or literal text.
#[must_use]
pub fn binding_value<'a>(row: &'a QuerySolution, var: &str) -> Option<&'a str> {
    row.get(var).map(term_text)
}

fn term_text(term: &Term) -> &str {
    match term {
        Term::NamedNode(node) => node.as_str(),
        Term::BlankNode(node) => node.as_str(),
        Term::Literal(literal) => literal.value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_count_results() {
        let raw = r#"{
            "head": {"vars": ["total"]},
            "results": {"bindings": [
                {"total": {"type": "literal", "datatype": "http://www.w3.org/2001/XMLSchema#integer", "value": "42"}}
            ]}
        }"#;
        let results = SelectResults::parse(raw.as_bytes()).unwrap();
        assert_eq!(results.variables().iter().map(Variable::as_str).collect::<Vec<_>>(), ["total"]);
        assert_eq!(results.first_value("total"), Some("42"));
        assert_eq!(results.first_value("missing"), None);
    }

    #[test]
    fn iris_and_unbound_variables() {
        let raw = r#"{
            "head": {"vars": ["term", "prefLabel"]},
            "results": {"bindings": [
                {"term": {"type": "uri", "value": "http://data.parliament.uk/terms/42"}}
            ]}
        }"#;
        let results = SelectResults::parse(raw.as_bytes()).unwrap();
        let row = results.rows().next().unwrap();
        assert_eq!(binding_value(row, "term"), Some("http://data.parliament.uk/terms/42"));
        assert_eq!(binding_value(row, "prefLabel"), None);
    }

    #[test]
    fn empty_solution_sets() {
        let raw = r#"{"head": {"vars": ["total"]}, "results": {"bindings": []}}"#;
        let results = SelectResults::parse(raw.as_bytes()).unwrap();
        assert!(results.is_empty());
        assert_eq!(results.first_value("total"), None);
    }

    #[test]
    fn ask_answers_and_garbage_are_rejected() {
        let err = SelectResults::parse(br#"{"head": {}, "boolean": true}"#).unwrap_err();
        assert!(matches!(err, SparqlError::NotSolutions { .. }));

        let err = SelectResults::parse(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, SparqlError::Results { .. }));
    }
}
