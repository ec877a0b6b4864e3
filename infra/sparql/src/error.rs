use std::borrow::Cow;

/// Failures talking to the triple store or shaping its answers.
#[pdl_derive::pdl_error]
pub enum SparqlError {
    /// Connection, TLS or timeout failures.
    #[error("SPARQL transport error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// The endpoint answered with a non-success status.
    #[error("SPARQL endpoint returned HTTP {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },

    /// The store gave up on the query (`Query interrupted`).
    #[error("SPARQL query timed out or failed{}: {message}", format_context(.context))]
    Interrupted { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid SPARQL response{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid SPARQL results document{}: {source}", format_context(.context))]
    Results { source: sparesults::QueryResultsParseError, context: Option<Cow<'static, str>> },

    /// A SELECT answered with a boolean.
    #[error("SPARQL endpoint returned a boolean where solutions were expected{}", format_context(.context))]
    NotSolutions { context: Option<Cow<'static, str>> },

    /// The JSON-LD document has a shape that cannot be framed.
    #[error("JSON-LD framing failed{}: {message}", format_context(.context))]
    Frame { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid SPARQL client configuration{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
