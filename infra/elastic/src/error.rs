use std::borrow::Cow;

#[pdl_derive::pdl_error]
pub enum ElasticError {
    #[error("Elasticsearch transport error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// Non-success status; `message` carries the start of the response body.
    #[error("Elasticsearch returned HTTP {status}{}: {message}", format_context(.context))]
    Status { status: u16, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid Elasticsearch URL{}: {source}", format_context(.context))]
    Url { source: url::ParseError, context: Option<Cow<'static, str>> },

    #[error("Elasticsearch payload error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid Elasticsearch client configuration{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
