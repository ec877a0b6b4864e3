use std::borrow::Cow;

#[pdl_derive::pdl_error]
pub enum RestError {
    #[error("REST transport error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("REST upstream returned HTTP {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },

    #[error("Invalid upstream URL{}: {source}", format_context(.context))]
    Url { source: url::ParseError, context: Option<Cow<'static, str>> },

    #[error("Invalid REST client configuration{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
