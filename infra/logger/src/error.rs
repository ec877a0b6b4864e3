use std::borrow::Cow;

#[pdl_derive::pdl_error]
pub enum LoggerError {
    /// The log directory cannot host a rolling appender.
    #[error("Log file appender{}: {source}", format_context(.context))]
    Appender { source: tracing_appender::rolling::InitError, context: Option<Cow<'static, str>> },

    /// Another global subscriber won the race.
    #[error("Subscriber already installed{}: {source}", format_context(.context))]
    Subscriber {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },

    /// Blank name, zero retention, unknown level or unparsable filter.
    #[error("Invalid logging settings{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Logger error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
