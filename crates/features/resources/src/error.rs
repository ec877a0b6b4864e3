use pdl_kernel::pagination::PaginationError;
use pdl_rest::RestError;
use std::borrow::Cow;

/// A specialized [`ResourcesError`] enum of this crate.
#[pdl_derive::pdl_error]
pub enum ResourcesError {
    /// Rejected request parameter (sort field, sort order, term id).
    #[error("{message}")]
    InvalidArgument { message: Cow<'static, str> },

    #[error("{source}")]
    Pagination { source: PaginationError, context: Option<Cow<'static, str>> },

    /// Upstream URL could not be assembled.
    #[error("REST upstream error{}: {source}", format_context(.context))]
    Rest { source: RestError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal resources error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ResourcesError {
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }
}

#[cfg(feature = "server")]
impl From<ResourcesError> for pdl_kernel::server::ApiError {
    fn from(err: ResourcesError) -> Self {
        match err {
            ResourcesError::InvalidArgument { message } => Self::invalid_argument(message),
            ResourcesError::Pagination { source, .. } => source.into(),
            ResourcesError::Rest { .. } => Self::upstream(err.to_string()),
            ResourcesError::Internal { message, context } => Self::Internal { message, context },
        }
    }
}
