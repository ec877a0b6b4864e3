use pdl_elastic::ElasticError;
use pdl_resources::ResourcesError;
use std::borrow::Cow;

/// A specialized [`SearchError`] enum of this crate.
#[pdl_derive::pdl_error]
pub enum SearchError {
    #[error("Search cluster error{}: {source}", format_context(.context))]
    Elastic { source: ElasticError, context: Option<Cow<'static, str>> },

    /// Reading resources to index failed.
    #[error("Resource read failed{}: {source}", format_context(.context))]
    Resources { source: ResourcesError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal search error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<SearchError> for pdl_kernel::server::ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Elastic { .. } | SearchError::Resources { .. } => {
                Self::upstream(err.to_string())
            },
            SearchError::Internal { message, context } => Self::Internal { message, context },
        }
    }
}
