use std::borrow::Cow;

/// A specialized [`DiscoveryError`] enum of this crate.
#[pdl_derive::pdl_error]
pub enum DiscoveryError {
    #[error("Unknown resource type: {id}")]
    UnknownResourceType { id: String },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal discovery error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<DiscoveryError> for pdl_kernel::server::ApiError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::UnknownResourceType { .. } => Self::not_found(err.to_string()),
            DiscoveryError::Internal { message, context } => Self::Internal { message, context },
        }
    }
}
