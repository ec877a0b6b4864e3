use pdl_resources::ResourcesError;
use std::borrow::Cow;

/// A specialized [`LegacyError`] enum of this crate.
#[pdl_derive::pdl_error]
pub enum LegacyError {
    #[error("{source}")]
    Resources { source: ResourcesError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal legacy error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<LegacyError> for pdl_kernel::server::ApiError {
    fn from(err: LegacyError) -> Self {
        match err {
            LegacyError::Resources { source, .. } => source.into(),
            LegacyError::Internal { message, context } => Self::Internal { message, context },
        }
    }
}
