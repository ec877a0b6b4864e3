use pdl_sparql::SparqlError;
use std::borrow::Cow;

/// A specialized [`TermsError`] enum of this crate.
#[pdl_derive::pdl_error]
pub enum TermsError {
    #[error("Terms query failed{}: {source}", format_context(.context))]
    Sparql { source: SparqlError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal terms error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
