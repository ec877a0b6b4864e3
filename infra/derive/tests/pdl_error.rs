use pdl_derive::pdl_error;
use std::borrow::Cow;

#[pdl_error]
pub enum UpstreamError {
    #[status(502)]
    #[error("Upstream I/O{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[status(404)]
    #[error("{message}")]
    Missing { message: String },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_upstream() -> Result<(), std::io::Error> {
    Err(std::io::Error::other("connection reset"))
}

#[test]
fn context_is_attached_to_source_errors() {
    let err = read_upstream().context("fetching terms").unwrap_err();
    assert_eq!(err.to_string(), "Upstream I/O (fetching terms): connection reset");
}

#[test]
fn context_can_be_replaced_on_own_errors() {
    let result: Result<(), UpstreamError> = Err("broken frame".into());
    let err = result.context("framing").unwrap_err();
    assert_eq!(err.to_string(), "Internal error (framing): broken frame");
}

#[test]
fn from_source_leaves_context_empty() {
    let err: UpstreamError = std::io::Error::other("eof").into();
    assert_eq!(err.to_string(), "Upstream I/O: eof");
}

#[test]
fn status_codes_follow_annotations() {
    let io: UpstreamError = std::io::Error::other("eof").into();
    assert_eq!(io.status_code(), 502);
    assert_eq!(UpstreamError::Missing { message: "x".to_owned() }.status_code(), 404);
    assert_eq!(UpstreamError::from("oops").status_code(), 500);
}
