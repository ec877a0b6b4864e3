use pdl_derive::pdl_error;
use std::borrow::Cow;

#[pdl_error]
pub enum FrameError {
    #[error("Frame read failed{}: {source}", format_context(.context))]
    Read {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let error: FrameError = "empty graph".into();
    assert_eq!(error.to_string(), "Internal error: empty graph");
}
