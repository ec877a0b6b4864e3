use pdl_derive::pdl_error;

#[pdl_error]
pub enum LookupError {
    #[status(404)]
    #[error("{message}")]
    Missing { message: String },

    #[status(400)]
    #[error("Bad input: {field}")]
    Invalid { field: String },
}

fn main() {
    let error = LookupError::Missing { message: "gone".to_owned() };
    assert_eq!(error.status_code(), 404);
}
