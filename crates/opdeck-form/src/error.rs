use opdeck_core::ValueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    /// A required field was absent from an authority update. This is a
    /// structural error on the authority's side, not an operator mistake.
    #[error("required field `{0}` missing from update")]
    MissingField(String),
    /// Submission was attempted while some required field is unset.
    #[error("form is not ready to submit")]
    NotReady,
    #[error(transparent)]
    Value(#[from] ValueError),
}
