use thiserror::Error;

/// Errors raised by presenter construction and field access
#[derive(Debug, Error)]
pub enum PresenterError {
    /// The field was never declared on the presenter
    #[error("unknown field `{field}`")]
    UnknownField { field: String },

    #[error("field `{field}` is declared more than once")]
    DuplicateField { field: String },

    #[error("model name must not be blank")]
    BlankModelName,

    /// Declared values did not deserialize into the requested type
    #[error("could not extract typed values: {0}")]
    Extract(#[from] serde_json::Error),
}

impl PresenterError {
    pub fn unknown_field(field: impl Into<String>) -> Self {
        PresenterError::UnknownField { field: field.into() }
    }
}
