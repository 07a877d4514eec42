use thiserror::Error;

/// Document-level problems that stop a compilation as a whole. Anomalies inside a single
/// schema or operation only degrade that entry and are logged instead.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum CompileError {
    #[error("OpenAPI document is missing required field '{field}'")]
    MissingField { field: String },

    #[error("Invalid OpenAPI document field '{field}'. Expected {expected}.")]
    InvalidField { field: String, expected: String },
}

impl CompileError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        CompileError::MissingField {
            field: field.into(),
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, expected: impl Into<String>) -> Self {
        CompileError::InvalidField {
            field: field.into(),
            expected: expected.into(),
        }
    }
}
