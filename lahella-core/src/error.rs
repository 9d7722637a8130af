//! Mapping error types.

use thiserror::Error;

/// Errors raised while converting a local record into a remote payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A field marked as required has no usable value in the local record.
    #[error("missing required field: {path}")]
    MissingRequired { path: String },
}

impl MappingError {
    pub fn missing(path: impl Into<String>) -> Self {
        MappingError::MissingRequired { path: path.into() }
    }

    /// The local path that caused the error.
    pub fn path(&self) -> &str {
        match self {
            MappingError::MissingRequired { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_message() {
        let err = MappingError::missing("title.fi");
        assert_eq!(err.to_string(), "missing required field: title.fi");
        assert_eq!(err.path(), "title.fi");
    }
}
