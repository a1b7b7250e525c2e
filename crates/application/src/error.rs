//! Application error types

use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A case with the same name is already registered.
    #[error("duplicate test case: {0}")]
    DuplicateCase(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_case_names_the_case() {
        let err = ApplicationError::DuplicateCase("server test".to_string());
        assert_eq!(err.to_string(), "duplicate test case: server test");
    }
}
