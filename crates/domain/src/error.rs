//! Unified error types for the domain layer
//!
//! Every compilation stage is infallible by construction; errors only arise when
//! parsing or validating authored data before it enters the engine.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Authored data broke a structural rule (e.g., a default vignette with a literal trigger)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for authoring-time defects.
    ///
    /// # Example
    /// ```ignore
    /// if stage.default_vignette.steps.is_empty() {
    ///     return Err(DomainError::validation("default vignette has no steps"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("default vignette has no steps");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: default vignette has no steps"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Stage", "birthday_party");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Stage"));
        assert!(err.to_string().contains("birthday_party"));
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown success level: GREAT");
        assert_eq!(err.to_string(), "Parse error: Unknown success level: GREAT");
    }
}
