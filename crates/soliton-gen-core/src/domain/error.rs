// ============================================================================
// domain/error.rs - GENERATION DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (results are carried across service boundaries by value)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Cannot rename {kind} '{name}': {reason}")]
    InvalidRename {
        kind: String,
        name: String,
        reason: String,
    },

    #[error("Operation '{operation}' is not supported for {kind} artifacts")]
    UnsupportedOperation {
        operation: &'static str,
        kind: String,
    },

    // ========================================================================
    // Conflict Errors (409-level equivalent)
    // ========================================================================
    #[error("{kind} '{name}' already exists at {existing}")]
    DuplicateArtifact {
        kind: String,
        name: String,
        existing: String,
    },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Domain '{domain}' not found")]
    DomainNotFound { domain: String },

    #[error("{kind} '{name}' not found")]
    ArtifactNotFound { kind: String, name: String },

    // ========================================================================
    // Source Grammar Violations
    // ========================================================================
    #[error("Cannot parse {kind} '{name}' from {path}: {reason}")]
    UnparseableArtifact {
        kind: String,
        name: String,
        path: String,
        reason: String,
    },
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidIdentifier`].
    pub fn invalid_identifier(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`DomainError::InvalidField`].
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidIdentifier { value, .. } => vec![
                format!("'{value}' cannot be used as a Go identifier"),
                "Use letters, digits and underscores only".into(),
                "Start with a letter or underscore".into(),
                "Examples: Order, OrderItem, order_item".into(),
            ],
            Self::InvalidField { .. } => vec![
                "List supported field types: soliton-gen field-types".into(),
                "Enum fields need values: status:enum(active|inactive)".into(),
            ],
            Self::DomainNotFound { domain } => vec![
                format!("Generate the domain first: soliton-gen domain {domain}"),
                "List existing domains: soliton-gen list".into(),
            ],
            Self::DuplicateArtifact { existing, .. } => vec![
                format!("An artifact with the same canonical name lives in {existing}"),
                "Use --force to generate it anyway".into(),
                "Or pick a name that differs by more than case".into(),
            ],
            Self::ArtifactNotFound { kind, .. } => vec![
                format!("List existing {kind} artifacts: soliton-gen list"),
                "Names are matched case-insensitively".into(),
            ],
            Self::UnparseableArtifact { path, .. } => vec![
                format!("{path} no longer matches the generated layout"),
                "Inspect the raw file: soliton-gen source <kind> <name>".into(),
            ],
            Self::InvalidRename { .. } => vec!["Choose a different new name".into()],
            Self::UnsupportedOperation { .. } => {
                vec![
                    "Rename is available for value objects, specs, policies, events \
                     and event handlers"
                        .into(),
                ]
            }
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{field}'")]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidIdentifier { .. }
            | Self::InvalidField { .. }
            | Self::MissingRequiredField { .. }
            | Self::InvalidRename { .. }
            | Self::UnsupportedOperation { .. } => ErrorCategory::Validation,
            Self::DuplicateArtifact { .. } => ErrorCategory::Conflict,
            Self::DomainNotFound { .. } | Self::ArtifactNotFound { .. } => ErrorCategory::NotFound,
            Self::UnparseableArtifact { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_not_found_is_not_found() {
        let err = DomainError::DomainNotFound {
            domain: "order".into(),
        };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions().iter().any(|s| s.contains("domain order")));
    }

    #[test]
    fn duplicate_suggests_force() {
        let err = DomainError::DuplicateArtifact {
            kind: "value object".into(),
            name: "Money".into(),
            existing: "internal/domain/order/value_object_money.go".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn invalid_identifier_message_names_value() {
        let err = DomainError::invalid_identifier("1abc", "starts with a digit");
        assert_eq!(
            err.to_string(),
            "Invalid identifier '1abc': starts with a digit"
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
