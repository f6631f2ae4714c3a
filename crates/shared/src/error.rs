//! Application-wide error types.
//!
//! Every manager returns [`AppResult`]. A failure carries one or more
//! human-readable messages that the presentation layer shows verbatim.

use std::borrow::Cow;
use std::collections::HashMap;

use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// One or more input validation failures.
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (e.g., duplicate code).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Report export failed.
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration could not be loaded or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a validation error from a single message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Returns the error code used in logs and audit records.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Export(_) => "EXPORT_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the human-readable messages for display.
    ///
    /// Validation errors yield one message per failed rule; every other
    /// variant yields exactly one message.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(messages) => messages.clone(),
            Self::NotFound(msg)
            | Self::BusinessRule(msg)
            | Self::Conflict(msg)
            | Self::Database(msg)
            | Self::Export(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => vec![msg.clone()],
        }
    }

    /// Returns true if the user can fix the problem by changing their input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Validation(_) | Self::BusinessRule(_) | Self::Conflict(_)
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        flatten_validation_errors(None, errors.errors(), &mut messages);
        messages.sort();
        Self::Validation(messages)
    }
}

fn flatten_validation_errors(
    prefix: Option<&str>,
    errors: &HashMap<Cow<'static, str>, ValidationErrorsKind>,
    out: &mut Vec<String>,
) {
    for (field, kind) in errors {
        let path = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err.message.as_ref().map_or_else(
                        || format!("{path} is invalid ({})", err.code),
                        ToString::to_string,
                    );
                    out.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                flatten_validation_errors(Some(&path), nested.errors(), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let item_path = format!("{path}[{index}]");
                    flatten_validation_errors(Some(&item_path), nested.errors(), out);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
