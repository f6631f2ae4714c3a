use super::*;
use validator::Validate;

#[derive(Validate)]
struct Probe {
    #[validate(length(min = 1, message = "Name is required"))]
    name: String,
    #[validate(range(min = 0, message = "Credit terms cannot be negative"))]
    credit_terms: i32,
    #[validate(length(max = 3))]
    currency: String,
}

#[test]
fn test_app_error_codes() {
    assert_eq!(AppError::NotFound("x".into()).error_code(), "NOT_FOUND");
    assert_eq!(
        AppError::validation("x").error_code(),
        "VALIDATION_ERROR"
    );
    assert_eq!(
        AppError::BusinessRule("x".into()).error_code(),
        "BUSINESS_RULE_VIOLATION"
    );
    assert_eq!(AppError::Conflict("x".into()).error_code(), "CONFLICT");
    assert_eq!(AppError::Database("x".into()).error_code(), "DATABASE_ERROR");
    assert_eq!(AppError::Export("x".into()).error_code(), "EXPORT_ERROR");
    assert_eq!(AppError::Config("x".into()).error_code(), "CONFIG_ERROR");
    assert_eq!(AppError::Internal("x".into()).error_code(), "INTERNAL_ERROR");
}

#[test]
fn test_validation_display_joins_messages() {
    let err = AppError::Validation(vec!["Code is required".into(), "Name is required".into()]);
    assert_eq!(
        err.to_string(),
        "Validation error: Code is required; Name is required"
    );
}

#[test]
fn test_messages_single_variant() {
    let err = AppError::BusinessRule("Period is closed".into());
    assert_eq!(err.messages(), vec!["Period is closed".to_string()]);
}

#[test]
fn test_user_errors() {
    assert!(AppError::validation("x").is_user_error());
    assert!(AppError::Conflict("x".into()).is_user_error());
    assert!(!AppError::Database("x".into()).is_user_error());
    assert!(!AppError::Internal("x".into()).is_user_error());
}

#[test]
fn test_from_validation_errors_collects_every_rule() {
    let probe = Probe {
        name: String::new(),
        credit_terms: -5,
        currency: "SGDX".into(),
    };
    let err: AppError = probe.validate().unwrap_err().into();

    let messages = err.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages.contains(&"Name is required".to_string()));
    assert!(messages.contains(&"Credit terms cannot be negative".to_string()));
    assert!(messages.iter().any(|m| m.starts_with("currency is invalid")));
}

#[test]
fn test_from_validation_errors_valid_input() {
    let probe = Probe {
        name: "Acme".into(),
        credit_terms: 30,
        currency: "SGD".into(),
    };
    assert!(probe.validate().is_ok());
}
