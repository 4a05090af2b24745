//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::temporal::TemporalError;
use core_kernel::PortError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_not_found() {
    let error = CoreError::not_found("Entry not found");

    match error {
        CoreError::NotFound(msg) => assert_eq!(msg, "Entry not found"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_core_error_from_temporal_error() {
    let core_error: CoreError = TemporalError::InvalidTimezone("Nowhere/Else".to_string()).into();

    assert!(matches!(core_error, CoreError::Temporal(_)));
    assert!(core_error.to_string().contains("Nowhere/Else"));
}

#[test]
fn test_port_error_validation_field() {
    let error = PortError::validation_field("too long", "display_name");

    match error {
        PortError::Validation { message, field } => {
            assert_eq!(message, "too long");
            assert_eq!(field.as_deref(), Some("display_name"));
        }
        _ => panic!("Expected Validation error"),
    }
}
