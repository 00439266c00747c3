//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu entries, customer names
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Numeric limits ──────────────────────────────────────────────────

/// Menu price ceiling in rupiah
pub const MAX_PRICE: i64 = 1_000_000_000;

/// Portions of one menu entry in one order, after merging repeated ids
pub const MAX_LINE_QUANTITY: i32 = 999;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that a number is not negative.
pub fn validate_non_negative(value: i64, field: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::with_message(
            shared::ErrorCode::ValueOutOfRange,
            format!("{field} must not be negative"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Nasi Goreng", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "description", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("enak".into()), "description", MAX_NOTE_LEN).is_ok());
        assert!(
            validate_optional_text(&Some("x".repeat(501)), "description", MAX_NOTE_LEN).is_err()
        );
    }

    #[test]
    fn test_non_negative() {
        assert!(validate_non_negative(0, "price").is_ok());
        let err = validate_non_negative(-1, "price").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
