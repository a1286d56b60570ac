//! API handlers module

pub mod admins;
pub mod articles;
pub mod health;

use masthead_common::errors::{AppError, Result};

/// Required-field check: present and non-empty after trimming.
///
/// Validation happens before any persistence access, so a rejected
/// payload leaves no partial writes behind.
pub(crate) fn require_field(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::MissingField {
            field: field.to_string(),
        }),
    }
}

/// Required-list check: the list must be present
pub(crate) fn require_list(value: Option<Vec<String>>, field: &str) -> Result<Vec<String>> {
    value.ok_or_else(|| AppError::MissingField {
        field: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field() {
        assert_eq!(require_field(Some("value".into()), "f").unwrap(), "value");
        assert!(require_field(None, "f").is_err());
        assert!(require_field(Some("".into()), "f").is_err());
        assert!(require_field(Some("   ".into()), "f").is_err());
    }

    #[test]
    fn test_require_list() {
        assert!(require_list(Some(vec![]), "f").is_ok());
        assert!(require_list(None, "f").is_err());
    }
}
