//! Validation for free-text form fields.

use thiserror::Error;

/// A required text field failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field was absent or blank.
    #[error("{field} is required")]
    Missing {
        /// Human-readable field name.
        field: &'static str,
    },
    /// The field exceeds its column width.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Human-readable field name.
        field: &'static str,
        /// Maximum allowed length in characters.
        max: usize,
    },
}

/// Trim `value` and require it to be non-empty and at most `max` characters.
///
/// `max` of `None` means unbounded (e.g. a `TEXT` column).
///
/// # Errors
///
/// Returns `FieldError::Missing` for blank input and `FieldError::TooLong` when
/// the trimmed value is longer than `max`.
pub fn required_text(
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Missing { field });
    }
    if let Some(max) = max
        && trimmed.chars().count() > max
    {
        return Err(FieldError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(
            required_text("Title", "  Bike  ", Some(100)),
            Ok("Bike".to_owned())
        );
    }

    #[test]
    fn test_required_text_blank_is_missing() {
        assert_eq!(
            required_text("Contact", " \n ", Some(100)),
            Err(FieldError::Missing { field: "Contact" })
        );
    }

    #[test]
    fn test_required_text_too_long() {
        assert_eq!(
            required_text("Title", &"a".repeat(101), Some(100)),
            Err(FieldError::TooLong {
                field: "Title",
                max: 100
            })
        );
    }

    #[test]
    fn test_required_text_unbounded() {
        let long = "word ".repeat(2000);
        assert!(required_text("Description", &long, None).is_ok());
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        let err = FieldError::Missing { field: "Title" };
        assert_eq!(err.to_string(), "Title is required");
    }
}
