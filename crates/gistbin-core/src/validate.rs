//! Submission validation.
//!
//! Checks run in a fixed order and the first violation wins, so a request
//! without content always reports [`ValidationError::ContentRequired`] no
//! matter what else is wrong with it. Lengths count UTF-16 code units,
//! the unit the creator form measures in.

use crate::error::ValidationError;
use crate::limits::Limits;

/// Validate a submission against `limits`.
///
/// `name` and `code` are optional; an empty string counts as absent for the
/// name and the minimum-length check, matching how the create form submits
/// blank fields.
pub fn validate_submission(
    limits: &Limits,
    content: Option<&str>,
    name: Option<&str>,
    code: Option<&str>,
) -> Result<(), ValidationError> {
    let content = match content {
        Some(c) if !c.is_empty() => c,
        _ => return Err(ValidationError::ContentRequired),
    };

    if let Some(name) = name.filter(|n| !n.is_empty()) {
        if utf16_len(name) > limits.max_name_length {
            return Err(ValidationError::NameTooLong {
                max: limits.max_name_length,
            });
        }
    }

    if utf16_len(content) > limits.max_content_length {
        return Err(ValidationError::ContentTooLong {
            max: limits.max_content_length,
        });
    }

    let code = code.unwrap_or_default();
    if utf16_len(code) > limits.max_short_code_length {
        return Err(ValidationError::CodeTooLong {
            max: limits.max_short_code_length,
        });
    }

    if !code.is_empty() && utf16_len(code) < limits.min_short_code_length {
        return Err(ValidationError::CodeTooShort {
            min: limits.min_short_code_length,
        });
    }

    Ok(())
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> Limits {
        Limits {
            max_short_code_length: 12,
            max_content_length: 20,
            min_short_code_length: 5,
            random_retries: 5,
            random_code_length: 8,
            max_name_length: 6,
        }
    }

    #[test]
    fn missing_content_wins_over_everything() {
        let l = limits();
        let long = "x".repeat(100);
        for content in [None, Some("")] {
            let err = validate_submission(&l, content, Some(&long), Some(&long)).unwrap_err();
            assert_eq!(err, ValidationError::ContentRequired);
            let err = validate_submission(&l, content, None, Some("ab")).unwrap_err();
            assert_eq!(err, ValidationError::ContentRequired);
        }
    }

    #[test]
    fn name_checked_before_content_length() {
        let l = limits();
        let err = validate_submission(&l, Some(&"c".repeat(21)), Some("namexxx"), None).unwrap_err();
        assert_eq!(err, ValidationError::NameTooLong { max: 6 });
    }

    #[test]
    fn name_boundary() {
        let l = limits();
        assert!(validate_submission(&l, Some("hi"), Some("abcdef"), None).is_ok());
        assert_eq!(
            validate_submission(&l, Some("hi"), Some("abcdefg"), None).unwrap_err(),
            ValidationError::NameTooLong { max: 6 }
        );
    }

    #[test]
    fn content_boundary() {
        let l = limits();
        assert!(validate_submission(&l, Some(&"c".repeat(20)), None, None).is_ok());
        assert_eq!(
            validate_submission(&l, Some(&"c".repeat(21)), None, None).unwrap_err(),
            ValidationError::ContentTooLong { max: 20 }
        );
    }

    #[test]
    fn code_max_boundary() {
        let l = limits();
        assert!(validate_submission(&l, Some("hi"), None, Some(&"k".repeat(12))).is_ok());
        assert_eq!(
            validate_submission(&l, Some("hi"), None, Some(&"k".repeat(13))).unwrap_err(),
            ValidationError::CodeTooLong { max: 12 }
        );
    }

    #[test]
    fn code_min_boundary() {
        let l = limits();
        assert!(validate_submission(&l, Some("hi"), None, Some("abcde")).is_ok());
        assert_eq!(
            validate_submission(&l, Some("hi"), None, Some("abcd")).unwrap_err(),
            ValidationError::CodeTooShort { min: 5 }
        );
    }

    #[test]
    fn empty_name_and_code_are_absent() {
        let l = limits();
        assert!(validate_submission(&l, Some("hi"), Some(""), Some("")).is_ok());
    }

    #[test]
    fn lengths_count_utf16_units_not_bytes() {
        let l = limits();
        // Six two-byte characters, one unit each.
        assert!(validate_submission(&l, Some("hi"), Some("éééééé"), None).is_ok());
    }

    #[test]
    fn astral_characters_count_twice() {
        let l = limits();
        // Three emoji are six units: exactly the name limit.
        assert!(validate_submission(&l, Some("hi"), Some(&"😀".repeat(3)), None).is_ok());
        assert_eq!(
            validate_submission(&l, Some("hi"), Some(&"😀".repeat(4)), None).unwrap_err(),
            ValidationError::NameTooLong { max: 6 }
        );

        let defaults = Limits::default();
        assert_eq!(
            validate_submission(&defaults, Some("x"), Some(&"😀".repeat(33)), None).unwrap_err(),
            ValidationError::NameTooLong { max: 64 }
        );
        assert_eq!(
            validate_submission(&l, Some(&"😀".repeat(11)), None, None).unwrap_err(),
            ValidationError::ContentTooLong { max: 20 }
        );
    }
}
