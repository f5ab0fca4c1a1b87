/// Input validators for account data.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, ValidationError};

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates an email address and returns its trimmed form.
pub fn is_valid_email(email: &str) -> Result<String, AppError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField("email")));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(AppError::Validation(ValidationError::TooShort(
            "email",
            MIN_EMAIL_LENGTH,
        )));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "email",
            MAX_EMAIL_LENGTH,
        )));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(AppError::Validation(ValidationError::InvalidFormat(
            "email",
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        for email in ["user@example.com", "a.b+tag@sub.domain.org"] {
            assert!(is_valid_email(email).is_ok(), "should accept {}", email);
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            is_valid_email("  user@example.com ").unwrap(),
            "user@example.com"
        );
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "notanemail", "user@", "@example.com", "user@@example.com"] {
            assert!(is_valid_email(email).is_err(), "should reject {:?}", email);
        }
    }
}
