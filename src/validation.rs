//! Parsing and validation of the answers users type during the listing dialogue.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Longest free-text answer accepted (in characters)
pub const MAX_ANSWER_LENGTH: usize = 255;

/// Telephone number: 10 to 13 digits, optionally prefixed with `+`
pub const PHONE_PATTERN: &str = r"^\+?[0-9]{10,13}$";

lazy_static! {
    static ref PHONE_REGEX: Regex =
        Regex::new(PHONE_PATTERN).expect("Phone pattern should be valid");
}

/// Recoverable validation failure for a single answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("answer is empty")]
    Empty,
    #[error("answer is longer than {} characters", MAX_ANSWER_LENGTH)]
    TooLong,
    #[error("answer is not a valid number")]
    InvalidNumber,
    #[error("answer is not a valid contact")]
    InvalidContact,
}

impl ValidationError {
    /// Localization key of the corrective message shown to the user
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::Empty => "error-empty-value",
            ValidationError::TooLong => "error-too-long",
            ValidationError::InvalidNumber => "error-invalid-number",
            ValidationError::InvalidContact => "error-invalid-contact",
        }
    }
}

/// Validates a free-text answer (city, date, time, car model).
///
/// Runs of whitespace, line breaks included, collapse to a single space so
/// an answer always renders as one line of the channel post.
pub fn validate_free_text(input: &str) -> Result<String, ValidationError> {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return Err(ValidationError::Empty);
    }

    if collapsed.chars().count() > MAX_ANSWER_LENGTH {
        return Err(ValidationError::TooLong);
    }

    Ok(collapsed)
}

/// Parses the number of persons; zero is not a valid party size
pub fn parse_party_size(input: &str) -> Result<NonZeroU32, ValidationError> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(ValidationError::InvalidNumber)
}

/// Parses a non-negative price. Both `12.50` and `12,50` are accepted.
pub fn parse_price(input: &str) -> Result<Decimal, ValidationError> {
    let normalized = input.trim().replace(',', ".");
    match Decimal::from_str(&normalized) {
        Ok(price) if !price.is_sign_negative() => Ok(price),
        _ => Err(ValidationError::InvalidNumber),
    }
}

/// A contact is a Telegram username (`@...`) or a phone number, with no
/// whitespace inside
pub fn is_valid_contact(contact: &str) -> bool {
    if contact.chars().any(char::is_whitespace) {
        return false;
    }
    contact.starts_with('@') || PHONE_REGEX.is_match(contact)
}

pub fn validate_contact(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.chars().count() > MAX_ANSWER_LENGTH {
        return Err(ValidationError::TooLong);
    }
    if is_valid_contact(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidContact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_text_validation() {
        assert_eq!(validate_free_text("  Berlin ").unwrap(), "Berlin");
        assert_eq!(validate_free_text(""), Err(ValidationError::Empty));
        assert_eq!(validate_free_text("   "), Err(ValidationError::Empty));
        assert_eq!(
            validate_free_text(&"a".repeat(256)),
            Err(ValidationError::TooLong)
        );
        // Umlauts count as one character each
        assert!(validate_free_text(&"ü".repeat(255)).is_ok());
    }

    #[test]
    fn test_free_text_is_kept_on_one_line() {
        assert_eq!(
            validate_free_text("Golf\n💵 Price: 0 euro\r\n@FakeTag").unwrap(),
            "Golf 💵 Price: 0 euro @FakeTag"
        );
        assert_eq!(validate_free_text("VW \t  Golf").unwrap(), "VW Golf");
        assert_eq!(validate_free_text("\n\r\n"), Err(ValidationError::Empty));
    }

    #[test]
    fn test_party_size() {
        assert_eq!(parse_party_size("2").unwrap().get(), 2);
        assert_eq!(parse_party_size(" 4 ").unwrap().get(), 4);
        assert_eq!(parse_party_size("0"), Err(ValidationError::InvalidNumber));
        assert_eq!(parse_party_size("-1"), Err(ValidationError::InvalidNumber));
        assert_eq!(parse_party_size("two"), Err(ValidationError::InvalidNumber));
        assert_eq!(parse_party_size("2.5"), Err(ValidationError::InvalidNumber));
    }

    #[test]
    fn test_price() {
        assert_eq!(parse_price("25").unwrap(), Decimal::from(25));
        assert_eq!(parse_price("12,50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_price("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_price("-5"), Err(ValidationError::InvalidNumber));
        assert_eq!(parse_price("cheap"), Err(ValidationError::InvalidNumber));
    }

    #[test]
    fn test_contact_rules() {
        assert!(is_valid_contact("@alice"));
        assert!(is_valid_contact("+491701234567"));
        assert!(is_valid_contact("0170123456"));
        assert!(!is_valid_contact("12345"));
        assert!(!is_valid_contact("+12345678901234"));
        assert!(!is_valid_contact("alice"));
        assert!(!is_valid_contact("0170 1234567"));
        assert!(!is_valid_contact("@alice\n@FakeTag"));
    }

    #[test]
    fn test_contact_is_trimmed() {
        assert_eq!(validate_contact(" @bob ").unwrap(), "@bob");
        assert_eq!(validate_contact("12345"), Err(ValidationError::InvalidContact));
    }

    #[test]
    fn test_every_error_has_a_message_key() {
        for error in [
            ValidationError::Empty,
            ValidationError::TooLong,
            ValidationError::InvalidNumber,
            ValidationError::InvalidContact,
        ] {
            assert!(error.message_key().starts_with("error-"));
        }
    }
}
