//! Pure validation rules applied to user input inside the conversation flows.
//! Each rule either returns the parsed value or a `ValidationError` whose
//! `Display` text is the corrective prompt shown to the user.

use crate::constants::{
    CONTACT_HANDLE_SIGIL, FILTER_KEYWORD, FILTER_LOCATION, FILTER_PRICE, PHONE_LEN, PHONE_PREFIX,
};
use crate::database::models::ListingField;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid price. Enter a non-negative number.")]
    Price,
    #[error("Invalid contact. Enter a phone number (89111111111) or @username.")]
    Contact,
    #[error("Invalid filters. Use the digits 1, 2, 3 (for example: 12).")]
    Filters,
    #[error("Invalid choice. Enter a number from 1 to 4.")]
    FieldChoice,
    #[error("The value cannot be empty.")]
    Empty,
}

/// One filter the caller asked for during a search, in the order typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCode {
    Keyword,
    Location,
    Price,
}

impl FilterCode {
    fn from_char(c: char) -> Option<Self> {
        match c {
            FILTER_KEYWORD => Some(Self::Keyword),
            FILTER_LOCATION => Some(Self::Location),
            FILTER_PRICE => Some(Self::Price),
            _ => None,
        }
    }
}

/// Accepts any string parsing as a finite number >= 0.
pub fn parse_price(input: &str) -> Result<f64, ValidationError> {
    let value: f64 = input.trim().parse().map_err(|_| ValidationError::Price)?;
    if value.is_finite() && value >= 0.0 {
        // Normalise "-0" to 0.
        Ok(value.abs())
    } else {
        Err(ValidationError::Price)
    }
}

/// A contact is either an `@handle` or an 11 digit phone number starting with `89`.
pub fn is_valid_contact(input: &str) -> bool {
    if input.starts_with(CONTACT_HANDLE_SIGIL) {
        return true;
    }
    input.len() == PHONE_LEN
        && input.starts_with(PHONE_PREFIX)
        && input.bytes().all(|b| b.is_ascii_digit())
}

pub fn parse_contact(input: &str) -> Result<String, ValidationError> {
    if is_valid_contact(input) {
        Ok(input.to_string())
    } else {
        Err(ValidationError::Contact)
    }
}

pub fn parse_filter_codes(input: &str) -> Result<Vec<FilterCode>, ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::Filters);
    }
    input
        .chars()
        .map(|c| FilterCode::from_char(c).ok_or(ValidationError::Filters))
        .collect()
}

pub fn parse_field_choice(input: &str) -> Result<ListingField, ValidationError> {
    input
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(ListingField::from_index)
        .ok_or(ValidationError::FieldChoice)
}

pub fn require_text(input: &str) -> Result<String, ValidationError> {
    if input.trim().is_empty() {
        Err(ValidationError::Empty)
    } else {
        Ok(input.to_string())
    }
}

/// Parses a numeric id argument (`"5"`), rejecting signs, blanks and overflow.
pub fn parse_id(arg: &str) -> Option<i64> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    arg.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_accepts_non_negative_numbers() {
        assert_eq!(parse_price("1500"), Ok(1500.0));
        assert_eq!(parse_price("0"), Ok(0.0));
        assert_eq!(parse_price(" 12.5 "), Ok(12.5));
        assert_eq!(parse_price("-0"), Ok(0.0));
    }

    #[test]
    fn price_rejects_garbage_and_negatives() {
        for bad in ["abc", "", "-5", "1,5", "NaN", "inf", "12abc"] {
            assert_eq!(parse_price(bad), Err(ValidationError::Price), "{bad}");
        }
    }

    #[test]
    fn contact_rules() {
        assert!(is_valid_contact("@bob"));
        assert!(is_valid_contact("89111111111"));
        assert!(!is_valid_contact("81111111111"));
        assert!(!is_valid_contact("891111"));
        assert!(!is_valid_contact("8911111111a"));
        assert!(!is_valid_contact("891111111111"));
        assert!(!is_valid_contact("bob"));
    }

    #[test]
    fn filter_codes_keep_typed_order() {
        assert_eq!(
            parse_filter_codes("31"),
            Ok(vec![FilterCode::Price, FilterCode::Keyword])
        );
        assert_eq!(parse_filter_codes(""), Err(ValidationError::Filters));
        assert_eq!(parse_filter_codes("14"), Err(ValidationError::Filters));
        assert_eq!(parse_filter_codes("1 2"), Err(ValidationError::Filters));
    }

    #[test]
    fn field_choice_bounds() {
        assert_eq!(parse_field_choice("2"), Ok(ListingField::Price));
        assert_eq!(parse_field_choice("0"), Err(ValidationError::FieldChoice));
        assert_eq!(parse_field_choice("5"), Err(ValidationError::FieldChoice));
        assert_eq!(parse_field_choice("x"), Err(ValidationError::FieldChoice));
    }

    #[test]
    fn ids_are_plain_digits() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("+1"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("99999999999999999999"), None);
    }
}
