//! Input validation shared by every write path.
//!
//! Checks run before anything touches the database, so a rejected form never
//! leaves a partial write behind.

use crate::errors::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Longest accepted phone number, in digits
pub const MAX_PHONE_DIGITS: usize = 11;

/// Largest amount a single rate, payment, expense or movement may carry
pub const MAX_AMOUNT: i64 = 1_000_000_000;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$").unwrap()
});

/// A phone number is digits only, at most [`MAX_PHONE_DIGITS`] long.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    !phone.is_empty()
        && phone.len() <= MAX_PHONE_DIGITS
        && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Loose `local@domain.tld` shape check.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Parses a whole-unit amount typed by a user.
///
/// Surrounding whitespace is ignored. Signs, decimals and grouping separators are
/// rejected; amounts carry no fractional part.
pub fn parse_amount(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::validation("amount", "must be a whole number"));
    }
    match trimmed.parse::<i64>() {
        Ok(amount) if amount <= MAX_AMOUNT => Ok(amount),
        _ => Err(Error::validation(
            "amount",
            format!("cannot exceed {MAX_AMOUNT}"),
        )),
    }
}

/// Trims `value` and rejects it when nothing is left.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Phone fields may be left blank; anything entered must be a valid number.
pub fn optional_phone(phone: &str) -> Result<String> {
    let trimmed = phone.trim();
    if !trimmed.is_empty() && !is_valid_phone(trimmed) {
        return Err(Error::validation(
            "phone",
            format!("must be at most {MAX_PHONE_DIGITS} digits"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Blank email becomes `None`; anything entered must look like an address.
pub fn optional_email(email: Option<&str>) -> Result<Option<String>> {
    match email.map(str::trim) {
        None | Some("") => Ok(None),
        Some(address) if is_valid_email(address) => Ok(Some(address.to_string())),
        Some(_) => Err(Error::validation("email", "is not a valid address")),
    }
}

/// Amounts of money paid or received must be strictly positive and at most
/// [`MAX_AMOUNT`].
pub const fn require_positive(amount: i64) -> Result<i64> {
    if amount <= 0 || amount > MAX_AMOUNT {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}
