//! Token helpers shared by the rules engine, reports and the command dispatcher

use crate::core::error::{RegistryError, Result};

/// Normalize a name for case-insensitive identity.
///
/// Every program, subject and command lookup goes through this function.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive name comparison via [`name_key`]
#[must_use]
pub fn same_name(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

/// Characters a stored name may not contain; they delimit persisted fields
pub const RESERVED_NAME_CHARS: [char; 4] = ['|', ';', '\n', '\r'];
/// Program names also end at the first `:` of a program line
pub const RESERVED_PROGRAM_CHARS: [char; 5] = ['|', ';', ':', '\n', '\r'];

/// Validate a name field before it is stored
///
/// # Errors
/// Returns `EmptyField` for a blank value, or `ReservedCharacter` when the
/// value contains one of `reserved`
pub fn require_name<'a>(
    entity: &'static str,
    field: &'static str,
    value: &'a str,
    reserved: &[char],
) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(RegistryError::EmptyField { entity, field });
    }
    match value.chars().find(|c| reserved.contains(c)) {
        Some(character) => Err(RegistryError::ReservedCharacter {
            entity,
            field,
            character,
        }),
        None => Ok(value),
    }
}

/// Returns true when `value` looks like a number: digits, optionally followed by
/// one `.` or `,` separator and more digits (e.g. `12`, `5.50`, `3,5`).
#[must_use]
pub fn is_number(value: &str) -> bool {
    let (whole, fraction) = match value.find(['.', ',']) {
        Some(idx) => (&value[..idx], Some(&value[idx + 1..])),
        None => (value, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}

/// Parse a non-negative integer token
///
/// # Errors
/// Returns `ExpectedNumber` when the token is not an integer
pub fn parse_int(value: &str) -> Result<u32> {
    if !is_number(value) {
        return Err(RegistryError::ExpectedNumber(value.to_string()));
    }
    value
        .parse::<u32>()
        .map_err(|_| RegistryError::ExpectedNumber(value.to_string()))
}

/// Parse a decimal token; `,` is accepted as the decimal separator
///
/// # Errors
/// Returns `ExpectedNumber` when the token is not a decimal number
pub fn parse_decimal(value: &str) -> Result<f64> {
    if !is_number(value) {
        return Err(RegistryError::ExpectedNumber(value.to_string()));
    }
    value
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| RegistryError::ExpectedNumber(value.to_string()))
}

/// Reject numeric-looking tokens where text is expected
///
/// # Errors
/// Returns `ExpectedText` when the token looks numeric
pub fn require_text(value: &str) -> Result<&str> {
    if is_number(value) {
        Err(RegistryError::ExpectedText(value.to_string()))
    } else {
        Ok(value)
    }
}

/// Split an operator command line into tokens.
///
/// Tokens are separated by whitespace; a double-quoted run forms a single token
/// so names with spaces can be passed (`enrollin 1001 "Data Structures"`).
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    tokens
}
