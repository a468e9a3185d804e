//! Free-text input masks and validators for the quiz screens.
//!
//! All transforms work on the ASCII digits of the raw input and ignore
//! everything else, so pasting `R$ 3.000,00` or `(11) 9...` behaves the
//! same as typing bare digits.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Non-breaking space the pt-BR locale puts between `R$` and the amount.
const NBSP: char = '\u{a0}';

/// Digits in a complete mobile number with area code.
pub const PHONE_DIGITS: usize = 11;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Validation failures surfaced inline next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Insira um número válido com DDD (11 dígitos)")]
    Phone,
    #[error("Por favor, insira um email válido")]
    Email,
}

fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Parse a digit string, saturating at `u64::MAX` rather than overflowing.
fn digits_to_u64(digits: &str) -> u64 {
    digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

/// Group an integer with `.` every three digits: 1234567 → "1.234.567".
fn group_thousands(value: u64) -> String {
    let plain = value.to_string();
    let mut out = String::with_capacity(plain.len() + plain.len() / 3);
    for (i, ch) in plain.chars().enumerate() {
        if i > 0 && (plain.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Format raw currency input as whole reais: "3000" → "R$ 3.000".
///
/// Input without any digit renders as an empty string.
pub fn format_currency_input(raw: &str) -> String {
    let digits = digits(raw);
    if digits.is_empty() {
        return String::new();
    }
    format!("R${NBSP}{}", group_thousands(digits_to_u64(&digits)))
}

/// Parse currency input into whole reais; no digits parses to zero.
pub fn parse_currency_input(raw: &str) -> u64 {
    digits_to_u64(&digits(raw))
}

/// Format an amount for the results page, with centavos: 128500 → "R$ 128.500,00".
pub fn format_currency(value: u64) -> String {
    format!("R${NBSP}{},00", group_thousands(value))
}

/// Apply the `(DD) DDDDD-DDDD` mask progressively as digits are typed.
///
/// Digits beyond the eleventh are dropped.
pub fn format_phone(raw: &str) -> String {
    let d = digits(raw);
    match d.len() {
        0..=2 => d,
        3..=7 => format!("({}) {}", &d[..2], &d[2..]),
        8..=11 => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
        _ => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..11]),
    }
}

/// A phone number is valid when exactly eleven digits remain after stripping the mask.
pub fn validate_phone(phone: &str) -> Result<(), InputError> {
    if digits(phone).len() == PHONE_DIGITS {
        Ok(())
    } else {
        Err(InputError::Phone)
    }
}

/// Loose `local@domain.tld` check: one `@`, no whitespace, a dot after the `@`.
pub fn validate_email(email: &str) -> Result<(), InputError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(InputError::Email)
    }
}
