//! Brazilian real amounts
//!
//! The catalog returns prices as display strings (`"R$ 35.000,00"`). This
//! module turns them into numbers for the comparison shown by the CLI and
//! formats numbers back the same way.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::PriceQuote;

/// Errors that can occur when reading an amount
#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    /// The text is not a recognizable amount
    #[error("Invalid amount: '{0}'")]
    Invalid(String),
}

/// Parses a BRL display string such as `"R$ 35.000,00"`
///
/// `.` is read as the thousands separator and `,` as the decimal separator.
pub fn parse_brl(text: &str) -> Result<f64, MoneyError> {
    let invalid = || MoneyError::Invalid(text.to_string());

    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("R$").unwrap_or(trimmed);
    let normalized: String = digits
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.is_empty() {
        return Err(invalid());
    }
    let amount: f64 = normalized.parse().map_err(|_| invalid())?;
    if !amount.is_finite() {
        return Err(invalid());
    }
    Ok(amount)
}

/// Parses a user-entered amount, accepting `1234.56` as well as BRL notation
///
/// Without a comma, dots followed by groups of exactly three digits are
/// thousands separators (`30.000` is thirty thousand); any other single dot is
/// a decimal point.
pub fn parse_amount(text: &str) -> Result<f64, MoneyError> {
    let trimmed = text.trim();
    let plain = !trimmed.contains(',') && !trimmed.starts_with("R$");
    if plain && !has_thousands_groups(trimmed) {
        if let Ok(amount) = trimmed.parse::<f64>() {
            if amount.is_finite() {
                return Ok(amount);
            }
        }
    }
    parse_brl(trimmed)
}

fn has_thousands_groups(text: &str) -> bool {
    let mut groups = text.split('.');
    let head = groups.next().unwrap_or_default();
    let tail: Vec<&str> = groups.collect();
    !head.is_empty()
        && !tail.is_empty()
        && tail
            .iter()
            .all(|group| group.len() == 3 && group.chars().all(|c| c.is_ascii_digit()))
}

/// Formats an amount as `R$ 1.234,56` (negative as `-R$ 1.234,56`)
pub fn format_brl(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, fraction)
}

/// What was spent on a vehicle against its reference price
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub reference: f64,
    pub spent: f64,
    /// `reference - spent`; positive means the vehicle is worth more than it cost
    pub difference: f64,
}

impl Comparison {
    pub fn new(reference: f64, spent: f64) -> Self {
        Self {
            reference,
            spent,
            difference: reference - spent,
        }
    }

    /// Compares `spent` with the quote's reference value
    pub fn from_quote(quote: &PriceQuote, spent: f64) -> Result<Self, MoneyError> {
        Ok(Self::new(parse_brl(&quote.value)?, spent))
    }

    pub fn is_below_reference(&self) -> bool {
        self.difference >= 0.0
    }
}
