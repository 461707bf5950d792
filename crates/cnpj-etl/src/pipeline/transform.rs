//! Shared transform helpers for the entity pipelines
//!
//! Pure functions only; the transform step performs no I/O.

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use std::str::FromStr;

/// Parse an RFB `YYYYMMDD` date.
///
/// Empty, wrong-length, non-numeric or calendar-invalid input all mean
/// "absent".
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 8 || !raw.is_ascii() {
        return None;
    }
    let year: i32 = raw[..4].parse().ok()?;
    let month: u32 = raw[4..6].parse().ok()?;
    let day: u32 = raw[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a monetary value with a comma decimal separator ("1000,00").
///
/// Unparsable or empty input falls back to 0.00; a bad capital value never
/// discards an otherwise valid row.
pub fn parse_decimal_comma(raw: &str) -> BigDecimal {
    let raw = raw.trim();
    if raw.is_empty() {
        return zero_money();
    }
    let normalized = raw.replace(',', ".");
    BigDecimal::from_str(&normalized).unwrap_or_else(|_| zero_money())
}

fn zero_money() -> BigDecimal {
    BigDecimal::zero().with_scale(2)
}

/// Trim a raw field; `None` when empty, optionally cut to `max_len` chars.
pub fn str_or_none(raw: &str, max_len: Option<usize>) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    Some(match max_len {
        Some(max) => truncated(s, max),
        None => s.to_string(),
    })
}

/// Cut a string to at most `max_len` characters
pub fn truncated(s: &str, max_len: usize) -> String {
    s.chars().take(max_len).collect()
}

/// Normalize an opt-in flag to "S", "N" or empty (anything else)
pub fn normalize_opcao(raw: &str) -> &'static str {
    match raw.trim().to_uppercase().as_str() {
        "S" => "S",
        "N" => "N",
        _ => "",
    }
}
