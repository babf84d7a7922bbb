//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API, except for
//! [`parse_fest_date`]. They centralize validation so the engine enforces the
//! same invariants for the shell, the admin CLI and the CSV import.

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Storage format of fest dates.
pub(crate) const FEST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize a cocktail or ingredient name: NFC, trimmed, inner whitespace
/// collapsed to a single space.
pub(crate) fn normalize_name(value: &str, label: &str) -> ResultEngine<String> {
    let nfc: String = value.nfc().collect();
    let collapsed = nfc.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(collapsed)
}

/// A per-serving recipe quantity: finite and strictly positive.
pub(crate) fn validate_serving(ingredient: &str, liters: f64) -> ResultEngine<()> {
    if !liters.is_finite() || liters <= 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "amount of '{ingredient}' must be > 0, got {liters}"
        )));
    }
    Ok(())
}

/// A stock level: finite and not negative.
pub(crate) fn validate_stock(ingredient: &str, liters: f64) -> ResultEngine<()> {
    if !liters.is_finite() || liters < 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "available '{ingredient}' must be >= 0, got {liters}"
        )));
    }
    Ok(())
}

/// Parse a fest date in `YYYY-MM-DD` form.
pub fn parse_fest_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), FEST_DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(format!("'{value}' is not YYYY-MM-DD")))
}

pub(crate) fn format_fest_date(date: NaiveDate) -> String {
    date.format(FEST_DATE_FORMAT).to_string()
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::KeyNotFound(format!("invalid {label} id")))
}
