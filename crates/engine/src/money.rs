use std::{fmt, str::FromStr};

use crate::EngineError;

/// Price represented as **integer cents**.
///
/// Used for the unit price of an ingredient (cents per liter) and for the
/// sale price of a cocktail on a fest (cents per serving). Prices are never
/// negative.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let price = MoneyCents::new(12_34);
/// assert_eq!(price.cents(), 1234);
/// assert_eq!(price.to_string(), "12.34€");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals and negative values):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// assert!("-1".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new price from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the price is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Cost in (fractional) cents of `liters` at this price per liter.
    #[must_use]
    pub fn times_liters(self, liters: f64) -> f64 {
        liters * self.0 as f64
    }

    /// Revenue in (fractional) cents of `servings` sold at this price.
    #[must_use]
    pub fn times_servings(self, servings: u32) -> f64 {
        f64::from(servings) * self.0 as f64
    }
}

/// Formats a fractional amount of cents (e.g. a computed cost) as `x.yy€`.
#[must_use]
pub fn format_cents(cents: f64) -> String {
    format!("{:.2}€", cents / 100.0)
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let euros = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{euros}.{cents:02}€")
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects negative, empty and invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty price".to_string());
        let invalid = || EngineError::InvalidAmount("invalid price".to_string());
        let overflow = || EngineError::InvalidAmount("price too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }
        if trimmed.starts_with('-') {
            return Err(EngineError::InvalidAmount(
                "price must not be negative".to_string(),
            ));
        }

        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed).trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let euros_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if euros_str.is_empty() || !euros_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let euros: i64 = euros_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        euros
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .map(MoneyCents)
            .ok_or_else(overflow)
    }
}
