//! Cocktails-per-guest advice for a fest plan.

use std::{fmt, num::NonZeroU32};

use crate::FestPlan;

/// Cocktails per guest a fest should aim for.
pub const TARGET_RATIO: f64 = 2.0;
/// At or below this ratio the plan is too small.
pub const LOW_RATIO: f64 = 1.6;
/// At or above this ratio the plan is too large.
pub const HIGH_RATIO: f64 = 2.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Low,
    Ok,
    High,
}

impl Verdict {
    fn from_ratio(ratio: f64) -> Self {
        if ratio <= LOW_RATIO {
            Verdict::Low
        } else if ratio >= HIGH_RATIO {
            Verdict::High
        } else {
            Verdict::Ok
        }
    }

    /// Human readable advice.
    #[must_use]
    pub const fn advice(self) -> &'static str {
        match self {
            Verdict::Low => "This ratio should be around 2, it is a bit low.",
            Verdict::Ok => {
                "This ratio should be around 2, so it is looking good. Remember not to plan for too many people ;)"
            }
            Verdict::High => "This ratio should be around 2, it is a bit high.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Low => "LOW",
            Verdict::Ok => "OK",
            Verdict::High => "HIGH",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatioAdvice {
    pub total_planned: u64,
    pub guests: NonZeroU32,
    pub ratio: f64,
    pub verdict: Verdict,
}

impl fmt::Display for RatioAdvice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You are currently planning for {} cocktails and {} guests. That makes for {:.2} cocktails/guest",
            self.total_planned, self.guests, self.ratio
        )
    }
}

/// Compare the planned servings with the expected guests.
#[must_use]
pub fn advise_ratio(plan: &FestPlan, guests: NonZeroU32) -> RatioAdvice {
    let total_planned: u64 = plan.values().map(|count| u64::from(*count)).sum();
    let ratio = total_planned as f64 / f64::from(guests.get());
    RatioAdvice {
        total_planned,
        guests,
        ratio,
        verdict: Verdict::from_ratio(ratio),
    }
}
