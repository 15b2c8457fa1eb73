//! Free-text rate "time unit" labels → structured rate shapes.
//!
//! Partners type rate labels by hand ("Per Hour", "2-4 hours", "3 hrs"), so
//! parsing is a chain of patterns where the first match wins:
//!
//! 1. an hourly keyword (`per hour`, `hourly`, `/hr`, `/hour`) → [`ParsedRateUnit::Hourly`]
//! 2. a numeric range `N-M`, `N to M`, `N–M`, `N—M` with `M >= N` → [`ParsedRateUnit::Range`]
//! 3. the first number `N > 0` → [`ParsedRateUnit::Fixed`]
//!
//! Keyword detection runs before any digit is looked at, and ranges before
//! single numbers, so "2-4 hours" never reads as a fixed 2 hours.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const HOURLY_KEYWORDS: [&str; 4] = ["per hour", "hourly", "/hr", "/hour"];

static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:-|to|–|—)\s*(\d+(?:\.\d+)?)").expect("range pattern")
});

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern"));

/// The shape of a rate, derived from its time-unit label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ParsedRateUnit {
    /// Exactly `hours` hours.
    Fixed { hours: f64 },
    /// Anywhere from `min_hours` to `max_hours` inclusive.
    Range { min_hours: f64, max_hours: f64 },
    /// Charged per hour of stay.
    Hourly,
}

impl ParsedRateUnit {
    /// Lower bound in hours. Hourly rates report the 1-hour sentinel.
    pub fn min_hours(&self) -> f64 {
        match *self {
            ParsedRateUnit::Fixed { hours } => hours,
            ParsedRateUnit::Range { min_hours, .. } => min_hours,
            ParsedRateUnit::Hourly => 1.0,
        }
    }

    /// Upper bound in hours; hourly rates have none.
    pub fn max_hours(&self) -> Option<f64> {
        match *self {
            ParsedRateUnit::Fixed { hours } => Some(hours),
            ParsedRateUnit::Range { max_hours, .. } => Some(max_hours),
            ParsedRateUnit::Hourly => None,
        }
    }

    pub fn is_hourly(&self) -> bool {
        matches!(self, ParsedRateUnit::Hourly)
    }
}

/// Parse a rate's time-unit label.
///
/// Returns `None` for labels with no hourly keyword and no positive number.
///
/// # Examples
///
/// ```
/// use booking_utils::rate::{parse_rate_unit, ParsedRateUnit};
///
/// assert_eq!(parse_rate_unit("Per Hour"), Some(ParsedRateUnit::Hourly));
/// assert_eq!(
///     parse_rate_unit("2-4 hours"),
///     Some(ParsedRateUnit::Range { min_hours: 2.0, max_hours: 4.0 })
/// );
/// assert_eq!(parse_rate_unit("3 hours"), Some(ParsedRateUnit::Fixed { hours: 3.0 }));
/// assert_eq!(parse_rate_unit(""), None);
/// ```
pub fn parse_rate_unit(label: &str) -> Option<ParsedRateUnit> {
    let normalized = label.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if HOURLY_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        return Some(ParsedRateUnit::Hourly);
    }

    if let Some(caps) = RANGE.captures(&normalized) {
        let min = caps[1].parse::<f64>().ok();
        let max = caps[2].parse::<f64>().ok();
        if let (Some(min_hours), Some(max_hours)) = (min, max) {
            if max_hours >= min_hours {
                return Some(ParsedRateUnit::Range {
                    min_hours,
                    max_hours,
                });
            }
        }
    }

    let hours = NUMBER.find(&normalized)?.as_str().parse::<f64>().ok()?;
    (hours > 0.0).then_some(ParsedRateUnit::Fixed { hours })
}
