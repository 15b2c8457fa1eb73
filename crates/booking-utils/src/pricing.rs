//! Rate-tier selection and price computation.
//!
//! Given an area's rates, a stay length and a guest count, pick the rate that
//! applies and compute the total. Selection runs in priority order:
//!
//! 1. **Bracket**: a fixed or ranged rate whose hours contain the stay; the
//!    narrowest one wins (see [`tier_order`]). Priced per guest.
//! 2. **Hourly**: the first hourly rate with a positive price. Priced per guest
//!    per hour.
//! 3. **Fallback**: the first rate in list order, parseable or not. Priced per
//!    guest.
//! 4. **None**: no rates at all; the total is zero.
//!
//! Resolution never fails. Missing or malformed data degrades to a lower tier.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::area::{Area, AreaRate};
use crate::currency::format_php;
use crate::rate::ParsedRateUnit;

/// Which selection branch produced a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    Bracket,
    Hourly,
    Fallback,
    None,
}

/// A computed price for one (area, stay, guests) query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDetails {
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_guest_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub uses_hourly_multiplier: bool,
    pub tier: PricingTier,
}

impl PricingDetails {
    fn none() -> Self {
        Self {
            total: Decimal::ZERO,
            per_guest_rate: None,
            label: None,
            uses_hourly_multiplier: false,
            tier: PricingTier::None,
        }
    }
}

/// A parsed, non-hourly rate considered for bracket selection.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    rate: &'a AreaRate,
    min_hours: f64,
    max_hours: f64,
}

impl Candidate<'_> {
    fn span(&self) -> f64 {
        self.max_hours - self.min_hours
    }

    fn contains(&self, stay: f64) -> bool {
        stay >= self.min_hours && stay <= self.max_hours
    }
}

/// Total order used to choose among matching brackets; the minimum wins.
///
/// 1. span (`max - min`) ascending;
/// 2. `min_hours` descending, so the higher-starting bracket wins a tie;
/// 3. otherwise equal, leaving earlier sorted position to break the tie.
fn tier_order(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.span()
        .total_cmp(&b.span())
        .then_with(|| b.min_hours.total_cmp(&a.min_hours))
}

/// Sort key for the parsed rate list; hourly and unparseable rates go last.
fn sort_key(unit: Option<ParsedRateUnit>) -> (f64, f64) {
    match unit {
        Some(unit) if !unit.is_hourly() => (
            unit.min_hours(),
            unit.max_hours().unwrap_or(f64::INFINITY),
        ),
        _ => (f64::INFINITY, f64::INFINITY),
    }
}

/// Resolve the price of a stay in `area`.
///
/// `stay_hours` and `guests` are clamped to at least 1.
///
/// # Examples
///
/// ```
/// use booking_utils::area::{Area, AreaRate};
/// use booking_utils::pricing::resolve_pricing;
/// use rust_decimal::Decimal;
///
/// let area = Area::new(1, vec![
///     AreaRate::new(1, "1-3 hours", Decimal::new(500, 0)),
///     AreaRate::new(2, "per hour", Decimal::new(150, 0)),
/// ]);
///
/// let bracket = resolve_pricing(&area, 2, 4);
/// assert_eq!(bracket.total, Decimal::new(2000, 0));
/// assert!(!bracket.uses_hourly_multiplier);
///
/// let hourly = resolve_pricing(&area, 10, 4);
/// assert_eq!(hourly.total, Decimal::new(6000, 0));
/// assert!(hourly.uses_hourly_multiplier);
/// ```
pub fn resolve_pricing(area: &Area, stay_hours: u32, guests: u32) -> PricingDetails {
    let stay = stay_hours.max(1);
    let guests = Decimal::from(guests.max(1));

    let mut parsed: Vec<(&AreaRate, Option<ParsedRateUnit>)> = area.parsed_rates().collect();
    parsed.sort_by(|(_, a), (_, b)| {
        let (a_min, a_max) = sort_key(*a);
        let (b_min, b_max) = sort_key(*b);
        a_min.total_cmp(&b_min).then_with(|| a_max.total_cmp(&b_max))
    });

    let bracket = parsed
        .iter()
        .filter_map(|&(rate, unit)| match unit {
            Some(unit) if !unit.is_hourly() => unit.max_hours().map(|max_hours| Candidate {
                rate,
                min_hours: unit.min_hours(),
                max_hours,
            }),
            _ => None,
        })
        .filter(|candidate| candidate.contains(f64::from(stay)))
        .min_by(tier_order);

    if let Some(candidate) = bracket {
        let price = candidate.rate.price_per_guest;
        debug!(
            rate = %candidate.rate.id,
            stay,
            min_hours = candidate.min_hours,
            max_hours = candidate.max_hours,
            "pricing from bracket"
        );
        return PricingDetails {
            total: price * guests,
            per_guest_rate: Some(price),
            label: Some(format!(
                "{} per guest • {}",
                format_php(price),
                describe_hours(candidate.min_hours, candidate.max_hours)
            )),
            uses_hourly_multiplier: false,
            tier: PricingTier::Bracket,
        };
    }

    let hourly = parsed.iter().find(|(rate, unit)| {
        unit.is_some_and(|u| u.is_hourly()) && rate.price_per_guest > Decimal::ZERO
    });
    if let Some((rate, _)) = hourly {
        let price = rate.price_per_guest;
        debug!(rate = %rate.id, stay, "pricing from hourly rate");
        return PricingDetails {
            total: price * guests * Decimal::from(stay),
            per_guest_rate: Some(price),
            label: Some(format!("{} per guest / hour", format_php(price))),
            uses_hourly_multiplier: true,
            tier: PricingTier::Hourly,
        };
    }

    if let Some(rate) = area.rates.first() {
        let price = rate.price_per_guest;
        debug!(rate = %rate.id, stay, "pricing from first listed rate");
        let unit = rate.time_unit.trim();
        let label = if unit.is_empty() {
            format!("{} per guest", format_php(price))
        } else {
            format!("{} per guest • {unit}", format_php(price))
        };
        return PricingDetails {
            total: price * guests,
            per_guest_rate: Some(price),
            label: Some(label),
            uses_hourly_multiplier: false,
            tier: PricingTier::Fallback,
        };
    }

    PricingDetails::none()
}

/// "3 hours", "1 hour", "2–4 hours".
pub(crate) fn describe_hours(min_hours: f64, max_hours: f64) -> String {
    if max_hours == min_hours {
        plural_hours(min_hours)
    } else {
        format!("{}–{} hours", format_hours(min_hours), format_hours(max_hours))
    }
}

pub(crate) fn plural_hours(hours: f64) -> String {
    if hours == 1.0 {
        "1 hour".to_string()
    } else {
        format!("{} hours", format_hours(hours))
    }
}

/// Whole hours print without a fractional part.
fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        format!("{hours}")
    }
}
