//! Stay-duration picklist derived from an area's rates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::area::Area;
use crate::currency::format_php;
use crate::pricing::plural_hours;

/// One selectable stay length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOption {
    /// Stay length in whole hours.
    pub value: u32,
    pub label: String,
}

impl RateOption {
    pub fn new(value: u32, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }

    /// An option labelled "1 hour", "2 hours", ...
    pub fn for_hours(value: u32) -> Self {
        Self::new(value, plural_hours(f64::from(value)))
    }
}

/// Ranged rates are enumerated no further than this, or the largest fallback
/// hour when that is higher.
pub const MAX_OPTION_HOURS: u32 = 24;

/// The default picklist: 1 to 12 hours.
pub fn default_fallback_options() -> Vec<RateOption> {
    (1..=12).map(RateOption::for_hours).collect()
}

/// Build the stay-hour choices offered for `area`.
///
/// Every whole hour covered by a fixed or ranged rate becomes an option; the
/// first rate to claim an hour keeps it. When the area also has an hourly
/// rate, the unclaimed `fallback` hours are offered at the hourly price. With
/// nothing derivable, `fallback` is returned as-is. Output is sorted by hour.
///
/// Hours above [`MAX_OPTION_HOURS`] (or the largest fallback hour, if higher)
/// are never enumerated from a range.
pub fn build_rate_options(area: &Area, fallback: &[RateOption]) -> Vec<RateOption> {
    let ceiling = fallback
        .iter()
        .map(|option| option.value)
        .fold(MAX_OPTION_HOURS, u32::max);
    let mut claimed: BTreeMap<u32, RateOption> = BTreeMap::new();
    let mut hourly_price = None;

    for (rate, unit) in area.parsed_rates() {
        let Some(unit) = unit else { continue };
        if unit.is_hourly() {
            hourly_price.get_or_insert(rate.price_per_guest);
            continue;
        }

        let first = unit.min_hours().ceil().max(1.0);
        let last = unit
            .max_hours()
            .unwrap_or(unit.min_hours())
            .floor()
            .min(f64::from(ceiling));
        if first > last {
            continue;
        }
        for hour in first as u32..=last as u32 {
            claimed.entry(hour).or_insert_with(|| {
                RateOption::new(
                    hour,
                    format!(
                        "{} • {}/guest",
                        plural_hours(f64::from(hour)),
                        format_php(rate.price_per_guest)
                    ),
                )
            });
        }
    }

    if let Some(price) = hourly_price {
        for option in fallback {
            claimed.entry(option.value).or_insert_with(|| {
                RateOption::new(
                    option.value,
                    format!("{} • {}/guest/hour", option.label, format_php(price)),
                )
            });
        }
    }

    if claimed.is_empty() {
        let mut options = fallback.to_vec();
        options.sort_by_key(|option| option.value);
        return options;
    }
    claimed.into_values().collect()
}
