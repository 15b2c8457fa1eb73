//! # booking-utils
//!
//! Deterministic availability and pricing computation for coworking-space
//! bookings.
//!
//! Every resolver here is a pure function over its inputs: opening-hours
//! records in, merged minute-of-day windows out; rate labels in, a tagged
//! rate shape out; rates plus stay length and guest count in, a price out.
//! Malformed input degrades to empty or zero results instead of failing, so
//! a booking form can recompute on every keystroke.
//!
//! ## Modules
//!
//! - [`availability`] — weekly opening records → per-weekday windows, arrival checks
//! - [`rate`] — free-text rate labels → fixed / range / hourly shapes
//! - [`pricing`] — rate-tier selection and totals
//! - [`options`] — stay-hour picklists consistent with an area's rates
//! - [`booking`] — booking-creation payloads and submission failures
//! - [`area`] — areas and rates as the booking API returns them
//! - [`currency`] — peso formatting for labels
//! - [`config`] — display timezone configuration
//! - [`error`] — Error types

pub mod area;
pub mod availability;
pub mod booking;
pub mod config;
pub mod currency;
pub mod error;
pub mod options;
pub mod pricing;
pub mod rate;

pub use area::{Area, AreaRate, EntityId};
pub use availability::{
    is_within, merge_windows, minutes_to_time_value, normalize_availability,
    normalize_availability_with_options, parse_time_value, windows_for_date, AvailabilityMap,
    AvailabilityRecord, AvailabilityWindow, DayOfWeek, TimeValue,
};
pub use booking::{submission_error, BookingDraft, BookingRequest};
pub use config::{AvailabilityOptions, DEFAULT_TIMEZONE, TIMEZONE_ENV};
pub use error::BookingError;
pub use options::{build_rate_options, default_fallback_options, RateOption};
pub use pricing::{resolve_pricing, PricingDetails, PricingTier};
pub use rate::{parse_rate_unit, ParsedRateUnit};
