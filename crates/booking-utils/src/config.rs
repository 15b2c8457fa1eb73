//! Resolver configuration.
//!
//! The only tunable is the display timezone used to read instant-typed
//! opening/closing values as wall-clock minutes.

use chrono_tz::Tz;

use crate::error::BookingError;

/// Environment variable naming the display timezone.
pub const TIMEZONE_ENV: &str = "AVAILABILITY_TIMEZONE";

/// Timezone used when nothing is configured.
pub const DEFAULT_TIMEZONE: &str = "Asia/Manila";

/// Options for [`normalize_availability_with_options`](crate::availability::normalize_availability_with_options).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityOptions {
    /// IANA timezone name (e.g. `"Asia/Manila"`).
    pub timezone: String,
}

impl Default for AvailabilityOptions {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl AvailabilityOptions {
    /// Options with an explicit timezone identifier.
    pub fn with_timezone(timezone: impl Into<String>) -> Self {
        Self {
            timezone: timezone.into(),
        }
    }

    /// Read [`TIMEZONE_ENV`], falling back to [`DEFAULT_TIMEZONE`] when it is
    /// unset or blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(TIMEZONE_ENV) {
            Some(tz) if !tz.trim().is_empty() => Self::with_timezone(tz.trim()),
            _ => Self::default(),
        }
    }

    /// Parse the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidTimezone`] if the name is not a valid
    /// IANA timezone.
    pub fn tz(&self) -> Result<Tz, BookingError> {
        parse_timezone(&self.timezone)
    }
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz, BookingError> {
    s.parse::<Tz>()
        .map_err(|_| BookingError::InvalidTimezone(format!("'{}'", s)))
}
