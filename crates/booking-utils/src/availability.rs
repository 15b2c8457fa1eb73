//! Weekly opening hours → per-weekday minute-of-day windows.
//!
//! Spaces publish their opening hours as loose per-day records: the day may
//! be a name, an index, or an arbitrary signed integer, and the times may be
//! bare `HH:MM`, ISO-ish strings, or full instants. This module normalizes
//! them into an [`AvailabilityMap`] that the booking form consults on every
//! date/time selection.
//!
//! # Day keys
//!
//! Raw records count days from Monday (`"monday"` and `0` are both Monday).
//! Normalization shifts every raw index by `+1 mod 7`, so map keys follow
//! [`chrono::Weekday::num_days_from_sunday`]: Monday is key `1`, Sunday is key `0`.
//! [`windows_for_date`] looks dates up with the same convention, which is why
//! the shift must be applied exactly once.
//!
//! # Functions
//!
//! - [`normalize_availability`] — raw records → [`AvailabilityMap`]
//! - [`windows_for_date`] — windows open on a calendar date
//! - [`is_within`] — whether an `HH:MM` arrival falls inside a window
//! - [`minutes_to_time_value`] / [`parse_time_value`] — `HH:MM` ↔ minutes

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AvailabilityOptions;

/// Minutes in a day; the exclusive upper bound of a window start.
pub const MINUTES_PER_DAY: u32 = 1440;

static BARE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("bare time pattern"));

static TRAILING_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\D)(\d{1,2}):(\d{2})(?::\d{2}(?:\.\d+)?)?(?:[Zz]|[+-]\d{2}(?::?\d{2})?)?$")
        .expect("trailing time pattern")
});

// ── Input records ───────────────────────────────────────────────────────────

/// A day-of-week as the API sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayOfWeek {
    /// Any integer; wrapped modulo 7.
    Index(i64),
    /// A weekday name or a numeric string.
    Name(String),
}

impl From<i64> for DayOfWeek {
    fn from(n: i64) -> Self {
        DayOfWeek::Index(n)
    }
}

impl From<i32> for DayOfWeek {
    fn from(n: i32) -> Self {
        DayOfWeek::Index(n.into())
    }
}

impl From<&str> for DayOfWeek {
    fn from(s: &str) -> Self {
        DayOfWeek::Name(s.to_string())
    }
}

/// An opening or closing time.
///
/// JSON strings always deserialize as [`TimeValue::Text`]; instants are built
/// by callers holding real datetimes.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeValue {
    Text(String),
    Instant(DateTime<Utc>),
}

impl From<&str> for TimeValue {
    fn from(s: &str) -> Self {
        TimeValue::Text(s.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(s: String) -> Self {
        TimeValue::Text(s)
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeValue {
    fn from(dt: DateTime<T>) -> Self {
        TimeValue::Instant(dt.with_timezone(&Utc))
    }
}

impl Serialize for TimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeValue::Text(s) => serializer.serialize_str(s),
            TimeValue::Instant(dt) => serializer.serialize_str(&dt.to_rfc3339()),
        }
    }
}

impl<'de> Deserialize<'de> for TimeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TimeValue::Text)
    }
}

/// One raw opening-hours record.
///
/// Deserialization never fails on a well-formed JSON value. Fields that are
/// missing, null or of the wrong shape come back as `None`, so the record is
/// dropped during normalization instead of rejecting its whole batch. Times
/// are read from `opening`, then `opening_time`, then `openingTime` (likewise
/// for closing); the day from `day_of_week` or `dayOfWeek`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AvailabilityRecord {
    pub day_of_week: Option<DayOfWeek>,
    pub opening: Option<TimeValue>,
    pub closing: Option<TimeValue>,
}

impl<'de> Deserialize<'de> for AvailabilityRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self {
            day_of_week: first_present(&value, &["day_of_week", "dayOfWeek"])
                .and_then(day_from_value),
            opening: first_present(&value, &["opening", "opening_time", "openingTime"])
                .and_then(time_from_value),
            closing: first_present(&value, &["closing", "closing_time", "closingTime"])
                .and_then(time_from_value),
        })
    }
}

fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find(|field| !field.is_null())
}

fn day_from_value(value: &Value) -> Option<DayOfWeek> {
    match value {
        Value::Number(n) => n.as_i64().map(DayOfWeek::Index),
        Value::String(s) => Some(DayOfWeek::Name(s.clone())),
        _ => None,
    }
}

fn time_from_value(value: &Value) -> Option<TimeValue> {
    value.as_str().map(TimeValue::from)
}

impl AvailabilityRecord {
    pub fn new(
        day_of_week: impl Into<DayOfWeek>,
        opening: impl Into<TimeValue>,
        closing: impl Into<TimeValue>,
    ) -> Self {
        Self {
            day_of_week: Some(day_of_week.into()),
            opening: Some(opening.into()),
            closing: Some(closing.into()),
        }
    }
}

// ── Output types ────────────────────────────────────────────────────────────

/// A contiguous open interval in minutes-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AvailabilityWindow {
    start: u32,
    end: u32,
}

impl AvailabilityWindow {
    /// Returns `None` unless `start < end <= 1440`.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start < end && end <= MINUTES_PER_DAY).then_some(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Inclusive at both ends: the closing minute still counts.
    pub fn contains(&self, minute: u32) -> bool {
        self.start <= minute && minute <= self.end
    }
}

/// Weekday key → merged, sorted windows. Keys `0..=6` are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AvailabilityMap {
    days: BTreeMap<u8, Vec<AvailabilityWindow>>,
}

impl Default for AvailabilityMap {
    fn default() -> Self {
        Self {
            days: (0..7).map(|day| (day, Vec::new())).collect(),
        }
    }
}

impl AvailabilityMap {
    /// Windows for a map key (`0` = Sunday). Out-of-range keys are empty.
    pub fn day(&self, key: u8) -> &[AvailabilityWindow] {
        self.days.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All seven `(key, windows)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[AvailabilityWindow])> {
        self.days.iter().map(|(day, windows)| (*day, windows.as_slice()))
    }

    /// True when no day has any window.
    pub fn is_closed(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }
}

// ── normalize ───────────────────────────────────────────────────────────────

/// Normalize raw records using the default display timezone (Asia/Manila).
///
/// For a configured timezone, use [`normalize_availability_with_options`].
///
/// # Examples
///
/// ```
/// use booking_utils::availability::{normalize_availability, AvailabilityRecord};
///
/// let map = normalize_availability(&[
///     AvailabilityRecord::new("monday", "09:00", "12:00"),
///     AvailabilityRecord::new("monday", "11:00", "18:00"),
/// ]);
/// let monday = map.day(1);
/// assert_eq!(monday.len(), 1);
/// assert_eq!((monday[0].start(), monday[0].end()), (540, 1080));
/// ```
pub fn normalize_availability(records: &[AvailabilityRecord]) -> AvailabilityMap {
    normalize_availability_with_options(records, &AvailabilityOptions::default())
}

/// Normalize raw records into an [`AvailabilityMap`].
///
/// Records with an unresolvable day, an unresolvable time, or
/// `opening >= closing` are dropped. Windows of the same day are merged when
/// they overlap or touch.
pub fn normalize_availability_with_options(
    records: &[AvailabilityRecord],
    options: &AvailabilityOptions,
) -> AvailabilityMap {
    let tz = resolve_display_timezone(options);
    let mut map = AvailabilityMap::default();

    for record in records {
        let Some(raw_day) = record.day_of_week.as_ref().and_then(resolve_day_index) else {
            debug!(day = ?record.day_of_week, "dropping availability record: unresolvable day");
            continue;
        };
        let key = ((raw_day + 1) % 7) as u8;

        let start = record.opening.as_ref().and_then(|t| time_value_minutes(t, tz));
        let end = record.closing.as_ref().and_then(|t| time_value_minutes(t, tz));
        let window = match (start, end) {
            (Some(start), Some(end)) => AvailabilityWindow::new(start, end),
            _ => None,
        };
        let Some(window) = window else {
            debug!(
                day = key,
                opening = ?record.opening,
                closing = ?record.closing,
                "dropping availability record: unresolvable or empty time range"
            );
            continue;
        };

        map.days.entry(key).or_default().push(window);
    }

    for windows in map.days.values_mut() {
        *windows = merge_windows(std::mem::take(windows));
    }
    map
}

/// Sort by start and fold overlapping or touching windows together.
pub fn merge_windows(mut windows: Vec<AvailabilityWindow>) -> Vec<AvailabilityWindow> {
    windows.sort_by_key(|w| (w.start, w.end));

    let mut merged: Vec<AvailabilityWindow> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            Some(prev) if window.start <= prev.end => {
                prev.end = prev.end.max(window.end);
            }
            _ => merged.push(window),
        }
    }
    merged
}

// ── lookups ─────────────────────────────────────────────────────────────────

/// Windows open on `date`; empty when there is no date.
pub fn windows_for_date(date: Option<NaiveDate>, map: &AvailabilityMap) -> &[AvailabilityWindow] {
    match date {
        Some(date) => map.day(date.weekday().num_days_from_sunday() as u8),
        None => &[],
    }
}

/// Whether an `HH:MM` time on `date` falls inside one of its windows.
///
/// Fails closed: a missing date or malformed time is `false`.
pub fn is_within(date: Option<NaiveDate>, time: &str, map: &AvailabilityMap) -> bool {
    let Some(minute) = parse_time_value(time) else {
        return false;
    };
    windows_for_date(date, map)
        .iter()
        .any(|window| window.contains(minute))
}

/// Format minutes-of-day as zero-padded `HH:MM`.
pub fn minutes_to_time_value(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse a strict `H:MM` / `HH:MM` time into minutes-of-day.
pub fn parse_time_value(s: &str) -> Option<u32> {
    let caps = BARE_TIME.captures(s.trim())?;
    hour_minute(&caps[1], &caps[2])
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn resolve_display_timezone(options: &AvailabilityOptions) -> Tz {
    options.tz().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to UTC for availability instants");
        Tz::UTC
    })
}

/// Raw day index, Monday = 0, before the map shift.
fn resolve_day_index(day: &DayOfWeek) -> Option<u32> {
    let n = match day {
        DayOfWeek::Index(n) => *n,
        DayOfWeek::Name(s) => {
            let s = s.trim().to_lowercase();
            match s.parse::<i64>() {
                Ok(n) => n,
                Err(_) => weekday_name_index(&s)?,
            }
        }
    };
    Some(n.rem_euclid(7) as u32)
}

fn weekday_name_index(s: &str) -> Option<i64> {
    match s {
        "monday" => Some(0),
        "tuesday" => Some(1),
        "wednesday" => Some(2),
        "thursday" => Some(3),
        "friday" => Some(4),
        "saturday" => Some(5),
        "sunday" => Some(6),
        _ => None,
    }
}

fn time_value_minutes(value: &TimeValue, tz: Tz) -> Option<u32> {
    match value {
        TimeValue::Instant(dt) => {
            let local = dt.with_timezone(&tz);
            Some(local.hour() * 60 + local.minute())
        }
        TimeValue::Text(s) => text_minutes(s.trim()),
    }
}

/// Bare `HH:MM`, then a trailing time-of-day, then a full date parse read in UTC.
fn text_minutes(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    if let Some(caps) = BARE_TIME.captures(s) {
        return hour_minute(&caps[1], &caps[2]);
    }
    if let Some(caps) = TRAILING_TIME.captures(s) {
        return hour_minute(&caps[1], &caps[2]);
    }
    parse_full_datetime(s).map(|dt| dt.hour() * 60 + dt.minute())
}

fn parse_full_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn hour_minute(hour: &str, minute: &str) -> Option<u32> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    (hour < 24 && minute < 60).then_some(hour * 60 + minute)
}

// ── Tests ───────────────────────────────────────────────────────────────────
