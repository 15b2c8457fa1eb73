//! Error types for booking-utils operations.
//!
//! Availability, rate and pricing resolution never fail: they degrade to
//! empty or zero results. Errors only surface when assembling a booking
//! request or reporting a failed submission.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Arrival time {time} is outside the opening hours for {date}")]
    OutsideAvailability { date: String, time: String },

    #[error("Invalid guest count: {0}")]
    InvalidGuests(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Booking failed (HTTP {status}): {message}")]
    Submission { status: u16, message: String },

    #[error("Invalid input: {0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;
