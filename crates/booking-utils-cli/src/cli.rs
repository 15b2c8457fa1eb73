//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Read from stdin when an input path is `-`.
pub const STDIN: &str = "-";

#[derive(Parser)]
#[command(
    name = "booking-utils",
    version,
    about = "Availability windows, rate parsing and price resolution for coworking bookings",
    long_about = "Runs the booking form's availability and pricing logic over JSON exports \
                  of the booking API. Input files may be `-` for stdin; results are JSON on stdout."
)]
pub struct Cli {
    /// IANA timezone for instant-typed opening hours.
    ///
    /// Overrides AVAILABILITY_TIMEZONE; defaults to Asia/Manila.
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize opening-hours records into per-weekday windows
    Availability {
        /// JSON array of availability records
        #[arg(default_value = STDIN)]
        records: PathBuf,
    },

    /// Check whether an arrival time falls inside the opening hours of a date
    ///
    /// Prints `true` or `false`; exits 1 when the time is not available.
    Check {
        /// Reservation date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Arrival time (HH:MM)
        #[arg(long)]
        time: String,

        /// JSON array of availability records
        #[arg(default_value = STDIN)]
        records: PathBuf,
    },

    /// Parse a rate time-unit label
    ParseRate {
        /// Free-text label, e.g. "2-4 hours" or "per hour"
        label: String,
    },

    /// Resolve the price of a stay in an area
    Price {
        /// Stay length in hours (clamped to at least 1)
        #[arg(long, default_value_t = 1)]
        hours: u32,

        /// Number of guests (clamped to at least 1)
        #[arg(long, default_value_t = 1)]
        guests: u32,

        /// JSON area object with its rates
        #[arg(default_value = STDIN)]
        area: PathBuf,
    },

    /// List the stay-hour options offered for an area
    Options {
        /// Comma-separated fallback hours; defaults to 1 through 12
        #[arg(long, value_delimiter = ',')]
        fallback: Vec<u32>,

        /// JSON area object with its rates
        #[arg(default_value = STDIN)]
        area: PathBuf,
    },

    /// Build and validate a booking-creation payload
    Payload {
        /// JSON array of availability records
        #[arg(long)]
        records: PathBuf,

        /// JSON area object with its rates
        #[arg(long)]
        area: PathBuf,

        /// Reservation date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Arrival time (HH:MM)
        #[arg(long)]
        time: String,

        /// Stay length in hours
        #[arg(long, default_value_t = 1)]
        hours: u32,

        /// Number of guests
        #[arg(long, default_value_t = 1)]
        guests: u32,

        /// Payment method identifier, e.g. "gcash"
        #[arg(long)]
        payment_method: String,
    },
}
