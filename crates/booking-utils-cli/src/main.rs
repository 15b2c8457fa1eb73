use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use booking_utils::{
    build_rate_options, default_fallback_options, is_within, normalize_availability_with_options,
    parse_rate_unit, resolve_pricing, Area, AvailabilityOptions, AvailabilityRecord, BookingDraft,
    RateOption,
};

mod cli;

use cli::{Cli, Command, STDIN};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = availability_options(cli.timezone.as_deref())?;

    match cli.command {
        Command::Availability { records } => {
            let records: Vec<AvailabilityRecord> = read_json(&records)?;
            print_json(&normalize_availability_with_options(&records, &options))?;
        }
        Command::Check {
            date,
            time,
            records,
        } => {
            let records: Vec<AvailabilityRecord> = read_json(&records)?;
            let map = normalize_availability_with_options(&records, &options);
            let open = is_within(Some(date), &time, &map);
            println!("{open}");
            if !open {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::ParseRate { label } => {
            print_json(&parse_rate_unit(&label))?;
        }
        Command::Price {
            hours,
            guests,
            area,
        } => {
            let area: Area = read_json(&area)?;
            print_json(&resolve_pricing(&area, hours, guests))?;
        }
        Command::Options { fallback, area } => {
            let area: Area = read_json(&area)?;
            let fallback = if fallback.is_empty() {
                default_fallback_options()
            } else {
                fallback.into_iter().map(RateOption::for_hours).collect()
            };
            print_json(&build_rate_options(&area, &fallback))?;
        }
        Command::Payload {
            records,
            area,
            date,
            time,
            hours,
            guests,
            payment_method,
        } => {
            let records: Vec<AvailabilityRecord> = read_json(&records)?;
            let area: Area = read_json(&area)?;
            let map = normalize_availability_with_options(&records, &options);
            let draft = BookingDraft {
                area: &area,
                reservation_date: date,
                stay_hours: hours,
                guests,
                arrival_time: time,
                payment_method,
            };
            let request = draft.build(&map).context("booking payload rejected")?;
            print_json(&request)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// An explicit `--timezone` must be valid; the environment falls back quietly.
fn availability_options(flag: Option<&str>) -> Result<AvailabilityOptions> {
    match flag {
        Some(tz) => {
            let options = AvailabilityOptions::with_timezone(tz);
            options.tz().context("--timezone")?;
            Ok(options)
        }
        None => Ok(AvailabilityOptions::from_env()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = if path.as_os_str() == STDIN {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    debug!(source = %path.display(), bytes = raw.len(), "input read");
    serde_json::from_str(&raw).with_context(|| format!("parsing JSON from {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
