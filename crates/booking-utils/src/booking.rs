//! Booking-creation payloads and submission failures.
//!
//! The booking endpoint is owned by the remote API. This module only
//! assembles the payload it expects, checks it against the space's opening
//! hours and the area's capacity, and turns a rejected submission into a
//! message fit for a notification. Failed submissions are never retried.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::area::{Area, EntityId};
use crate::availability::{is_within, minutes_to_time_value, parse_time_value, AvailabilityMap};
use crate::error::{BookingError, Result};
use crate::pricing::resolve_pricing;

/// The JSON body POSTed to the booking endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub area_id: EntityId,
    /// Serialized as `yyyy-MM-dd`.
    pub reservation_date: NaiveDate,
    pub stay_hours: u32,
    pub guests: u32,
    /// Zero-padded `HH:MM`.
    pub arrival_time: String,
    pub payment_method: String,
    pub amount: Decimal,
}

/// Form state for one reservation, before validation.
#[derive(Debug, Clone)]
pub struct BookingDraft<'a> {
    pub area: &'a Area,
    pub reservation_date: NaiveDate,
    pub stay_hours: u32,
    pub guests: u32,
    pub arrival_time: String,
    pub payment_method: String,
}

impl BookingDraft<'_> {
    /// Validate the draft and price it.
    ///
    /// Stay hours and guests are clamped to at least 1, as in pricing.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidGuests`] if guests exceed the area's capacity
    /// - [`BookingError::InvalidTime`] if the arrival time is not `HH:MM`
    /// - [`BookingError::OutsideAvailability`] if the space is closed at arrival
    /// - [`BookingError::InvalidAmount`] if the resolved price is negative
    /// - [`BookingError::Input`] if no payment method is chosen
    pub fn build(&self, availability: &AvailabilityMap) -> Result<BookingRequest> {
        let stay_hours = self.stay_hours.max(1);
        let guests = self.guests.max(1);

        if let Some(capacity) = self.area.capacity {
            if guests > capacity {
                return Err(BookingError::InvalidGuests(format!(
                    "{guests} guests exceed the area capacity of {capacity}"
                )));
            }
        }

        let arrival = parse_time_value(&self.arrival_time).ok_or_else(|| {
            BookingError::InvalidTime(format!("'{}', expected HH:MM", self.arrival_time.trim()))
        })?;
        let arrival_time = minutes_to_time_value(arrival);

        if !is_within(Some(self.reservation_date), &arrival_time, availability) {
            return Err(BookingError::OutsideAvailability {
                date: self.reservation_date.format("%Y-%m-%d").to_string(),
                time: arrival_time,
            });
        }

        let payment_method = self.payment_method.trim();
        if payment_method.is_empty() {
            return Err(BookingError::Input("payment method is required".to_string()));
        }

        let pricing = resolve_pricing(self.area, stay_hours, guests);
        if pricing.total.is_sign_negative() && !pricing.total.is_zero() {
            return Err(BookingError::InvalidAmount(pricing.total.to_string()));
        }

        debug!(
            area = %self.area.id,
            date = %self.reservation_date,
            stay_hours,
            guests,
            amount = %pricing.total,
            "booking request assembled"
        );

        Ok(BookingRequest {
            area_id: self.area.id.clone(),
            reservation_date: self.reservation_date,
            stay_hours,
            guests,
            arrival_time,
            payment_method: payment_method.to_string(),
            amount: pricing.total,
        })
    }
}

/// Convert a non-2xx booking response into a [`BookingError::Submission`].
///
/// The message is the first string found under `message`, `error` or
/// `detail`, or the first entry of an `errors` array or object. Bodies that
/// are not JSON produce a generic message.
pub fn submission_error(status: u16, body: &str) -> BookingError {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(json) => extract_message(&json)
            .unwrap_or_else(|| "the booking service rejected the request".to_string()),
        Err(_) => "unexpected response from booking service".to_string(),
    };
    BookingError::Submission { status, message }
}

fn extract_message(json: &Value) -> Option<String> {
    for key in ["message", "error", "detail"] {
        match json.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(nested @ Value::Object(_)) => {
                if let Some(found) = extract_message(nested) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }

    let first = match json.get("errors")? {
        Value::Array(items) => items.first()?,
        Value::Object(fields) => fields.values().next()?,
        _ => return None,
    };
    match first {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first()?.as_str().map(str::to_string),
        other => extract_message(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaRate;
    use crate::availability::{normalize_availability, AvailabilityRecord};

    fn area() -> Area {
        Area {
            capacity: Some(6),
            ..Area::new(
                "room-a",
                vec![
                    AreaRate::new(1, "1-3 hours", Decimal::new(500, 0)),
                    AreaRate::new(2, "per hour", Decimal::new(150, 0)),
                ],
            )
        }
    }

    fn hours() -> AvailabilityMap {
        normalize_availability(&[AvailabilityRecord::new("monday", "09:00", "18:00")])
    }

    fn draft(area: &Area) -> BookingDraft<'_> {
        BookingDraft {
            area,
            reservation_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            stay_hours: 2,
            guests: 4,
            arrival_time: "9:30".to_string(),
            payment_method: "gcash".to_string(),
        }
    }

    #[test]
    fn test_build_prices_and_normalizes() {
        let area = area();
        let request = draft(&area).build(&hours()).unwrap();
        assert_eq!(request.amount, Decimal::new(2000, 0));
        assert_eq!(request.arrival_time, "09:30");
        assert_eq!(request.area_id, EntityId::from("room-a"));
    }

    #[test]
    fn test_payload_shape() {
        let area = area();
        let json = serde_json::to_value(draft(&area).build(&hours()).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "areaId": "room-a",
                "reservationDate": "2026-10-19",
                "stayHours": 2,
                "guests": 4,
                "arrivalTime": "09:30",
                "paymentMethod": "gcash",
                "amount": "2000"
            })
        );
    }

    #[test]
    fn test_closing_minute_is_bookable() {
        let area = area();
        let mut d = draft(&area);
        d.arrival_time = "18:00".to_string();
        assert!(d.build(&hours()).is_ok());
    }

    #[test]
    fn test_arrival_outside_hours_rejected() {
        let area = area();
        let mut d = draft(&area);
        d.arrival_time = "08:00".to_string();
        let err = d.build(&hours()).unwrap_err();
        assert_eq!(
            err,
            BookingError::OutsideAvailability {
                date: "2026-10-19".into(),
                time: "08:00".into()
            }
        );
    }

    #[test]
    fn test_closed_day_rejected() {
        let area = area();
        let mut d = draft(&area);
        d.reservation_date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert!(matches!(
            d.build(&hours()),
            Err(BookingError::OutsideAvailability { .. })
        ));
    }

    #[test]
    fn test_malformed_arrival_rejected() {
        let area = area();
        let mut d = draft(&area);
        d.arrival_time = "half nine".to_string();
        let err = d.build(&hours()).unwrap_err().to_string();
        assert!(err.contains("Invalid time"), "got: {err}");
    }

    #[test]
    fn test_capacity_enforced() {
        let area = area();
        let mut d = draft(&area);
        d.guests = 7;
        assert!(matches!(d.build(&hours()), Err(BookingError::InvalidGuests(_))));
    }

    #[test]
    fn test_zero_guests_clamped() {
        let area = area();
        let mut d = draft(&area);
        d.guests = 0;
        d.stay_hours = 0;
        let request = d.build(&hours()).unwrap();
        assert_eq!((request.guests, request.stay_hours), (1, 1));
        assert_eq!(request.amount, Decimal::new(500, 0));
    }

    #[test]
    fn test_payment_method_required() {
        let area = area();
        let mut d = draft(&area);
        d.payment_method = "  ".to_string();
        assert!(matches!(d.build(&hours()), Err(BookingError::Input(_))));
    }

    // ── submission failures ─────────────────────────────────────────────

    #[test]
    fn test_submission_message_field() {
        let err = submission_error(409, r#"{"message": "Slot already taken"}"#);
        assert_eq!(
            err,
            BookingError::Submission {
                status: 409,
                message: "Slot already taken".into()
            }
        );
        assert_eq!(err.to_string(), "Booking failed (HTTP 409): Slot already taken");
    }

    #[test]
    fn test_submission_nested_and_errors_fields() {
        let err = submission_error(400, r#"{"error": {"message": "Area is closed"}}"#);
        assert!(err.to_string().ends_with("Area is closed"));

        let err = submission_error(422, r#"{"errors": {"guests": ["Too many guests"]}}"#);
        assert!(err.to_string().ends_with("Too many guests"));

        let err = submission_error(422, r#"{"errors": ["Date is in the past"]}"#);
        assert!(err.to_string().ends_with("Date is in the past"));
    }

    #[test]
    fn test_submission_non_json_body() {
        let err = submission_error(502, "<html>Bad Gateway</html>");
        assert_eq!(
            err.to_string(),
            "Booking failed (HTTP 502): unexpected response from booking service"
        );
    }

    #[test]
    fn test_submission_json_without_message() {
        let err = submission_error(500, r#"{"ok": false}"#);
        assert!(err.to_string().ends_with("the booking service rejected the request"));
    }
}
