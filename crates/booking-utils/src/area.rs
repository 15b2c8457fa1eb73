//! Areas and their rate lists, as returned by the booking API.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::rate::{parse_rate_unit, ParsedRateUnit};

/// The API hands out both numeric and string identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl Default for EntityId {
    fn default() -> Self {
        EntityId::Text(String::new())
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<i32> for EntityId {
    fn from(n: i32) -> Self {
        EntityId::Number(n.into())
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

/// A price tied to a free-text duration label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRate {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default, alias = "time_unit")]
    pub time_unit: String,
    #[serde(default, alias = "price_per_guest", deserialize_with = "lenient_decimal")]
    pub price_per_guest: Decimal,
}

impl AreaRate {
    pub fn new(id: impl Into<EntityId>, time_unit: &str, price_per_guest: Decimal) -> Self {
        Self {
            id: id.into(),
            time_unit: time_unit.to_string(),
            price_per_guest,
        }
    }

    pub fn parsed_unit(&self) -> Option<ParsedRateUnit> {
        parse_rate_unit(&self.time_unit)
    }
}

/// A bookable sub-unit of a space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub rates: Vec<AreaRate>,
}

impl Area {
    pub fn new(id: impl Into<EntityId>, rates: Vec<AreaRate>) -> Self {
        Self {
            id: id.into(),
            rates,
            ..Self::default()
        }
    }

    /// Each rate paired with its parsed unit, in list order.
    pub fn parsed_rates(&self) -> impl Iterator<Item = (&AreaRate, Option<ParsedRateUnit>)> {
        self.rates.iter().map(|rate| (rate, rate.parsed_unit()))
    }
}

/// Accept a JSON number or numeric string; anything else reads as zero.
fn lenient_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or_default(),
        Value::String(s) => Decimal::from_str(s.trim()).unwrap_or_default(),
        _ => Decimal::ZERO,
    })
}
