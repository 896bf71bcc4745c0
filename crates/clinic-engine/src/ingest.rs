//! Normalization of external data shapes into the engine's types.
//!
//! Host applications hand over timestamps as RFC 3339 text, naive local
//! datetime text, or integer epoch seconds, and line items as loose JSON.
//! Everything is normalized here, at one boundary, so the scheduling and
//! pricing code only ever sees `DateTime<Utc>` and typed `LineItem`s.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::error::{ClinicError, Result};
use crate::interval::TimeInterval;
use crate::pricing::LineItem;

/// Resolve an IANA timezone name.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| ClinicError::InvalidTimezone(name.to_string()))
}

/// Resolve a naive local wall time to a UTC instant in the given timezone.
///
/// Wall times that do not exist (DST gap) or exist twice (DST fold) on that
/// date are rejected rather than silently assigned an offset.
pub fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            ClinicError::InvalidTimestamp(format!("{naive} is ambiguous or skipped in {tz}"))
        })
}

/// Parse timestamp text into a UTC instant.
///
/// Offset-aware RFC 3339 is taken as-is. The naive forms
/// `"%Y-%m-%d %H:%M:%S"` and `"%Y-%m-%dT%H:%M:%S"` are interpreted as wall
/// time in `tz`.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| ClinicError::InvalidTimestamp(raw.to_string()))?;

    local_to_utc(naive, tz)
}

/// Convert integer epoch seconds to a UTC instant.
pub fn from_epoch_seconds(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ClinicError::InvalidTimestamp(format!("epoch {secs} is out of range")))
}

/// A timestamp as it arrives from outside: epoch seconds or text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Epoch(i64),
    Text(String),
}

impl RawTimestamp {
    pub fn resolve(&self, tz: Tz) -> Result<DateTime<Utc>> {
        match self {
            RawTimestamp::Epoch(secs) => from_epoch_seconds(*secs),
            RawTimestamp::Text(raw) => parse_timestamp(raw, tz),
        }
    }
}

/// An appointment row as stored by the host application.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInterval {
    pub start_time: RawTimestamp,
    pub end_time: RawTimestamp,
}

impl RawInterval {
    pub fn resolve(&self, tz: Tz) -> Result<TimeInterval> {
        Ok(TimeInterval::new(
            self.start_time.resolve(tz)?,
            self.end_time.resolve(tz)?,
        ))
    }
}

/// Resolve a batch of appointment rows into intervals.
pub fn resolve_intervals(rows: &[RawInterval], tz: Tz) -> Result<Vec<TimeInterval>> {
    rows.iter().map(|row| row.resolve(tz)).collect()
}

/// Validate and convert loose JSON line items.
///
/// Each element must be an object with a numeric non-negative `price` and an
/// integer non-negative `qty`. The first offending element fails the whole
/// batch with its position; nothing downstream runs on partially valid input.
pub fn line_items_from_json(items: &[serde_json::Value]) -> Result<Vec<LineItem>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = item
                .as_object()
                .ok_or_else(|| item_error(index, "expected an object"))?;

            let price = obj
                .get("price")
                .ok_or_else(|| item_error(index, "missing 'price'"))?;
            let price = json_decimal(price)
                .filter(|p| *p >= Decimal::ZERO)
                .ok_or_else(|| item_error(index, "'price' must be a non-negative number"))?;

            let qty = obj
                .get("qty")
                .ok_or_else(|| item_error(index, "missing 'qty'"))?;
            let qty = qty
                .as_u64()
                .and_then(|q| u32::try_from(q).ok())
                .ok_or_else(|| item_error(index, "'qty' must be a non-negative integer"))?;

            Ok(LineItem::new(price, qty))
        })
        .collect()
}

fn item_error(index: usize, reason: &str) -> ClinicError {
    ClinicError::InvalidLineItem {
        index,
        reason: reason.to_string(),
    }
}

/// Read a JSON number (or numeric string) as an exact decimal.
fn json_decimal(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        // Going through the number's text form keeps values like 0.1 exact
        // instead of inheriting the f64 approximation.
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
