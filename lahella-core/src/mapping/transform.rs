//! Named, invertible value converters applied per mapping entry.

use chrono::{Local, NaiveDate, TimeZone};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which way a record is being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Authoring schema to wire schema.
    ToRemote,
    /// Wire schema to authoring schema.
    ToLocal,
}

/// A converter that can be run in either [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Identity,
    /// `YYYY-MM-DD` at local midnight <-> epoch milliseconds.
    DateTimestamp,
}

impl Transform {
    /// Looks a transform up by its registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "identity" => Some(Transform::Identity),
            "date_timestamp" => Some(Transform::DateTimestamp),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Identity => "identity",
            Transform::DateTimestamp => "date_timestamp",
        }
    }

    pub fn apply(&self, value: &Value, direction: Direction) -> Value {
        match (self, direction) {
            (Transform::Identity, _) => value.clone(),
            (Transform::DateTimestamp, Direction::ToRemote) => date_value_to_timestamp(value),
            (Transform::DateTimestamp, Direction::ToLocal) => timestamp_value_to_date(value),
        }
    }
}

/// Runs an optional transform; `None` behaves like [`Transform::Identity`].
pub fn apply(transform: Option<Transform>, value: &Value, direction: Direction) -> Value {
    match transform {
        Some(t) => t.apply(value, direction),
        None => value.clone(),
    }
}

/// Converts `YYYY-MM-DD` (local midnight) to epoch milliseconds.
///
/// An empty string maps to `0`. Returns `None` when the date cannot be parsed.
pub fn date_to_timestamp(date: &str) -> Option<i64> {
    if date.is_empty() {
        return Some(0);
    }
    let day = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// Converts epoch milliseconds to a local `YYYY-MM-DD`; `0` maps to `""`.
pub fn timestamp_to_date(millis: i64) -> String {
    if millis == 0 {
        return String::new();
    }
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => String::new(),
    }
}

fn date_value_to_timestamp(value: &Value) -> Value {
    match value {
        Value::Null => Value::from(0),
        Value::String(s) => match date_to_timestamp(s) {
            Some(ts) => Value::from(ts),
            None => {
                tracing::debug!("Leaving unparseable date as-is: {:?}", s);
                value.clone()
            }
        },
        _ => value.clone(),
    }
}

fn timestamp_value_to_date(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::Number(n) => match n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)) {
            Some(ms) => Value::String(timestamp_to_date(ms)),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}
