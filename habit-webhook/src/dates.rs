//! Due date normalization.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use shared::DateError;

/// Date properties checked in order.
const DATE_PROPERTIES: &[&str] = &["Due", "Date"];

/// A due date as it arrives in the task properties.
#[derive(Debug, Clone, PartialEq)]
pub enum DueDate<'a> {
    /// Native instant, rendered in UTC.
    Instant(DateTime<Utc>),
    /// ISO-8601 string, optionally followed by a time and offset.
    Text(&'a str),
    /// Any other JSON type.
    Unsupported(&'static str),
}

impl<'a> DueDate<'a> {
    /// Interpret a `date.start` value. Numbers are epoch milliseconds.
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(text) => DueDate::Text(text),
            Value::Number(number) => {
                match number
                    .as_i64()
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                {
                    Some(instant) => DueDate::Instant(instant),
                    None => DueDate::Unsupported("number"),
                }
            }
            Value::Null => DueDate::Unsupported("null"),
            Value::Bool(_) => DueDate::Unsupported("boolean"),
            Value::Array(_) => DueDate::Unsupported("array"),
            Value::Object(_) => DueDate::Unsupported("object"),
        }
    }

    /// Render as a `YYYY-MM-DD` calendar day.
    pub fn to_day(&self) -> Result<String, DateError> {
        match self {
            DueDate::Instant(instant) => Ok(instant.format("%Y-%m-%d").to_string()),
            DueDate::Text(text) => leading_day(text)
                .map(str::to_string)
                .ok_or_else(|| DateError::InvalidString(text.to_string())),
            DueDate::Unsupported(kind) => Err(DateError::UnsupportedType(*kind)),
        }
    }
}

/// The leading `YYYY-MM-DD` of a string, if it starts with one.
fn leading_day(text: &str) -> Option<&str> {
    let day = text.get(..10)?;
    let well_formed = day.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    well_formed.then_some(day)
}

/// Locate `Due.date.start`, falling back to `Date.date.start`.
fn find_due_date(properties: &Map<String, Value>) -> Option<&Value> {
    DATE_PROPERTIES.iter().find_map(|name| {
        properties
            .get(*name)
            .and_then(|property| property.get("date"))
            .and_then(|date| date.get("start"))
            .filter(|start| !start.is_null())
    })
}

/// Normalize the task's due date to the day used by the habits database.
pub fn normalize_due_date(properties: &Map<String, Value>) -> Result<String, DateError> {
    let start = find_due_date(properties).ok_or(DateError::Unspecified)?;
    DueDate::from_value(start).to_day()
}
