//! Typed cell values and their canonical string rendering
//!
//! Adapters decode each engine value into a [`Value`] and then call
//! [`Value::render`]. Every variant has exactly one rendering, so a given
//! dataset always produces the same strings regardless of which adapter read
//! it.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use std::fmt::{self, Write};
use uuid::Uuid;

/// Rendering used for SQL NULL
pub const NULL_TEXT: &str = "NULL";

/// A single decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer of any width
    Int(i64),
    /// Unsigned integer of any width
    UInt(u64),
    /// Single precision float
    Float32(f32),
    /// Double precision float
    Float(f64),
    /// Exact decimal, already in textual form
    Decimal(String),
    /// Character data
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// UUID
    Uuid(Uuid),
    /// JSON document
    Json(serde_json::Value),
    /// Timestamp with time zone, normalized to UTC
    Timestamp(DateTime<Utc>),
    /// Timestamp without time zone
    DateTime(NaiveDateTime),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Signed elapsed time, hours unbounded (MySQL `TIME`)
    Interval(Duration),
}

impl Value {
    /// Returns true if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Classify a raw wire payload of a type no adapter decodes explicitly:
    /// printable UTF-8 becomes text, anything else stays binary.
    pub fn from_unknown_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) if is_printable(&text) => Value::Text(text),
            Ok(text) => Value::Bytes(text.into_bytes()),
            Err(e) => Value::Bytes(e.into_bytes()),
        }
    }

    /// Render the value with the canonical rule for its type
    pub fn render(&self) -> String {
        match self {
            Value::Null => NULL_TEXT.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float32(f) => render_float(*f as f64, f.is_nan(), || f.to_string()),
            Value::Float(f) => render_float(*f, f.is_nan(), || f.to_string()),
            Value::Decimal(d) => d.clone(),
            Value::Text(s) => s.clone(),
            Value::Bytes(b) => render_bytes(b),
            Value::Uuid(u) => u.hyphenated().to_string(),
            Value::Json(j) => j.to_string(),
            Value::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Time(t) => t.format("%H:%M:%S%.f").to_string(),
            Value::Interval(d) => render_interval(d),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn render_float(value: f64, is_nan: bool, finite: impl FnOnce() -> String) -> String {
    if is_nan {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        finite()
    }
}

fn render_bytes(bytes: &[u8]) -> String {
    format!("\\x{}", hex::encode(bytes))
}

/// `[-]HH:MM:SS[.ffffff]`, with hours past 24 kept as hours
fn render_interval(duration: &Duration) -> String {
    let micros = duration
        .num_microseconds()
        .unwrap_or_else(|| duration.num_milliseconds().saturating_mul(1000));
    let sign = if micros < 0 { "-" } else { "" };
    let abs = micros.unsigned_abs();
    let secs = abs / 1_000_000;
    let frac = abs % 1_000_000;

    let mut out = format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        secs / 3600,
        secs / 60 % 60,
        secs % 60
    );
    if frac != 0 {
        let _ = write!(out, ".{:06}", frac);
    }
    out
}

fn is_printable(text: &str) -> bool {
    !text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_scalars() {
        assert_eq!(Value::Null.render(), "NULL");
        assert_eq!(Value::Bool(true).render(), "true");
        assert_eq!(Value::Bool(false).render(), "false");
        assert_eq!(Value::Int(-42).render(), "-42");
        assert_eq!(Value::UInt(u64::MAX).render(), "18446744073709551615");
        assert_eq!(Value::Text("a b".into()).render(), "a b");
        assert_eq!(Value::Text(String::new()).render(), "");
        assert_eq!(Value::Decimal("12.500".into()).render(), "12.500");
    }

    #[test]
    fn test_render_floats() {
        assert_eq!(Value::Float(1.0).render(), "1");
        assert_eq!(Value::Float(2.5).render(), "2.5");
        assert_eq!(Value::Float(0.1).render(), "0.1");
        assert_eq!(Value::Float32(0.1).render(), "0.1");
        assert_eq!(Value::Float(f64::NAN).render(), "NaN");
        assert_eq!(Value::Float(f64::INFINITY).render(), "Infinity");
        assert_eq!(Value::Float32(f32::NEG_INFINITY).render(), "-Infinity");
    }

    #[test]
    fn test_render_floats_round_trip() {
        for v in [0.1f64, 1.0 / 3.0, 123456.789, -2.0e-7] {
            let rendered = Value::Float(v).render();
            assert_eq!(rendered.parse::<f64>().unwrap(), v);
        }
    }

    #[test]
    fn test_render_bytes() {
        assert_eq!(Value::Bytes(vec![0xde, 0xad, 0x01]).render(), "\\xdead01");
        assert_eq!(Value::Bytes(Vec::new()).render(), "\\x");
    }

    #[test]
    fn test_render_uuid_and_json() {
        let id = Uuid::parse_str("A0EEBC99-9C0B-4EF8-BB6D-6BB9BD380A11").unwrap();
        assert_eq!(
            Value::Uuid(id).render(),
            "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11"
        );
        let doc = serde_json::json!({"a": [1, 2]});
        assert_eq!(Value::Json(doc).render(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_render_temporal() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(Value::Timestamp(ts).render(), "2024-01-02T03:04:05Z");

        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(Value::Date(date).render(), "2024-01-02");

        let dt = date.and_hms_opt(3, 4, 5).unwrap();
        assert_eq!(Value::DateTime(dt).render(), "2024-01-02T03:04:05");

        let dt_millis = date.and_hms_milli_opt(3, 4, 5, 250).unwrap();
        assert_eq!(Value::DateTime(dt_millis).render(), "2024-01-02T03:04:05.250");

        let time = NaiveTime::from_hms_opt(23, 59, 1).unwrap();
        assert_eq!(Value::Time(time).render(), "23:59:01");
    }

    #[test]
    fn test_render_interval() {
        assert_eq!(Value::Interval(Duration::hours(24)).render(), "24:00:00");
        assert_eq!(
            Value::Interval(-(Duration::hours(838) + Duration::seconds(3599))).render(),
            "-838:59:59"
        );
        assert_eq!(
            Value::Interval(Duration::seconds(61) + Duration::microseconds(500)).render(),
            "00:01:01.000500"
        );
        assert_eq!(Value::Interval(Duration::zero()).render(), "00:00:00");
    }

    #[test]
    fn test_null_is_distinct_from_empty_text() {
        assert_ne!(Value::Null.render(), Value::Text(String::new()).render());
        assert!(Value::Null.is_null());
        assert!(!Value::Text(String::new()).is_null());
    }

    #[test]
    fn test_from_unknown_bytes() {
        assert_eq!(
            Value::from_unknown_bytes(b"happy".to_vec()),
            Value::Text("happy".into())
        );
        assert_eq!(
            Value::from_unknown_bytes(vec![0, 0, 0, 1]),
            Value::Bytes(vec![0, 0, 0, 1])
        );
        assert_eq!(
            Value::from_unknown_bytes(vec![0xff, 0xfe]),
            Value::Bytes(vec![0xff, 0xfe])
        );
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7i64), Value::Int(7));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x".to_string())), Value::Text("x".into()));
    }
}
