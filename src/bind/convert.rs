//! Built-in primitive parsing and formatting

use crate::error::{Result, TableError};
use crate::types::{Kind, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

macro_rules! parse_number {
    ($raw:expr, $ty:ty, $variant:ident, $name:expr) => {
        $raw.trim()
            .parse::<$ty>()
            .map(Value::$variant)
            .map_err(|e| {
                TableError::Convert(format!(
                    concat!("cannot parse {:?} as ", $name, ": {}"),
                    $raw, e
                ))
            })
    };
}

/// Parse a raw field string into a [`Value`] of the given kind
pub fn parse_primitive(kind: Kind, raw: &str) -> Result<Value> {
    match kind {
        Kind::Bool => raw
            .trim()
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|e| TableError::Convert(format!("cannot parse {:?} as bool: {}", raw, e))),
        Kind::I8 => parse_number!(raw, i8, I8, "i8"),
        Kind::I16 => parse_number!(raw, i16, I16, "i16"),
        Kind::I32 => parse_number!(raw, i32, I32, "i32"),
        Kind::I64 => parse_number!(raw, i64, I64, "i64"),
        Kind::U8 => parse_number!(raw, u8, U8, "u8"),
        Kind::U16 => parse_number!(raw, u16, U16, "u16"),
        Kind::U32 => parse_number!(raw, u32, U32, "u32"),
        Kind::U64 => parse_number!(raw, u64, U64, "u64"),
        Kind::F32 => parse_number!(raw, f32, F32, "f32"),
        Kind::F64 => parse_number!(raw, f64, F64, "f64"),
        Kind::Decimal => raw
            .trim()
            .parse::<f64>()
            .map(Value::Decimal)
            .map_err(|e| {
                TableError::Convert(format!("cannot parse {:?} as decimal: {}", raw, e))
            }),
        Kind::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(Value::Char(ch)),
                _ => Err(TableError::Convert(format!(
                    "cannot parse {:?} as char: expected exactly one character",
                    raw
                ))),
            }
        }
        Kind::DateTime => parse_datetime(raw).map(Value::DateTime),
        Kind::Str => Ok(Value::Str(raw.to_string())),
    }
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }
    // Bare date, midnight.
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(TableError::Convert(format!(
        "cannot parse {:?} as datetime",
        raw
    )))
}

/// Format a [`Value`] back into its field-string representation
///
/// The mirror of [`parse_primitive`]. `Null` handling (the sentinel string)
/// belongs to the column descriptor, so `Null` formats as the empty string
/// here.
pub fn format_primitive(value: &Value) -> String {
    let mut itoa_buf = itoa::Buffer::new();
    match value {
        Value::Null => String::new(),
        Value::Bool(v) => v.to_string(),
        Value::I8(v) => itoa_buf.format(*v).to_string(),
        Value::I16(v) => itoa_buf.format(*v).to_string(),
        Value::I32(v) => itoa_buf.format(*v).to_string(),
        Value::I64(v) => itoa_buf.format(*v).to_string(),
        Value::U8(v) => itoa_buf.format(*v).to_string(),
        Value::U16(v) => itoa_buf.format(*v).to_string(),
        Value::U32(v) => itoa_buf.format(*v).to_string(),
        Value::U64(v) => itoa_buf.format(*v).to_string(),
        Value::F32(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::Char(v) => v.to_string(),
        Value::DateTime(v) => v.format("%Y-%m-%dT%H:%M:%S").to_string(),
        Value::Str(v) => v.clone(),
    }
}
