//! Runtime value model for typed record binding

use crate::error::{Result, TableError};
use chrono::NaiveDateTime;
use std::fmt;

/// The closed set of primitive kinds the built-in converters support
///
/// Dispatch over parse/format targets is a match on this enum; an unsupported
/// target simply has no `Kind` and must use a custom parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    /// Boolean (`true`/`false`)
    Bool,
    /// Signed 8-bit integer
    I8,
    /// Signed 16-bit integer
    I16,
    /// Signed 32-bit integer
    I32,
    /// Signed 64-bit integer
    I64,
    /// Unsigned 8-bit integer
    U8,
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// Unsigned 64-bit integer
    U64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// Decimal number (f64-backed)
    Decimal,
    /// Single character
    Char,
    /// Calendar date and time, no timezone
    DateTime,
    /// String passthrough
    Str,
}

/// A single parsed field value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// The field matched its column's null sentinel
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed 8-bit integer
    I8(i8),
    /// Signed 16-bit integer
    I16(i16),
    /// Signed 32-bit integer
    I32(i32),
    /// Signed 64-bit integer
    I64(i64),
    /// Unsigned 8-bit integer
    U8(u8),
    /// Unsigned 16-bit integer
    U16(u16),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Unsigned 64-bit integer
    U64(u64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// Decimal number (f64-backed)
    Decimal(f64),
    /// Single character
    Char(char),
    /// Calendar date and time
    DateTime(NaiveDateTime),
    /// String value
    Str(String),
}

macro_rules! value_accessors {
    ($into:ident, $opt:ident, $variant:ident, $ty:ty, $name:expr) => {
        /// Consume the value as this kind; fails on `Null` or a mismatch
        pub fn $into(self) -> Result<$ty> {
            match self {
                Value::$variant(v) => Ok(v),
                other => Err(TableError::Convert(format!(
                    concat!("expected ", $name, " value, found {:?}"),
                    other
                ))),
            }
        }

        /// Consume the value as this kind; `Null` becomes `None`
        pub fn $opt(self) -> Result<Option<$ty>> {
            match self {
                Value::Null => Ok(None),
                other => other.$into().map(Some),
            }
        }
    };
}

impl Value {
    /// True for the null sentinel value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    value_accessors!(into_bool, opt_bool, Bool, bool, "bool");
    value_accessors!(into_i8, opt_i8, I8, i8, "i8");
    value_accessors!(into_i16, opt_i16, I16, i16, "i16");
    value_accessors!(into_i32, opt_i32, I32, i32, "i32");
    value_accessors!(into_i64, opt_i64, I64, i64, "i64");
    value_accessors!(into_u8, opt_u8, U8, u8, "u8");
    value_accessors!(into_u16, opt_u16, U16, u16, "u16");
    value_accessors!(into_u32, opt_u32, U32, u32, "u32");
    value_accessors!(into_u64, opt_u64, U64, u64, "u64");
    value_accessors!(into_f32, opt_f32, F32, f32, "f32");
    value_accessors!(into_f64, opt_f64, F64, f64, "f64");
    value_accessors!(into_decimal, opt_decimal, Decimal, f64, "decimal");
    value_accessors!(into_char, opt_char, Char, char, "char");
    value_accessors!(into_datetime, opt_datetime, DateTime, NaiveDateTime, "datetime");
    value_accessors!(into_string, opt_string, Str, String, "string");
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S")),
            Value::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
