//! Driver-neutral cell values and MySQL type mappings.
//!
//! # Architecture
//!
//! Type conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies the reported column type name
//! 2. `decode_column` extracts the value for that category as a [`RawValue`]
//!
//! `RawValue` is what crosses the [`SqlExecutor`](crate::db::SqlExecutor)
//! boundary; JSON conversion happens later, in result normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlRow, MySqlTypeInfo, MySqlValueRef};
use sqlx::{Column, Decode, Row, Type, TypeInfo, ValueRef};

/// A single cell as returned by the database.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Textual form of the cell. Bytes are decoded as UTF-8, lossily.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Int(v) => Some(v.to_string()),
            Self::UInt(v) => Some(v.to_string()),
            Self::Float(v) => Some(v.to_string()),
            Self::Bool(v) => Some(v.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
        }
    }

    /// Integer form of the cell; numeric text is parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            Self::Float(v) => Some(*v as i64),
            Self::Bool(v) => Some(*v as i64),
            Self::Text(_) | Self::Bytes(_) => self.as_string()?.trim().parse().ok(),
            Self::Null => None,
        }
    }

    /// Convert into a JSON scalar.
    ///
    /// Byte sequences become strings (lossy for non-UTF-8 data). Non-finite
    /// floats, which JSON cannot represent, become their string form.
    pub fn into_json(self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Int(v) => JsonValue::Number(v.into()),
            Self::UInt(v) => JsonValue::Number(v.into()),
            Self::Float(v) => serde_json::Number::from_f64(v)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(v.to_string())),
            Self::Bool(v) => JsonValue::Bool(v),
            Self::Text(s) => JsonValue::String(s),
            Self::Bytes(b) => JsonValue::String(match String::from_utf8(b) {
                Ok(s) => s,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            }),
        }
    }
}

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for MySQL column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    Time,
    DateTime,
    Timestamp,
    Binary,
    Text,
}

/// Classify a MySQL type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    if lower.contains("decimal") || lower.contains("numeric") {
        return TypeCategory::Decimal;
    }

    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }

    if lower.contains("int") {
        return TypeCategory::Integer;
    }

    if lower.contains("float") || lower.contains("double") || lower == "real" {
        return TypeCategory::Float;
    }

    match lower.as_str() {
        "date" => return TypeCategory::Date,
        "time" => return TypeCategory::Time,
        "datetime" => return TypeCategory::DateTime,
        "timestamp" => return TypeCategory::Timestamp,
        _ => {}
    }

    if lower.contains("blob") || lower.contains("binary") || lower == "bit" {
        return TypeCategory::Binary;
    }

    // varchar, text, char, enum, set, json, year, geometry...
    TypeCategory::Text
}

// =============================================================================
// Decimal Type Support
// =============================================================================

/// Raw DECIMAL/NUMERIC value, preserving the exact database representation.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::MySql> for RawDecimal {
    fn type_info() -> MySqlTypeInfo {
        <String as Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("decimal") || name.contains("numeric")
    }
}

impl<'r> Decode<'r, sqlx::MySql> for RawDecimal {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::MySql>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

// =============================================================================
// Row Decoding
// =============================================================================

/// Column names of a row, in database order.
pub fn column_names(row: &MySqlRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Decode every cell of a row.
pub fn decode_row(row: &MySqlRow) -> Vec<RawValue> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let type_name = col.type_info().name();
            decode_column(row, idx, categorize_type(type_name))
        })
        .collect()
}

fn decode_column(row: &MySqlRow, idx: usize, category: TypeCategory) -> RawValue {
    match row.try_get_raw(idx) {
        Ok(value) if value.is_null() => return RawValue::Null,
        Ok(_) => {}
        Err(e) => {
            tracing::error!(column = idx, error = %e, "Failed to read column");
            return RawValue::Null;
        }
    }

    let decoded = match category {
        TypeCategory::Decimal => row
            .try_get::<RawDecimal, _>(idx)
            .ok()
            .map(|v| RawValue::Text(v.0)),
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Boolean => row.try_get::<bool, _>(idx).ok().map(RawValue::Bool),
        TypeCategory::Float => decode_float(row, idx),
        TypeCategory::Date => row
            .try_get::<NaiveDate, _>(idx)
            .ok()
            .map(|v| RawValue::Text(v.format("%Y-%m-%d").to_string())),
        TypeCategory::Time => row
            .try_get::<NaiveTime, _>(idx)
            .ok()
            .map(|v| RawValue::Text(v.format("%H:%M:%S").to_string())),
        TypeCategory::DateTime => row
            .try_get::<NaiveDateTime, _>(idx)
            .ok()
            .map(|v| RawValue::Text(v.format("%Y-%m-%d %H:%M:%S").to_string())),
        TypeCategory::Timestamp => row
            .try_get::<DateTime<Utc>, _>(idx)
            .ok()
            .map(|v| RawValue::Text(v.format("%Y-%m-%d %H:%M:%S").to_string())),
        TypeCategory::Binary => row.try_get::<Vec<u8>, _>(idx).ok().map(RawValue::Bytes),
        TypeCategory::Text => None,
    };

    decoded.unwrap_or_else(|| decode_fallback(row, idx))
}

fn decode_integer(row: &MySqlRow, idx: usize) -> Option<RawValue> {
    if let Ok(v) = row.try_get::<i8, _>(idx) {
        return Some(RawValue::Int(v.into()));
    }
    if let Ok(v) = row.try_get::<i16, _>(idx) {
        return Some(RawValue::Int(v.into()));
    }
    if let Ok(v) = row.try_get::<i32, _>(idx) {
        return Some(RawValue::Int(v.into()));
    }
    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return Some(RawValue::Int(v));
    }
    if let Ok(v) = row.try_get::<u8, _>(idx) {
        return Some(RawValue::UInt(v.into()));
    }
    if let Ok(v) = row.try_get::<u16, _>(idx) {
        return Some(RawValue::UInt(v.into()));
    }
    if let Ok(v) = row.try_get::<u32, _>(idx) {
        return Some(RawValue::UInt(v.into()));
    }
    if let Ok(v) = row.try_get::<u64, _>(idx) {
        return Some(RawValue::UInt(v));
    }
    None
}

fn decode_float(row: &MySqlRow, idx: usize) -> Option<RawValue> {
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Some(RawValue::Float(v));
    }
    row.try_get::<f32, _>(idx)
        .ok()
        .map(|v| RawValue::Float(v as f64))
}

/// Text first, then raw bytes, for anything the category decoders did not handle.
fn decode_fallback(row: &MySqlRow, idx: usize) -> RawValue {
    if let Ok(v) = row.try_get_unchecked::<String, _>(idx) {
        return RawValue::Text(v);
    }
    match row.try_get_unchecked::<Vec<u8>, _>(idx) {
        Ok(v) => RawValue::Bytes(v),
        Err(e) => {
            tracing::error!(column = idx, error = %e, "Failed to decode column");
            RawValue::Null
        }
    }
}
