//! Loosely-typed tool arguments and the pagination/limit rules applied to them.

use crate::error::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Default page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size for catalog listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default row limit for free-form queries and table search.
pub const DEFAULT_ROW_LIMIT: i64 = 100;

/// Named limits applied when resolving pagination and row-limit arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub default_row_limit: i64,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            default_row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

impl QueryLimits {
    /// Resolve a requested row limit. Non-positive or absent means the default.
    pub fn row_limit(&self, requested: Option<i64>) -> i64 {
        match requested {
            Some(limit) if limit > 0 => limit,
            _ => self.default_row_limit,
        }
    }
}

/// Resolved pagination for a catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Page below 1 becomes 1; page size at or below 0 becomes the default and
    /// anything above the maximum is clamped.
    pub fn resolve(page: Option<i64>, page_size: Option<i64>, limits: &QueryLimits) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let page_size = match page_size {
            Some(size) if size > limits.max_page_size => limits.max_page_size,
            Some(size) if size > 0 => size,
            _ => limits.default_page_size,
        };
        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// `ceil(total_count / page_size)`; zero rows means zero pages.
    pub fn total_pages(&self, total_count: i64) -> i64 {
        if total_count <= 0 {
            return 0;
        }
        (total_count + self.page_size - 1) / self.page_size
    }
}

/// Arguments of a single tool invocation.
///
/// Values are strings or numbers; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolArguments(Map<String, JsonValue>);

impl ToolArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a JSON object; `null` is treated as no arguments.
    pub fn from_value(value: JsonValue) -> DbResult<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            JsonValue::Null => Ok(Self::default()),
            other => Err(DbError::validation(format!(
                "arguments must be an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<JsonValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A required, non-empty string. Missing, null and empty are all rejected
    /// with the same message.
    pub fn required_str(&self, key: &str) -> DbResult<String> {
        self.optional_str(key)?
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DbError::validation(format!("{} parameter is required", key)))
    }

    pub fn optional_str(&self, key: &str) -> DbResult<Option<String>> {
        match self.0.get(key) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(DbError::validation(format!(
                "{} must be a string, got {}",
                key,
                json_type_name(other)
            ))),
        }
    }

    /// An optional number, truncated toward zero.
    pub fn optional_int(&self, key: &str) -> DbResult<Option<i64>> {
        match self.0.get(key) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::Number(n)) => Ok(n
                .as_i64()
                .or_else(|| n.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
                .or_else(|| n.as_f64().map(|v| v.trunc() as i64))),
            Some(other) => Err(DbError::validation(format!(
                "{} must be a number, got {}",
                key,
                json_type_name(other)
            ))),
        }
    }
}

impl From<Map<String, JsonValue>> for ToolArguments {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
