use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque discrete label attached to every sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// One timestamped, categorized observation. Timestamps are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: i64,
    pub value: f64,
    pub category: Category,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64, category: impl Into<Category>) -> Self {
        Self {
            timestamp,
            value,
            category: category.into(),
        }
    }

    /// False for samples whose value cannot be placed on a chart (NaN or infinite).
    pub fn is_plottable(&self) -> bool {
        self.value.is_finite()
    }

    /// Validates an untyped record coming from outside the process.
    pub fn from_raw(index: usize, raw: &RawSample) -> Result<Self, ConfigurationError> {
        let malformed = |reason: &str| ConfigurationError::MalformedSample {
            index,
            reason: reason.to_string(),
        };
        let timestamp = match &raw.timestamp {
            Value::Number(n) => match n.as_i64() {
                Some(ts) => ts,
                None => match n.as_f64() {
                    Some(ts) if ts.is_finite() => ts.floor() as i64,
                    _ => return Err(malformed("timestamp is out of range")),
                },
            },
            Value::Null => return Err(malformed("timestamp is missing")),
            _ => return Err(malformed("timestamp is not a number")),
        };
        let value = match &raw.value {
            Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| malformed("value is not finite"))?,
            Value::Null => return Err(malformed("value is missing")),
            _ => return Err(malformed("value is not a number")),
        };
        let category = match &raw.category {
            Value::String(label) => Category::new(label.as_str()),
            Value::Number(n) => Category::new(n.to_string()),
            Value::Null => Category::default(),
            _ => return Err(malformed("category is not a label")),
        };
        Ok(Self {
            timestamp,
            value,
            category,
        })
    }

    /// Validates a whole batch; the first malformed record rejects the batch.
    pub fn from_raw_batch(raw: &[RawSample]) -> Result<Vec<Self>, ConfigurationError> {
        raw.iter()
            .enumerate()
            .map(|(index, record)| Self::from_raw(index, record))
            .collect()
    }
}

/// Loosely typed sample as read from JSON. Fields may be missing or of the wrong type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSample {
    pub timestamp: Value,
    pub value: Value,
    pub category: Value,
}
