//! Frontmatter metadata values

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata keys in header order. The engine enforces no schema.
pub type Metadata = IndexMap<String, MetaValue>;

/// A single metadata value.
///
/// Values made only of ASCII digits are coerced to integers; everything else
/// stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Str(String),
}

impl MetaValue {
    /// Apply the integer-coercion rule to a raw header value.
    pub fn from_raw(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            // Digit runs too long for i64 stay textual rather than losing precision
            if let Ok(value) = raw.parse::<i64>() {
                return MetaValue::Int(value);
            }
        }
        MetaValue::Str(raw.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            MetaValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetaValue::Int(n) => Some(*n),
            MetaValue::Str(_) => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Int(n) => write!(f, "{}", n),
            MetaValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Str(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Str(s)
    }
}

impl From<i64> for MetaValue {
    fn from(n: i64) -> Self {
        MetaValue::Int(n)
    }
}
