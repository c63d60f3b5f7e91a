use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Outer wrapper the backend puts around every payload.
///
/// A missing or `null` `data` decodes as `T::default()`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct ApiEnvelope<T = Value> {
    #[serde(default)]
    pub code: i64,
    #[serde(default, alias = "msg")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: T,
}

/// Payload of a paginated list endpoint.
///
/// `list` is `None` when the backend omitted the field or sent something other
/// than an array; callers treat that as "nothing to apply". A `data` that is
/// not an object decodes as the empty page, and `total` is `None` unless it is
/// a non-negative count (numeric strings are accepted). Rows inside an array
/// that do not decode are still an error.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData<T> {
    pub list: Option<Vec<T>>,
    pub total: Option<u64>,
}

impl<T> Default for PageData<T> {
    fn default() -> Self {
        Self {
            list: None,
            total: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ExecutorList {
    #[serde(default)]
    pub list: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for PageData<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Value::Object(mut fields) = Value::deserialize(deserializer)? else {
            return Ok(Self::default());
        };
        let list = match fields.remove("list") {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
                    .collect::<Result<Vec<T>, _>>()?,
            ),
            _ => None,
        };
        let total = fields.get("total").and_then(count_or_none);
        Ok(Self { list, total })
    }
}

fn count_or_none(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Encode,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Encode => write!(f, "request encoding error"),
            FailureKind::Decode => write!(f, "response decoding error"),
        }
    }
}
