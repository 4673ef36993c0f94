use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use super::{lenient, lenient_or_default, optional_text, Offer};

// v1: bare array of records
// v2: { "data": [...], "metadata": {...} } as the scraper writes it
// v3: v2 plus "schema_version": 3
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaVersion {
    BareArray,
    Envelope,
    Versioned(u32),
}

impl SchemaVersion {
    pub fn number(self) -> u32 {
        match self {
            Self::BareArray => 1,
            Self::Envelope => 2,
            Self::Versioned(v) => v,
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unsupported schema_version {found}, newest known is {}", CURRENT_SCHEMA_VERSION)]
    Unsupported { found: u32 },

    #[error("malformed payload: {reason}")]
    Malformed { reason: String },
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total_records: Option<usize>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub scraper_version: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: Offer"))]
pub struct Dataset<T> {
    pub schema_version: u32,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub metadata: Metadata,
    pub data: Vec<T>,
}

impl<T: Offer> Dataset<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            metadata: Metadata::default(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub fn detect_version(payload: &Value) -> Result<SchemaVersion, SchemaError> {
    match payload {
        Value::Array(_) => Ok(SchemaVersion::BareArray),
        Value::Object(map) => match map.get("schema_version") {
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(SchemaVersion::Versioned)
                .ok_or_else(|| SchemaError::Malformed {
                    reason: format!("schema_version must be a positive integer, got {v}"),
                }),
            None if map.contains_key("data") => Ok(SchemaVersion::Envelope),
            None => Err(SchemaError::Malformed {
                reason: "object payload has neither `schema_version` nor `data`".to_string(),
            }),
        },
        other => Err(SchemaError::Malformed {
            reason: format!("expected an array or an object, got {}", json_kind(other)),
        }),
    }
}

pub fn migrate(payload: Value) -> Result<(SchemaVersion, Value), SchemaError> {
    let found = detect_version(&payload)?;
    let mut version = found.number();
    if version == 0 || version > CURRENT_SCHEMA_VERSION {
        return Err(SchemaError::Unsupported { found: version });
    }

    let mut value = payload;
    while version < CURRENT_SCHEMA_VERSION {
        value = if version == 1 {
            wrap_bare_array(value)
        } else {
            stamp_version(value, version + 1)
        };
        version += 1;
    }
    Ok((found, value))
}

#[derive(Debug)]
pub struct Parsed<T> {
    pub version: SchemaVersion,
    pub dataset: Dataset<T>,
    pub rejected: usize,
}

/// A record that does not deserialize is skipped on its own.
pub fn parse_dataset<T: Offer>(payload: Value) -> Result<Parsed<T>, SchemaError> {
    let (version, value) = migrate(payload)?;
    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(SchemaError::Malformed {
                reason: format!("expected an object after migration, got {}", json_kind(&other)),
            })
        }
    };
    let entries = match map.remove("data") {
        Some(Value::Array(entries)) => entries,
        _ => {
            return Err(SchemaError::Malformed {
                reason: "`data` must be an array of records".to_string(),
            })
        }
    };
    let metadata = map
        .remove("metadata")
        .and_then(|m| serde_json::from_value::<Metadata>(m).ok())
        .unwrap_or_default();

    let mut data = Vec::with_capacity(entries.len());
    let mut rejected = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<T>(entry) {
            Ok(record) => data.push(record),
            Err(e) => {
                warn!(dataset = T::KIND.label(), index, error = %e, "skipping unreadable record");
                rejected += 1;
            }
        }
    }
    Ok(Parsed {
        version,
        dataset: Dataset {
            schema_version: CURRENT_SCHEMA_VERSION,
            metadata,
            data,
        },
        rejected,
    })
}

fn wrap_bare_array(value: Value) -> Value {
    let mut map = Map::new();
    map.insert("data".to_string(), value);
    map.insert("metadata".to_string(), Value::Object(Map::new()));
    Value::Object(map)
}

fn stamp_version(value: Value, version: u32) -> Value {
    match value {
        Value::Object(mut map) => {
            map.insert("schema_version".to_string(), Value::from(version));
            Value::Object(map)
        }
        other => other,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
