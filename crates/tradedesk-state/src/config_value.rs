//! Open key-value bags for tool config and approval data
//!
//! Values are limited to strings, booleans and numbers. Anything richer is
//! rejected at the boundary where free-form JSON comes in.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A single config or data value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    String(String),
}

/// String-keyed map of config values
pub type ConfigMap = BTreeMap<String, ConfigValue>;

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value as f64)
    }
}

impl TryFrom<serde_json::Value> for ConfigValue {
    type Error = StoreError;

    fn try_from(value: serde_json::Value) -> StoreResult<Self> {
        match value {
            serde_json::Value::Bool(b) => Ok(ConfigValue::Bool(b)),
            serde_json::Value::String(s) => Ok(ConfigValue::String(s)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(ConfigValue::Number)
                .ok_or_else(|| StoreError::InvalidConfig(format!("number {} out of range", n))),
            other => Err(StoreError::InvalidConfig(format!(
                "unsupported value {}",
                other
            ))),
        }
    }
}

/// Build a config map from `(key, value)` pairs
pub fn config_map<K, V, I>(entries: I) -> ConfigMap
where
    K: Into<String>,
    V: Into<ConfigValue>,
    I: IntoIterator<Item = (K, V)>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Parse JSON object text (e.g. from a create-tool form) into a config map
pub fn parse_config_json(text: &str) -> StoreResult<ConfigMap> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| StoreError::InvalidConfig(e.to_string()))?;

    let serde_json::Value::Object(object) = value else {
        return Err(StoreError::InvalidConfig(
            "config must be a JSON object".to_string(),
        ));
    };

    object
        .into_iter()
        .map(|(key, value)| {
            ConfigValue::try_from(value)
                .map(|v| (key.clone(), v))
                .map_err(|e| match e {
                    StoreError::InvalidConfig(msg) => {
                        StoreError::InvalidConfig(format!("key '{}': {}", key, msg))
                    }
                    other => other,
                })
        })
        .collect()
}
