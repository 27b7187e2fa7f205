//! Values documents: YAML decoded into a string-keyed template context.
//!
//! A values file is an ordinary YAML document whose root is a mapping. It is
//! decoded into [`Values`], a map from string keys to dynamically typed
//! values, and handed to the template as its context without any schema
//! checks.
//!
//! # Decoding Rules
//!
//! | Input | Result |
//! |-------|--------|
//! | empty file, or a `null` root | empty mapping |
//! | mapping root | the mapping |
//! | sequence or scalar root | [`ValuesError::NotAMapping`] |
//! | comment-only file, bare `---` | empty mapping |
//! | multiple documents (`---`) | first document only |
//! | anchors and aliases (`&a`, `*a`) | expanded in place |
//! | merge keys (`<<: *a`) | merged; explicit keys win |
//! | bool / number / null keys | converted to their string form |
//! | sequence / mapping keys | [`ValuesError::UnsupportedKey`] |
//! | tagged values (`!foo bar`) | the tag is dropped |
//! | `.inf`, `.nan` | [`ValuesError::NonFiniteNumber`] |
//!
//! Nested mappings are stored with sorted keys, so iterating a mapping in a
//! template visits keys in lexical order.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

use crate::error::RenderError;

/// Errors produced while decoding a values document.
#[derive(Debug, thiserror::Error)]
pub enum ValuesError {
    /// The document is not valid YAML.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// The document root is something other than a mapping.
    #[error("values document must be a mapping, found a {0}")]
    NotAMapping(&'static str),

    /// A mapping key is a sequence or mapping and has no string form.
    #[error("unsupported {kind} key at {path}")]
    UnsupportedKey { path: String, kind: &'static str },

    /// A float is infinite or NaN.
    #[error("value at {path} is not a finite number")]
    NonFiniteNumber { path: String },
}

/// A decoded values document.
///
/// Serializes as a plain mapping, which is what templates see as their
/// context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Values(Map<String, Value>);

impl Values {
    /// Creates an empty values mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and decodes a values file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ValuesRead`] if the file cannot be read and
    /// [`RenderError::ValuesDecode`] if its content is not a usable mapping.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| RenderError::ValuesRead {
            path: path.to_path_buf(),
            source,
        })?;
        let values = Self::from_slice(&bytes).map_err(|source| RenderError::ValuesDecode {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), keys = values.len(), "loaded values");
        Ok(values)
    }

    /// Decodes a values document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValuesError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        let mut document = match serde_yaml::Deserializer::from_slice(bytes).next() {
            Some(document) => YamlValue::deserialize(document)?,
            None => YamlValue::Null,
        };
        document.apply_merge()?;

        match strip_tags(document) {
            YamlValue::Null => Ok(Self::new()),
            YamlValue::Mapping(mapping) => convert_mapping(mapping, "").map(Self),
            other => Err(ValuesError::NotAMapping(kind_of(&other))),
        }
    }

    /// Decodes a values document from a string.
    pub fn from_yaml_str(source: &str) -> Result<Self, ValuesError> {
        Self::from_slice(source.as_bytes())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts a value, returning the previous one if present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Consumes the values and returns the underlying mapping.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Values {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn strip_tags(value: YamlValue) -> YamlValue {
    match value {
        YamlValue::Tagged(tagged) => strip_tags(tagged.value),
        other => other,
    }
}

fn kind_of(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "boolean",
        YamlValue::Number(_) => "number",
        YamlValue::String(_) => "string",
        YamlValue::Sequence(_) => "sequence",
        YamlValue::Mapping(_) => "mapping",
        YamlValue::Tagged(_) => "tagged value",
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn convert_mapping(mapping: serde_yaml::Mapping, path: &str) -> Result<Map<String, Value>, ValuesError> {
    let mut map = Map::new();
    for (key, value) in mapping {
        let key = key_to_string(key, path)?;
        let value = convert_value(value, &child_path(path, &key))?;
        map.insert(key, value);
    }
    Ok(map)
}

fn key_to_string(key: YamlValue, parent: &str) -> Result<String, ValuesError> {
    match strip_tags(key) {
        YamlValue::String(s) => Ok(s),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        other => Err(ValuesError::UnsupportedKey {
            path: if parent.is_empty() {
                "<root>".to_string()
            } else {
                parent.to_string()
            },
            kind: kind_of(&other),
        }),
    }
}

fn convert_value(value: YamlValue, path: &str) -> Result<Value, ValuesError> {
    match value {
        YamlValue::Null => Ok(Value::Null),
        YamlValue::Bool(b) => Ok(Value::Bool(b)),
        YamlValue::Number(n) => convert_number(&n, path),
        YamlValue::String(s) => Ok(Value::String(s)),
        YamlValue::Sequence(seq) => seq
            .into_iter()
            .enumerate()
            .map(|(i, item)| convert_value(item, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        YamlValue::Mapping(mapping) => convert_mapping(mapping, path).map(Value::Object),
        YamlValue::Tagged(tagged) => convert_value(tagged.value, path),
    }
}

fn convert_number(n: &serde_yaml::Number, path: &str) -> Result<Value, ValuesError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::from(u));
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| ValuesError::NonFiniteNumber {
            path: path.to_string(),
        })
}
