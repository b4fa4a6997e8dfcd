//! The observed config document.
//!
//! An untyped tree of nested mappings with string and string-sequence leaves.
//! It is rebuilt from scratch on every reconciliation pass and compared
//! structurally against the copy stored in the operator config: mapping key
//! order is irrelevant, sequence order is significant.

#[cfg(test)]
mod document_test;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservedConfig(Map<String, Value>);

impl ObservedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a stored document.
    ///
    /// Empty input and JSON `null` decode to an empty document; anything that
    /// is not a JSON object is a decode error.
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(raw)? {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Decode(<serde_json::Error as serde::de::Error>::custom(
                format!("observed config must be an object, got {}", kind_of(&other)),
            ))),
        }
    }

    pub fn to_raw(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.0).map_err(Error::Encode)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Sets `value` at `path`, creating intermediate mappings as needed.
    ///
    /// Fails if an intermediate node exists and is not a mapping.
    pub fn set_nested_field(
        &mut self,
        value: impl Into<Value>,
        path: &[&str],
    ) -> Result<()> {
        let (leaf, parents) = path.split_last().ok_or_else(|| Error::Document {
            path: String::new(),
            reason: "path cannot be empty".to_string(),
        })?;

        let mut node = &mut self.0;
        for (depth, segment) in parents.iter().enumerate() {
            let entry = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            node = match entry {
                Value::Object(child) => child,
                _ => {
                    return Err(Error::Document {
                        path: path[..=depth].join("."),
                        reason: "is not a map".to_string(),
                    })
                }
            };
        }
        node.insert(leaf.to_string(), value.into());
        Ok(())
    }

    pub fn set_nested_string_slice(
        &mut self,
        values: &[String],
        path: &[&str],
    ) -> Result<()> {
        let seq: Vec<Value> = values.iter().cloned().map(Value::String).collect();
        self.set_nested_field(Value::Array(seq), path)
    }

    pub fn nested_field(
        &self,
        path: &[&str],
    ) -> Option<&Value> {
        let (leaf, parents) = path.split_last()?;
        let mut node = &self.0;
        for segment in parents {
            node = node.get(*segment)?.as_object()?;
        }
        node.get(*leaf)
    }

    pub fn nested_string(
        &self,
        path: &[&str],
    ) -> Option<&str> {
        self.nested_field(path)?.as_str()
    }

    pub fn nested_string_slice(
        &self,
        path: &[&str],
    ) -> Option<Vec<String>> {
        self.nested_field(path)?
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Dotted paths whose values differ between `self` and `other`.
    ///
    /// Mappings are descended into; any other differing node (including a
    /// sequence) is reported at its own path.
    pub fn diff(
        &self,
        other: &Self,
    ) -> Vec<String> {
        let mut changed = Vec::new();
        diff_maps(&self.0, &other.0, &mut Vec::new(), &mut changed);
        changed
    }
}

impl From<Map<String, Value>> for ObservedConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn diff_maps<'a>(
    before: &'a Map<String, Value>,
    after: &'a Map<String, Value>,
    prefix: &mut Vec<&'a str>,
    changed: &mut Vec<String>,
) {
    let mut keys: Vec<&String> = before.keys().chain(after.keys()).collect();
    keys.sort();
    keys.dedup();

    for key in keys {
        prefix.push(key.as_str());
        match (before.get(key), after.get(key)) {
            (Some(Value::Object(b)), Some(Value::Object(a))) => diff_maps(b, a, prefix, changed),
            (b, a) if b != a => changed.push(prefix.join(".")),
            _ => {}
        }
        prefix.pop();
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
