//! Full state map and the partial update a node returns.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AgentError;

use super::channel::{Channel, Reducer};
use super::keys;

/// Mapping from channel name to value; one instance per in-flight phase call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkflowState {
    values: Map<String, Value>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from a JSON object seed (e.g. a request body or a previous
    /// phase's accumulator).
    pub fn from_value(seed: Value) -> Result<Self, AgentError> {
        match seed {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::default()),
            other => Err(AgentError::ExecutionFailed(format!(
                "seed state must be a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Value for `key` unless absent or `null`.
    pub fn present(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Deserializes a channel into `T`. Absent or `null` yields `Ok(None)`; a shape
    /// mismatch yields `AgentError::Validation`.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AgentError> {
        match self.present(key) {
            None => Ok(None),
            Some(v) => serde_json::from_value(v.clone())
                .map(Some)
                .map_err(|e| AgentError::Validation(format!("channel {}: {}", key, e))),
        }
    }

    /// Like [`decode`](Self::decode) but a missing channel is an `ExecutionFailed`.
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> Result<T, AgentError> {
        self.decode(key)?
            .ok_or_else(|| AgentError::ExecutionFailed(format!("missing required channel: {}", key)))
    }

    /// Fills channels the seed does not carry with their declared defaults.
    pub(crate) fn fill_defaults(&mut self, channels: &HashMap<String, Channel>) {
        for (name, channel) in channels {
            if !self.values.contains_key(name) {
                self.values.insert(name.clone(), channel.default.clone());
            }
        }
    }

    /// Folds `update` into the state through each channel's reducer. Undeclared
    /// channels use `Replace`. Returns the post-reducer value of every touched channel.
    pub(crate) fn apply(
        &mut self,
        update: StateUpdate,
        channels: &HashMap<String, Channel>,
    ) -> Map<String, Value> {
        let mut touched = Map::new();
        for (key, incoming) in update.values {
            let reducer = channels
                .get(&key)
                .map(|c| c.reducer)
                .unwrap_or(Reducer::Replace);
            let merged = reducer.apply(self.values.remove(&key), incoming);
            touched.insert(key.clone(), merged.clone());
            self.values.insert(key, merged);
        }
        touched
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

/// Partial state returned by a node: only the channels it touches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateUpdate {
    values: Map<String, Value>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update carrying only the `error` channel.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new().set(keys::ERROR, Value::String(message.into()))
    }

    /// Sets one channel (builder style).
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Sets one channel from any serializable value.
    pub fn set_serialized<T: Serialize>(
        self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, AgentError> {
        let key = key.into();
        let value = serde_json::to_value(value)
            .map_err(|e| AgentError::ExecutionFailed(format!("serialize {}: {}", key, e)))?;
        Ok(self.set(key, value))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }
}

impl From<Map<String, Value>> for StateUpdate {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
