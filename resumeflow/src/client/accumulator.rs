use serde_json::{Map, Value};

use crate::error::AgentError;
use crate::state::keys;
use crate::stream::Frame;

/// Caller-held state: the seed plus every frame's channels, key by key.
///
/// Frames carry post-reducer values, so plain replacement reproduces the engine's
/// state for every channel a node touched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateAccumulator {
    values: Map<String, Value>,
}

impl StateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a seed object (`null` is an empty seed).
    pub fn from_seed(seed: Value) -> Result<Self, AgentError> {
        match seed {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::default()),
            _ => Err(AgentError::ExecutionFailed(
                "seed state must be a JSON object".into(),
            )),
        }
    }

    /// Replaces each key the frame carries.
    pub fn merge(&mut self, frame: &Frame) {
        for (key, value) in &frame.partial_state {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Non-empty `error` channel value, if a node failed.
    pub fn error(&self) -> Option<&str> {
        self.get(keys::ERROR)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: Frames replace keys; untouched seed keys survive.
    #[test]
    fn merge_replaces_per_key() {
        let mut acc = StateAccumulator::from_seed(json!({"jd": "Go", "summaries": ["a"]})).unwrap();
        let Value::Object(partial) = json!({"summaries": ["a", "b"], "queries": []}) else {
            unreachable!()
        };
        acc.merge(&Frame::new("web_searcher", partial));
        assert_eq!(acc.get("summaries"), Some(&json!(["a", "b"])));
        assert_eq!(acc.get("jd"), Some(&json!("Go")));
        assert_eq!(acc.error(), None);
        assert!(StateAccumulator::from_seed(json!("x")).is_err());
    }
}
