//! Channel declarations and their merge rules.
//!
//! A channel is a named slot in [`WorkflowState`](super::WorkflowState). Nodes never
//! write a slot directly; the engine calls [`Reducer::apply`] with the slot's current
//! value and the node's incoming value.

use serde_json::{Map, Value};

/// Merge rule for one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reducer {
    /// Incoming value overwrites the current one.
    #[default]
    Replace,
    /// Incoming array is concatenated (a non-array is pushed as one element).
    /// Incoming `null` resets the channel to `[]`.
    Append,
    /// Incoming object is shallow-merged key by key (a non-object replaces).
    /// Incoming `null` resets the channel to `{}`.
    Merge,
}

impl Reducer {
    /// Folds `incoming` into `current` and returns the new channel value.
    pub fn apply(&self, current: Option<Value>, incoming: Value) -> Value {
        match self {
            Reducer::Replace => incoming,
            Reducer::Append => {
                let mut items = match current {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                match incoming {
                    Value::Null => return Value::Array(Vec::new()),
                    Value::Array(more) => items.extend(more),
                    other => items.push(other),
                }
                Value::Array(items)
            }
            Reducer::Merge => match incoming {
                Value::Null => Value::Object(Map::new()),
                Value::Object(more) => {
                    let mut merged = match current {
                        Some(Value::Object(map)) => map,
                        _ => Map::new(),
                    };
                    for (k, v) in more {
                        merged.insert(k, v);
                    }
                    Value::Object(merged)
                }
                other => other,
            },
        }
    }
}

/// Declared channel: merge rule plus the value a fresh run starts with when the
/// seed does not provide one.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub reducer: Reducer,
    pub default: Value,
}

impl Channel {
    pub fn new(reducer: Reducer, default: Value) -> Self {
        Self { reducer, default }
    }

    /// `Replace` channel starting at `null`.
    pub fn replace() -> Self {
        Self::new(Reducer::Replace, Value::Null)
    }

    /// `Append` channel starting at `[]`.
    pub fn append() -> Self {
        Self::new(Reducer::Append, Value::Array(Vec::new()))
    }

    /// `Merge` channel starting at `{}`.
    pub fn merge() -> Self {
        Self::new(Reducer::Merge, Value::Object(Map::new()))
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::replace()
    }
}
