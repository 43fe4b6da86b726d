//! Registry snapshots in both wire contracts

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Direction, SignalRecord, SignalValue};

/// Full registry state as written on one response line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    /// Contract A: name → value maps split by direction, declaration order
    Flat {
        inputs: Map<String, Value>,
        outputs: Map<String, Value>,
    },
    /// Contract B: one record per signal, declaration order
    Records(Vec<SignalRecord>),
}

impl Snapshot {
    /// Look up a signal's value by name, whichever contract this is
    pub fn value(&self, name: &str) -> Option<Value> {
        match self {
            Snapshot::Flat { inputs, outputs } => {
                inputs.get(name).or_else(|| outputs.get(name)).cloned()
            }
            Snapshot::Records(records) => records
                .iter()
                .find(|r| r.name == name)
                .map(|r| Value::from(&r.value)),
        }
    }

    /// Signal names in the order they appear on the wire
    pub fn names(&self) -> Vec<String> {
        match self {
            Snapshot::Flat { inputs, outputs } => {
                inputs.keys().chain(outputs.keys()).cloned().collect()
            }
            Snapshot::Records(records) => records.iter().map(|r| r.name.clone()).collect(),
        }
    }

    /// Direction of a signal, if the contract carries it
    pub fn direction(&self, name: &str) -> Option<Direction> {
        match self {
            Snapshot::Flat { inputs, outputs } => {
                if inputs.contains_key(name) {
                    Some(Direction::Input)
                } else if outputs.contains_key(name) {
                    Some(Direction::Output)
                } else {
                    None
                }
            }
            Snapshot::Records(records) => {
                records.iter().find(|r| r.name == name).map(|r| r.direction)
            }
        }
    }
}

impl From<&SignalValue> for Value {
    fn from(value: &SignalValue) -> Self {
        match value {
            SignalValue::Bool(b) => Value::Bool(*b),
            SignalValue::Int(i) => Value::from(*i),
            SignalValue::Text(s) => Value::String(s.clone()),
            SignalValue::Other(v) => v.clone(),
        }
    }
}
