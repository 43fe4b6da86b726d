//! Signal model: direction, type tag, and value

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which side of the circuit drives a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Written by the harness through `inputs`
    Input,
    /// Written only by the cycle transition
    Output,
}

/// Wire name of a signal's type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Binary,
    Hex,
    SevenSegment,
    LedArray,
}

/// Type of a signal, including the dimensions an LED array is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// Single wire, boolean value
    Binary,
    /// Integer bus, shown in hex by the board
    Hex,
    /// Integer driving a seven-segment display
    SevenSegment,
    /// Bitmask driving an LED matrix; dimensions never change
    LedArray { height: u32, width: u32 },
}

impl SignalKind {
    /// Type tag as it appears on the wire
    pub fn signal_type(&self) -> SignalType {
        match self {
            SignalKind::Binary => SignalType::Binary,
            SignalKind::Hex => SignalType::Hex,
            SignalKind::SevenSegment => SignalType::SevenSegment,
            SignalKind::LedArray { .. } => SignalType::LedArray,
        }
    }

    /// `(height, width)` for LED arrays, `None` otherwise
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match *self {
            SignalKind::LedArray { height, width } => Some((height, width)),
            _ => None,
        }
    }
}

/// Current value of a signal.
///
/// Not tied to [`SignalKind`]: an input coerced from the
/// literal `"true"` holds a boolean even when its type tag says `hex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Bool(bool),
    Int(i64),
    Text(String),
    /// Anything else the harness sent (floats, null, arrays, objects), kept verbatim
    Other(Value),
}

impl SignalValue {
    /// Coerce a raw value from an `inputs` request.
    ///
    /// The strings `"true"` and `"false"` become booleans; everything else
    /// passes through with its JSON shape intact.
    pub fn coerce(raw: &Value) -> Self {
        match raw {
            Value::String(s) if s == "true" => SignalValue::Bool(true),
            Value::String(s) if s == "false" => SignalValue::Bool(false),
            Value::String(s) => SignalValue::Text(s.clone()),
            Value::Bool(b) => SignalValue::Bool(*b),
            // integers past i64 stay as serde_json numbers: u64 survives
            // exactly, anything larger was already parsed as f64
            Value::Number(n) => match n.as_i64() {
                Some(i) => SignalValue::Int(i),
                None => SignalValue::Other(raw.clone()),
            },
            other => SignalValue::Other(other.clone()),
        }
    }

    /// Only a boolean `true` drives a control input high
    pub fn is_high(&self) -> bool {
        matches!(self, SignalValue::Bool(true))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SignalValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<bool> for SignalValue {
    fn from(b: bool) -> Self {
        SignalValue::Bool(b)
    }
}

impl From<i64> for SignalValue {
    fn from(i: i64) -> Self {
        SignalValue::Int(i)
    }
}

/// One named wire of the simulated circuit
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: &'static str,
    pub direction: Direction,
    pub kind: SignalKind,
    pub value: SignalValue,
}

impl Signal {
    pub fn new(
        name: &'static str,
        direction: Direction,
        kind: SignalKind,
        value: impl Into<SignalValue>,
    ) -> Self {
        Self {
            name,
            direction,
            kind,
            value: value.into(),
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    /// Wire record for the list-of-records contract
    pub fn to_record(&self) -> SignalRecord {
        let dims = self.kind.dimensions();
        SignalRecord {
            value: self.value.clone(),
            direction: self.direction,
            signal_type: self.kind.signal_type(),
            name: self.name.to_string(),
            height: dims.map(|(h, _)| h),
            width: dims.map(|(_, w)| w),
        }
    }
}

/// A signal as serialized in the list-of-records contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub value: SignalValue,
    pub direction: Direction,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}
