//! Signal Registry: the fixed set of named signals and the clock edge rule
//!
//! Cycle transition (one clock edge):
//! - reset high: counter = 0, leds = 0x5bf0, countersevensegment = 0
//! - else en high: counter += 1 (saturating at i64::MAX, never wrapping),
//!   leds >>= 1, countersevensegment = counter
//! - else: nothing changes

use serde_json::{Map, Value};

use crate::types::{
    CycleEdge, Direction, RegistryError, Signal, SignalKind, SignalSet, SignalValue, Snapshot,
    WireContract,
};
use crate::{
    LED_ARRAY_HEIGHT, LED_ARRAY_WIDTH, LED_RESET_PATTERN, SIGNAL_COUNTER,
    SIGNAL_COUNTER_SEVEN_SEGMENT, SIGNAL_EN, SIGNAL_LEDS, SIGNAL_RESET,
};

/// Ordered registry of every signal the circuit exposes
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRegistry {
    /// Declaration order, which is also wire order
    signals: Vec<Signal>,
}

impl Default for SignalRegistry {
    fn default() -> Self {
        Self::initialize(SignalSet::Board)
    }
}

impl SignalRegistry {
    /// Declare the signal set with its power-on values
    pub fn initialize(set: SignalSet) -> Self {
        let mut signals = vec![
            Signal::new(SIGNAL_EN, Direction::Input, SignalKind::Binary, false),
            Signal::new(SIGNAL_RESET, Direction::Input, SignalKind::Binary, false),
            Signal::new(SIGNAL_COUNTER, Direction::Output, SignalKind::Hex, 0_i64),
        ];
        if set == SignalSet::Board {
            signals.push(Signal::new(
                SIGNAL_LEDS,
                Direction::Output,
                SignalKind::LedArray {
                    height: LED_ARRAY_HEIGHT,
                    width: LED_ARRAY_WIDTH,
                },
                LED_RESET_PATTERN,
            ));
            signals.push(Signal::new(
                SIGNAL_COUNTER_SEVEN_SEGMENT,
                Direction::Output,
                SignalKind::SevenSegment,
                0_i64,
            ));
        }
        Self { signals }
    }

    /// Look up a signal by name
    pub fn get(&self, name: &str) -> Result<&Signal, RegistryError> {
        self.signals
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::UnknownSignal(name.to_string()))
    }

    /// Current value of a signal, `None` if it is not declared
    pub fn value(&self, name: &str) -> Option<&SignalValue> {
        self.get(name).ok().map(|s| &s.value)
    }

    /// All signals in declaration order
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Names of the input signals in declaration order
    pub fn input_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.signals.iter().filter(|s| s.is_input()).map(|s| s.name)
    }

    /// Overwrite an input from a raw request value.
    ///
    /// Returns `Ok(false)` without touching anything when `name` is an
    /// output. The coercion ignores the signal's type tag.
    pub fn set_input(&mut self, name: &str, raw: &Value) -> Result<bool, RegistryError> {
        let signal = self
            .signals
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::UnknownSignal(name.to_string()))?;
        if !signal.is_input() {
            return Ok(false);
        }
        signal.value = SignalValue::coerce(raw);
        Ok(true)
    }

    /// Apply one clock edge to the outputs
    pub fn apply_cycle(&mut self) -> CycleEdge {
        if self.is_high(SIGNAL_RESET) {
            self.drive(SIGNAL_COUNTER, 0);
            self.drive(SIGNAL_LEDS, LED_RESET_PATTERN);
            self.drive(SIGNAL_COUNTER_SEVEN_SEGMENT, 0);
            CycleEdge::Reset
        } else if self.is_high(SIGNAL_EN) {
            let count = self.int_value(SIGNAL_COUNTER).unwrap_or(0).saturating_add(1);
            self.drive(SIGNAL_COUNTER, count);
            if let Some(leds) = self.int_value(SIGNAL_LEDS) {
                // logical shift, vacated high bits stay zero
                self.drive(SIGNAL_LEDS, ((leds as u64) >> 1) as i64);
            }
            self.drive(SIGNAL_COUNTER_SEVEN_SEGMENT, count);
            CycleEdge::Enabled
        } else {
            CycleEdge::Idle
        }
    }

    /// Whole-registry snapshot in the given contract
    pub fn serialize(&self, contract: WireContract) -> Snapshot {
        match contract {
            WireContract::Flat => {
                let mut inputs = Map::new();
                let mut outputs = Map::new();
                for signal in &self.signals {
                    let section = match signal.direction {
                        Direction::Input => &mut inputs,
                        Direction::Output => &mut outputs,
                    };
                    section.insert(signal.name.to_string(), Value::from(&signal.value));
                }
                Snapshot::Flat { inputs, outputs }
            }
            WireContract::Records => {
                Snapshot::Records(self.signals.iter().map(Signal::to_record).collect())
            }
        }
    }

    fn is_high(&self, name: &str) -> bool {
        self.value(name).is_some_and(SignalValue::is_high)
    }

    fn int_value(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(SignalValue::as_int)
    }

    /// Write an output if this signal set declares it
    fn drive(&mut self, name: &str, value: i64) {
        if let Some(signal) = self
            .signals
            .iter_mut()
            .find(|s| s.name == name && s.direction == Direction::Output)
        {
            signal.value = SignalValue::Int(value);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
