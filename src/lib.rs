//! sigstub: a stand-in for a compiled hardware model
//!
//! Exposes the signals of a toy counter circuit over newline-delimited JSON
//! on stdin/stdout: stdin line → Command → SignalRegistry → stdout line

pub mod core;
pub mod types;

// =============================================================================
// SIGNAL NAMES
// =============================================================================

/// Enable input: counter advances on a cycle while high
pub const SIGNAL_EN: &str = "en";

/// Reset input: takes priority over `en`
pub const SIGNAL_RESET: &str = "reset";

/// Counter output
pub const SIGNAL_COUNTER: &str = "counter";

/// LED array output (bitmask)
pub const SIGNAL_LEDS: &str = "leds";

/// Seven-segment display output, mirrors the counter
pub const SIGNAL_COUNTER_SEVEN_SEGMENT: &str = "countersevensegment";

// =============================================================================
// RESET VALUES
// =============================================================================

/// LED bitmask loaded at startup and on every reset edge
pub const LED_RESET_PATTERN: i64 = 0x5bf0;

/// LED array dimensions (fixed at creation)
pub const LED_ARRAY_HEIGHT: u32 = 10;
pub const LED_ARRAY_WIDTH: u32 = 12;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
