//! Core types for sigstub

mod signal;
mod config;
mod command;
mod cycle;
mod snapshot;
mod error;

pub use signal::{Direction, Signal, SignalKind, SignalRecord, SignalType, SignalValue};
pub use config::{LoopConfig, MatchMode, Profile, SignalSet, UnknownCommandPolicy, WireContract};
pub use command::Command;
pub use cycle::CycleEdge;
pub use snapshot::Snapshot;
pub use error::RegistryError;
