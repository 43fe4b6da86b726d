//! Core modules for sigstub

pub mod registry;
pub mod command_loop;

pub use registry::SignalRegistry;
pub use command_loop::{CommandLoop, Step};
