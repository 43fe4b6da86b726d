//! Registry errors

/// Errors raised by [`crate::core::SignalRegistry`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown signal: {0}")]
    UnknownSignal(String),
}
