//! Command classification

use crate::types::MatchMode;

/// A request's `command` field, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Stop the loop, no response
    Exit,
    /// Overwrite input values from the request's other keys
    Inputs,
    /// Report the registry
    Outputs,
    /// Report the registry (same response as `Outputs`)
    GetInputs,
    /// Apply one clock edge, then report the registry
    RunCycle,
    /// Anything else, kept for logging
    Unknown(String),
}

impl Command {
    /// Classify a command string.
    ///
    /// `exit` and `getinputs` are always exact; `inputs` is always a prefix.
    pub fn parse(raw: &str, mode: MatchMode) -> Self {
        if raw == "exit" {
            return Command::Exit;
        }
        if raw.starts_with("inputs") {
            return Command::Inputs;
        }
        if raw == "getinputs" {
            return Command::GetInputs;
        }
        let (outputs, runcycle) = match mode {
            MatchMode::Exact => (raw == "outputs", raw == "runcycle"),
            MatchMode::Prefix => (raw.starts_with("outputs"), raw.starts_with("runcycle")),
        };
        if outputs {
            Command::Outputs
        } else if runcycle {
            Command::RunCycle
        } else {
            Command::Unknown(raw.to_string())
        }
    }

    /// Short name for log lines
    pub fn name(&self) -> &str {
        match self {
            Command::Exit => "exit",
            Command::Inputs => "inputs",
            Command::Outputs => "outputs",
            Command::GetInputs => "getinputs",
            Command::RunCycle => "runcycle",
            Command::Unknown(raw) => raw,
        }
    }
}
