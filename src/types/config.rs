//! Startup configuration: which protocol variant the loop speaks

use clap::ValueEnum;

/// Preset bundling every setting of one protocol variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Profile {
    /// Five-signal board, list-of-records responses
    #[default]
    Board,
    /// Three-signal counter, flat `inputs`/`outputs` responses
    Counter,
}

/// Shape of every response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireContract {
    /// `{"inputs": {..}, "outputs": {..}}`
    Flat,
    /// `[{"value", "direction", "type", "name", ..}, ..]`
    Records,
}

/// Which signals the registry declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSet {
    /// en, reset, counter
    Counter,
    /// en, reset, counter, leds, countersevensegment
    Board,
}

/// How `inputs`, `outputs` and `runcycle` are recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Exact names, except `inputs` which is always a prefix
    Exact,
    /// Prefix match for `inputs`, `outputs` and `runcycle`
    Prefix,
}

/// What an unrecognized command does
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnknownCommandPolicy {
    /// Respond with the full registry
    Snapshot,
    /// Respond with nothing
    Silent,
}

/// Everything the command loop needs to know, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub contract: WireContract,
    pub signals: SignalSet,
    pub matching: MatchMode,
    /// Respond to `inputs` with the updated registry
    pub echo_inputs: bool,
    pub unknown_commands: UnknownCommandPolicy,
}

impl LoopConfig {
    /// Preset for a profile
    pub fn from_profile(profile: Profile) -> Self {
        match profile {
            Profile::Board => Self {
                contract: WireContract::Records,
                signals: SignalSet::Board,
                matching: MatchMode::Prefix,
                echo_inputs: true,
                unknown_commands: UnknownCommandPolicy::Snapshot,
            },
            Profile::Counter => Self {
                contract: WireContract::Flat,
                signals: SignalSet::Counter,
                matching: MatchMode::Exact,
                echo_inputs: false,
                unknown_commands: UnknownCommandPolicy::Silent,
            },
        }
    }

    pub fn with_unknown_commands(mut self, policy: UnknownCommandPolicy) -> Self {
        self.unknown_commands = policy;
        self
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from_profile(Profile::default())
    }
}
