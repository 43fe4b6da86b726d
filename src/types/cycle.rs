//! Clock edge outcomes

/// Which branch of the transition rule a cycle took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEdge {
    /// `reset` high: outputs back to their reset values
    Reset,
    /// `en` high: counter advanced, LEDs shifted
    Enabled,
    /// Both low: outputs untouched
    Idle,
}

impl std::fmt::Display for CycleEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CycleEdge::Reset => "RESET",
            CycleEdge::Enabled => "ENABLED",
            CycleEdge::Idle => "IDLE",
        };
        write!(f, "{}", name)
    }
}
