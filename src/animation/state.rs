//! Discrete carousel state.

/// Discrete carousel state. Transitions are driven by
/// [`AnimationController`](super::controller::AnimationController).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// Built, not yet revealed.
    #[default]
    Idle,
    /// Reveal (or restart) in progress.
    Opening,
    /// Cards on the ring, nothing selected.
    Open,
    /// Cards collapsing back to the center.
    Closing,
    /// Cards collapsed.
    Closed,
    /// A card's surfaces are fanned out (or fanning out).
    CardExpanded,
    /// A card's surfaces are folding back.
    CardCondensing,
    /// Torn down; every transition is rejected.
    Disposed,
}

impl AnimationState {
    /// Name used in logs and errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Opening => "Opening",
            Self::Open => "Open",
            Self::Closing => "Closing",
            Self::Closed => "Closed",
            Self::CardExpanded => "CardExpanded",
            Self::CardCondensing => "CardCondensing",
            Self::Disposed => "Disposed",
        }
    }
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
