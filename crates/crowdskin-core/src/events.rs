use crate::models::EmotionalTrend;
use serde::Serialize;

/// Named phases of adding a reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthPhase {
    #[default]
    Idle,
    /// A leaf has been placed and is finding its spot
    Placing,
    /// The leaf is being written into the tree
    Committing,
}

/// Notifications pushed to subscribers after the engine changes.
#[derive(Debug, Clone, PartialEq)]
pub enum GrowthEvent {
    PhaseChanged(GrowthPhase),
    /// Persisted state changed; carries the freshly analysed trend
    StateChanged {
        total_reflections: u32,
        trend: Option<EmotionalTrend>,
    },
    QuietThoughtMatured {
        thought_id: String,
        mushroom_count: u32,
    },
    /// Silent mode flipped (it is not part of the persisted state)
    SilentModeChanged(bool),
}
