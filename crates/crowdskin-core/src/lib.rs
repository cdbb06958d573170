//! Growth engine behind the crowdskin reflection tree.
//!
//! Each journal reflection grows a leaf on a canopy. The engine places
//! leaves, derives the tree's milestones and theme, tracks quiet thoughts
//! that turn into mushrooms, and watches recent moods for a streak that
//! calls for a gentle prompt. Presentation layers hold a
//! [`TreeGrowthEngine`], call its operations and re-render on
//! [`GrowthEvent`]s.

pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod events;
pub mod feedback;
pub mod models;
pub mod placement;
pub mod store;
pub mod tracing_setup;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoreConfig;
pub use engine::{EngineSnapshot, TreeGrowthEngine};
pub use events::{GrowthEvent, GrowthPhase};
pub use feedback::{FeedbackCue, NoopCue};
pub use models::{
    EmotionalTrend, GrowthState, Leaf, LeafColor, Mood, MoodTone, NewReflection, QuietThought,
    Reflection, Shape, TimeOfDay,
};
pub use store::{JsonFileStorage, MemoryStorage, StateStorage, StorageError};

#[cfg(feature = "audio")]
pub use feedback::ToneCue;
