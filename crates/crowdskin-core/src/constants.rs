//! Application-wide constants
//!
//! Centralized location for storage keys, milestone thresholds and canopy
//! geometry shared by the engine, the placement algorithm and the models.

/// Key under which the whole growth state blob is persisted
pub const STORAGE_KEY: &str = "crowdskin-tree-growth";

/// Default directory for persisted data when none is configured
pub const DEFAULT_DATA_DIR: &str = "crowdskin_data";

// Timing defaults
/// How long a new leaf "finds its place" before the state is committed
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1500;
/// How long a quiet thought takes to become a mushroom
pub const DEFAULT_MATURATION_DELAY_MS: u64 = 3000;

// Milestones (pure thresholds on total reflections)
pub const FLOWERS_THRESHOLD: u32 = 30;
pub const BIRD_THRESHOLD: u32 = 50;
pub const LANTERNS_THRESHOLD: u32 = 100;
pub const TWILIGHT_THRESHOLD: u32 = 150;

// Seasons
pub const GROWING_SEASON_THRESHOLD: u32 = 10;
pub const BLOOMING_SEASON_THRESHOLD: u32 = 30;
pub const MATURE_SEASON_THRESHOLD: u32 = 100;

/// Maximum number of moods kept in the emotional pattern ring buffer
pub const EMOTIONAL_PATTERN_CAPACITY: usize = 10;

/// Reflections at or above this intensity grow glowing leaves
pub const GLOW_INTENSITY: u8 = 8;
pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;
/// Intensity assumed for stored reflections that never recorded one
pub const DEFAULT_INTENSITY: u8 = 5;

// Trend analysis
pub const TREND_WINDOW: usize = 7;
pub const TREND_MIN_LEAVES: usize = 3;
pub const GENTLE_REMINDER_STREAK: u32 = 3;
/// Number of most recent leaves inspected for the heavy backdrop
pub const RECENT_HEAVINESS_WINDOW: usize = 5;

// Canopy geometry, in percent of the tree viewport
pub mod canopy {
    /// Reflections per additional branch slot
    pub const REFLECTIONS_PER_BRANCH: u32 = 30;
    pub const MIN_BRANCHES: u32 = 2;

    pub const BASE_RADIUS: f64 = 25.0;
    pub const RADIUS_STEP: f64 = 15.0;
    /// Reflections per unit of radius expansion
    pub const REFLECTIONS_PER_EXPANSION: f64 = 50.0;
    pub const MAX_EXPANSION: f64 = 2.0;

    pub const CENTER_X: f64 = 50.0;
    pub const CENTER_Y: f64 = 35.0;
    /// Vertical compression giving the wider-than-tall silhouette
    pub const Y_SQUASH: f64 = 0.6;

    pub const MIN_X: f64 = 15.0;
    pub const MAX_X: f64 = 85.0;
    pub const MIN_Y: f64 = 15.0;
    pub const MAX_Y: f64 = 65.0;

    pub const ANGLE_JITTER_DEG: f64 = 30.0;
    /// Radius jitter as a fraction of the mood's radius factor
    pub const RADIUS_JITTER: f64 = 0.15;
    pub const UNKNOWN_MOOD_RADIUS_FACTOR: f64 = 0.8;

    /// Distance multiplier for the first leaf on a branch
    pub const BRANCH_BASE_REACH: f64 = 0.4;
    /// Extra reach for every further leaf on the same branch
    pub const BRANCH_REACH_STEP: f64 = 0.1;

    pub const MAX_DEPTH: f64 = 10.0;
}
