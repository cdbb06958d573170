//! The persisted root aggregate.
//!
//! Only primary data is stored in [`GrowthState`]; milestones, branch and
//! canopy parameters, the preferred reflection time and the mushroom count are
//! computed from it on demand. The on-disk blob still carries the derived
//! values (older readers expect them) but they are ignored on load.

use super::{first_mode, Leaf, Mood, MoodTone, QuietThought, TimeOfDay};
use crate::constants::{
    BIRD_THRESHOLD, EMOTIONAL_PATTERN_CAPACITY, FLOWERS_THRESHOLD, LANTERNS_THRESHOLD,
    RECENT_HEAVINESS_WINDOW, TWILIGHT_THRESHOLD,
};
use crate::placement;
use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "GrowthRecord", into = "GrowthRecord")]
pub struct GrowthState {
    total_reflections: u32,
    #[serde(deserialize_with = "lenient_list")]
    leaves: Vec<Leaf>,
    mood_tone: MoodTone,
    last_reflection_date: Option<DateTime<FixedOffset>>,
    quiet_thoughts: Vec<QuietThought>,
    emotional_pattern: VecDeque<Mood>,
    is_quiet_bloom_mode: bool,
}

impl GrowthState {
    // ===== Stored data =====

    pub fn total_reflections(&self) -> u32 {
        self.total_reflections
    }

    /// Leaves in creation order.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Leaves ordered for painting: deepest first.
    pub fn leaves_by_depth(&self) -> Vec<&Leaf> {
        let mut leaves: Vec<&Leaf> = self.leaves.iter().collect();
        leaves.sort_by(|a, b| b.position.depth.total_cmp(&a.position.depth));
        leaves
    }

    pub fn mood_tone(&self) -> MoodTone {
        self.mood_tone
    }

    pub fn last_reflection_date(&self) -> Option<DateTime<FixedOffset>> {
        self.last_reflection_date
    }

    pub fn quiet_thoughts(&self) -> &[QuietThought] {
        &self.quiet_thoughts
    }

    /// Most recent moods, oldest first.
    pub fn emotional_pattern(&self) -> &VecDeque<Mood> {
        &self.emotional_pattern
    }

    pub fn is_quiet_bloom_mode(&self) -> bool {
        self.is_quiet_bloom_mode
    }

    // ===== Derived =====

    pub fn has_flowers(&self) -> bool {
        self.total_reflections >= FLOWERS_THRESHOLD
    }

    pub fn has_bird(&self) -> bool {
        self.total_reflections >= BIRD_THRESHOLD
    }

    pub fn has_lanterns(&self) -> bool {
        self.total_reflections >= LANTERNS_THRESHOLD
    }

    pub fn twilight_mode(&self) -> bool {
        self.total_reflections >= TWILIGHT_THRESHOLD
    }

    pub fn branch_count(&self) -> u32 {
        placement::branch_count(self.total_reflections)
    }

    pub fn canopy_radius(&self) -> f64 {
        placement::canopy_radius(self.total_reflections)
    }

    pub fn mushroom_count(&self) -> u32 {
        self.quiet_thoughts.iter().filter(|t| t.has_grown).count() as u32
    }

    /// Most frequent time of day across all reflections. On a tie the bucket
    /// that appeared first in the history wins.
    pub fn preferred_reflection_time(&self) -> Option<TimeOfDay> {
        first_mode(self.leaves.iter().map(|leaf| leaf.reflection.time_of_day()))
            .map(|(time, _)| time)
    }

    /// Number of leaves grown from a peaceful, gentle or hopeful reflection.
    pub fn gentle_days_remembered(&self) -> usize {
        self.leaves
            .iter()
            .filter(|leaf| leaf.reflection.mood.is_soft())
            .count()
    }

    /// Whether any of the last few leaves carries a heavy mood.
    pub fn has_recent_heaviness(&self) -> bool {
        let skip = self.leaves.len().saturating_sub(RECENT_HEAVINESS_WINDOW);
        self.leaves[skip..]
            .iter()
            .any(|leaf| leaf.reflection.mood.weighs_on_backdrop())
    }

    // ===== Mutations (engine only) =====

    pub(crate) fn commit_leaf(&mut self, leaf: Leaf) {
        let mood = leaf.reflection.mood.clone();

        self.total_reflections += 1;
        self.mood_tone = mood.tone();
        self.last_reflection_date = Some(leaf.reflection.date);
        self.leaves.push(leaf);

        self.emotional_pattern.push_back(mood);
        while self.emotional_pattern.len() > EMOTIONAL_PATTERN_CAPACITY {
            self.emotional_pattern.pop_front();
        }
    }

    pub(crate) fn reset_tone(&mut self) {
        self.mood_tone = MoodTone::default();
    }

    pub(crate) fn push_quiet_thought(&mut self, thought: QuietThought) {
        self.quiet_thoughts.push(thought);
    }

    /// Flip a quiet thought into a mushroom. Returns false if the thought is
    /// unknown or already grown, so the count is bumped at most once.
    pub(crate) fn mature_quiet_thought(&mut self, id: &str) -> bool {
        match self
            .quiet_thoughts
            .iter_mut()
            .find(|t| t.id == id && !t.has_grown)
        {
            Some(thought) => {
                thought.has_grown = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn toggle_quiet_bloom_mode(&mut self) -> bool {
        self.is_quiet_bloom_mode = !self.is_quiet_bloom_mode;
        self.is_quiet_bloom_mode
    }
}

// =============================================================================
// On-disk shape
// =============================================================================

/// Wire form of the growth state. Every field is optional so that blobs
/// written by older versions (including the web app) keep loading.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GrowthRecord {
    total_reflections: u32,
    leaves: Vec<Leaf>,
    mood_tone: MoodTone,
    #[serde(skip_deserializing)]
    has_flowers: bool,
    #[serde(skip_deserializing)]
    has_bird: bool,
    #[serde(skip_deserializing)]
    has_lanterns: bool,
    #[serde(deserialize_with = "lenient_date")]
    last_reflection_date: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "lenient_list")]
    quiet_thoughts: Vec<QuietThought>,
    emotional_pattern: Vec<Mood>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    preferred_reflection_time: Option<TimeOfDay>,
    is_quiet_bloom_mode: bool,
    #[serde(skip_deserializing)]
    mushroom_count: u32,
    #[serde(skip_deserializing)]
    branch_count: u32,
    #[serde(skip_deserializing)]
    canopy_radius: f64,
    #[serde(skip_deserializing)]
    twilight_mode: bool,
}

/// Accepts RFC 3339 strings; anything else (including the empty string the
/// web app used as "never") reads as `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|value| value.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok()))
}

/// Reads a list entry by entry. An entry that no longer parses is logged
/// and skipped so the rest of the saved tree survives.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let entries = match raw {
        Some(serde_json::Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index, "Skipping unreadable saved entry: {}", e);
                None
            }
        })
        .collect())
}

impl From<GrowthRecord> for GrowthState {
    fn from(mut record: GrowthRecord) -> Self {
        for leaf in &mut record.leaves {
            leaf.refresh_glow();
        }
        let mut emotional_pattern: VecDeque<Mood> = record.emotional_pattern.into();
        while emotional_pattern.len() > EMOTIONAL_PATTERN_CAPACITY {
            emotional_pattern.pop_front();
        }

        Self {
            // The counter never runs behind the leaves it has produced
            total_reflections: record.total_reflections.max(record.leaves.len() as u32),
            leaves: record.leaves,
            mood_tone: record.mood_tone,
            last_reflection_date: record.last_reflection_date,
            quiet_thoughts: record.quiet_thoughts,
            emotional_pattern,
            is_quiet_bloom_mode: record.is_quiet_bloom_mode,
        }
    }
}

impl From<GrowthState> for GrowthRecord {
    fn from(state: GrowthState) -> Self {
        Self {
            has_flowers: state.has_flowers(),
            has_bird: state.has_bird(),
            has_lanterns: state.has_lanterns(),
            preferred_reflection_time: state.preferred_reflection_time(),
            mushroom_count: state.mushroom_count(),
            branch_count: state.branch_count(),
            canopy_radius: state.canopy_radius(),
            twilight_mode: state.twilight_mode(),
            total_reflections: state.total_reflections,
            leaves: state.leaves,
            mood_tone: state.mood_tone,
            last_reflection_date: state.last_reflection_date,
            quiet_thoughts: state.quiet_thoughts,
            emotional_pattern: state.emotional_pattern.into(),
            is_quiet_bloom_mode: state.is_quiet_bloom_mode,
        }
    }
}
