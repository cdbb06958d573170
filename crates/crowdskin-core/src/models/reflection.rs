use super::{Direction, LeafColor, Mood, Shape, TimeOfDay};
use crate::constants::{DEFAULT_INTENSITY, MAX_INTENSITY, MIN_INTENSITY};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One journal entry. Immutable once the engine has accepted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: String,
    pub date: DateTime<FixedOffset>,
    pub mood: Mood,
    #[serde(default = "default_shape")]
    pub shape: Shape,
    #[serde(default = "default_color")]
    pub color: LeafColor,
    #[serde(default = "default_intensity")]
    pub intensity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_lore: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Reflection {
    /// Time-of-day bucket, falling back to the timestamp when it was not stored.
    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
            .unwrap_or_else(|| TimeOfDay::of(&self.date))
    }
}

// Fallbacks for entries saved before these fields existed
pub(crate) fn default_shape() -> Shape {
    Shape::Oval
}

pub(crate) fn default_color() -> LeafColor {
    LeafColor::Sage
}

fn default_intensity() -> u8 {
    DEFAULT_INTENSITY
}

/// A reflection as submitted by the form, before the engine fills in
/// identity and timing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReflection {
    pub id: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    pub mood: Mood,
    pub shape: Shape,
    pub color: LeafColor,
    pub intensity: u8,
    pub notes: Option<String>,
    pub emotional_lore: Option<String>,
    pub direction: Option<Direction>,
}

impl NewReflection {
    pub fn new(
        mood: impl Into<Mood>,
        shape: impl Into<Shape>,
        color: impl Into<LeafColor>,
        intensity: u8,
    ) -> Self {
        Self {
            id: None,
            date: None,
            mood: mood.into(),
            shape: shape.into(),
            color: color.into(),
            intensity,
            notes: None,
            emotional_lore: None,
            direction: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_direction(mut self, direction: impl Into<Direction>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Fill in whatever the form left out. Blank ids and notes are treated as
    /// absent, intensity is clamped to 1..=10.
    pub fn into_reflection(self, now: DateTime<FixedOffset>) -> Reflection {
        let date = self.date.unwrap_or(now);
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("reflection-{}", Uuid::new_v4()));

        Reflection {
            id,
            date,
            mood: self.mood,
            shape: self.shape,
            color: self.color,
            intensity: self.intensity.clamp(MIN_INTENSITY, MAX_INTENSITY),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            time_of_day: Some(TimeOfDay::of(&date)),
            emotional_lore: self.emotional_lore.filter(|l| !l.trim().is_empty()),
            direction: self.direction,
        }
    }
}
