use super::{first_mode, Leaf, Mood};
use crate::constants::{GENTLE_REMINDER_STREAK, TREND_MIN_LEAVES, TREND_WINDOW};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Summary of recent moods, used to decide whether to offer a supportive
/// prompt. Derived on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalTrend {
    pub dominant_mood: Mood,
    /// Sharp moods within the window
    pub mood_streak: u32,
    /// Date of the most recent soft reflection anywhere in the history
    pub last_soft_day: Option<DateTime<FixedOffset>>,
    pub needs_gentle_reminder: bool,
}

impl EmotionalTrend {
    /// Analyse the last seven leaves. Needs at least three leaves.
    ///
    /// The dominant mood is the most frequent one in the window; ties go to
    /// the mood seen first when walking the window from oldest to newest.
    pub fn analyze(leaves: &[Leaf]) -> Option<Self> {
        if leaves.len() < TREND_MIN_LEAVES {
            return None;
        }

        let window = &leaves[leaves.len().saturating_sub(TREND_WINDOW)..];

        let (dominant_mood, _) =
            first_mode(window.iter().map(|leaf| leaf.reflection.mood.clone()))?;

        let mood_streak = window
            .iter()
            .filter(|leaf| leaf.reflection.mood.is_sharp())
            .count() as u32;

        let last_soft_day = leaves
            .iter()
            .rev()
            .find(|leaf| leaf.reflection.mood.is_soft())
            .map(|leaf| leaf.reflection.date);

        Some(Self {
            dominant_mood,
            mood_streak,
            last_soft_day,
            needs_gentle_reminder: mood_streak >= GENTLE_REMINDER_STREAK,
        })
    }

    /// The question the reflection loop asks, given the current moment.
    pub fn gentle_question(&self, now: DateTime<FixedOffset>) -> String {
        if let (true, Some(last_soft_day)) = (self.needs_gentle_reminder, self.last_soft_day) {
            let days_since = (now - last_soft_day).num_days().max(0);
            return format!(
                "{} days ago, you felt peaceful and calm. What helped that day?",
                days_since
            );
        }

        if self.mood_streak >= GENTLE_REMINDER_STREAK {
            return "You've been carrying heaviness. What would help you feel lighter today?"
                .to_string();
        }

        "Your tree remembers your gentle moments. What brought you peace before?".to_string()
    }
}

/// Prompt for the reflection loop when there may be no trend yet.
pub fn gentle_question(trend: Option<&EmotionalTrend>, now: DateTime<FixedOffset>) -> String {
    match trend {
        Some(trend) => trend.gentle_question(now),
        None => "Take a moment to breathe with your tree.".to_string(),
    }
}
