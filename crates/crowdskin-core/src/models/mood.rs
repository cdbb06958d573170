use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a string-backed enum whose unrecognized values survive as
/// `Unknown(raw)` instead of failing deserialization.
macro_rules! open_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// Unrecognized value, kept verbatim and given the default treatment
            Unknown(String),
        }

        impl $name {
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Unknown(raw) => raw.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Unknown(_))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Self::$variant,)+
                    _ => Self::Unknown(value.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unknown(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum!(
    /// The emotion tag on a reflection
    Mood {
        Peaceful => "peaceful",
        Anxious => "anxious",
        Heavy => "heavy",
        Disconnected => "disconnected",
        Overwhelmed => "overwhelmed",
        Hopeful => "hopeful",
        Frustrated => "frustrated",
        Gentle => "gentle",
    }
);

open_enum!(
    /// Leaf silhouette picked in the reflection form
    Shape {
        Triangle => "triangle",
        Circle => "circle",
        Oval => "oval",
        Diamond => "diamond",
        Star => "star",
    }
);

open_enum!(
    /// Leaf color picked in the reflection form
    LeafColor {
        Sage => "sage",
        Yellow => "yellow",
        Gray => "gray",
        Blue => "blue",
        Red => "red",
        Green => "green",
        Orange => "orange",
        Lavender => "lavender",
    }
);

open_enum!(
    /// Where the feeling seems to be heading
    Direction {
        Outward => "outward",
        Inward => "inward",
        Still => "still",
        Rising => "rising",
    }
);

/// Angular sector and relative reach of a mood on the canopy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodCluster {
    /// Base angle in degrees
    pub angle: f64,
    /// Fraction of the canopy radius, in (0, 1]
    pub radius_factor: f64,
}

impl Mood {
    /// Theme tone for the whole tree after a reflection with this mood.
    pub fn tone(&self) -> MoodTone {
        match self {
            Mood::Peaceful => MoodTone::Sage,
            Mood::Anxious => MoodTone::Yellow,
            Mood::Heavy => MoodTone::Gray,
            Mood::Disconnected => MoodTone::Blue,
            Mood::Overwhelmed => MoodTone::Red,
            Mood::Hopeful => MoodTone::Green,
            Mood::Frustrated => MoodTone::Orange,
            Mood::Gentle => MoodTone::Lavender,
            Mood::Unknown(_) => MoodTone::default(),
        }
    }

    /// Canopy sector for this mood. Calm moods sit near the trunk, intense
    /// ones toward the edge. `None` for unknown moods.
    pub fn cluster(&self) -> Option<MoodCluster> {
        let (angle, radius_factor) = match self {
            Mood::Peaceful => (0.0, 0.5),
            Mood::Gentle => (45.0, 0.55),
            Mood::Hopeful => (90.0, 0.7),
            Mood::Disconnected => (135.0, 0.75),
            Mood::Heavy => (180.0, 0.8),
            Mood::Anxious => (225.0, 0.9),
            Mood::Frustrated => (270.0, 0.95),
            Mood::Overwhelmed => (315.0, 1.0),
            Mood::Unknown(_) => return None,
        };
        Some(MoodCluster {
            angle,
            radius_factor,
        })
    }

    /// Sharp moods count toward the streak that triggers a gentle reminder.
    pub fn is_sharp(&self) -> bool {
        matches!(
            self,
            Mood::Anxious | Mood::Overwhelmed | Mood::Frustrated | Mood::Heavy
        )
    }

    pub fn is_soft(&self) -> bool {
        matches!(self, Mood::Peaceful | Mood::Gentle | Mood::Hopeful)
    }

    /// Moods that darken the backdrop when they appear among recent leaves.
    pub fn weighs_on_backdrop(&self) -> bool {
        matches!(self, Mood::Heavy | Mood::Overwhelmed | Mood::Anxious)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Peaceful => "😌",
            Mood::Anxious => "😰",
            Mood::Heavy => "😔",
            Mood::Disconnected => "😶",
            Mood::Overwhelmed => "😵",
            Mood::Hopeful => "🌱",
            Mood::Frustrated => "😤",
            Mood::Gentle => "🕊️",
            Mood::Unknown(_) => "💭",
        }
    }

    /// Base pitch of the growth cue, in Hz.
    pub fn cue_frequency(&self) -> f32 {
        match self {
            Mood::Peaceful => 220.0,
            Mood::Anxious => 180.0,
            Mood::Heavy => 140.0,
            Mood::Disconnected => 160.0,
            Mood::Overwhelmed => 120.0,
            Mood::Hopeful => 330.0,
            Mood::Frustrated => 200.0,
            Mood::Gentle => 280.0,
            Mood::Unknown(_) => 220.0,
        }
    }
}

impl Shape {
    /// CSS clip path for the leaf silhouette; unknown shapes render as ovals.
    pub fn clip_path(&self) -> &'static str {
        match self {
            Shape::Triangle => "polygon(50% 0%, 0% 100%, 100% 100%)",
            Shape::Circle => "circle(50%)",
            Shape::Diamond => "polygon(50% 0%, 100% 50%, 50% 100%, 0% 50%)",
            Shape::Star => "polygon(50% 0%, 61% 35%, 98% 35%, 68% 57%, 79% 91%, 50% 70%, 21% 91%, 32% 57%, 2% 35%, 39% 35%)",
            Shape::Oval | Shape::Unknown(_) => "ellipse(65% 45%)",
        }
    }
}

impl LeafColor {
    /// Palette family used to paint the leaf; unknown colors fall back to sage.
    pub fn palette(&self) -> MoodTone {
        match self {
            LeafColor::Sage | LeafColor::Unknown(_) => MoodTone::Sage,
            LeafColor::Yellow => MoodTone::Yellow,
            LeafColor::Gray => MoodTone::Gray,
            LeafColor::Blue => MoodTone::Blue,
            LeafColor::Red => MoodTone::Red,
            LeafColor::Green => MoodTone::Green,
            LeafColor::Orange => MoodTone::Orange,
            LeafColor::Lavender => MoodTone::Lavender,
        }
    }
}

/// Color theme of the whole tree, driven by the most recent mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum MoodTone {
    /// Calm default, also restored by whispers
    #[default]
    Sage,
    Yellow,
    Gray,
    Blue,
    Red,
    Green,
    Orange,
    Lavender,
}

impl MoodTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodTone::Sage => "sage",
            MoodTone::Yellow => "yellow",
            MoodTone::Gray => "gray",
            MoodTone::Blue => "blue",
            MoodTone::Red => "red",
            MoodTone::Green => "green",
            MoodTone::Orange => "orange",
            MoodTone::Lavender => "lavender",
        }
    }
}

impl From<String> for MoodTone {
    fn from(value: String) -> Self {
        match value.as_str() {
            "yellow" => MoodTone::Yellow,
            "gray" => MoodTone::Gray,
            "blue" => MoodTone::Blue,
            "red" => MoodTone::Red,
            "green" => MoodTone::Green,
            "orange" => MoodTone::Orange,
            "lavender" => MoodTone::Lavender,
            _ => MoodTone::Sage,
        }
    }
}

impl From<MoodTone> for &'static str {
    fn from(value: MoodTone) -> Self {
        value.as_str()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Bucket for a timestamp, using the hour in the timestamp's own offset.
    pub fn of<T: Timelike>(time: &T) -> Self {
        Self::from_hour(time.hour())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mood_keeps_raw_value() {
        let mood = Mood::from("wistful");
        assert_eq!(mood, Mood::Unknown("wistful".to_string()));
        assert!(!mood.is_known());
        assert_eq!(mood.tone(), MoodTone::Sage);
        assert!(mood.cluster().is_none());
        assert_eq!(String::from(mood), "wistful");
    }

    #[test]
    fn test_mood_parsing_is_case_insensitive() {
        assert_eq!(Mood::from("Peaceful"), Mood::Peaceful);
        assert_eq!(Mood::from(" heavy "), Mood::Heavy);
    }

    #[test]
    fn test_mood_serde_uses_plain_strings() {
        let json = serde_json::to_string(&vec![Mood::Gentle, Mood::from("odd")]).unwrap();
        assert_eq!(json, r#"["gentle","odd"]"#);
        let back: Vec<Mood> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Mood::Gentle, Mood::Unknown("odd".to_string())]);
    }

    #[test]
    fn test_every_known_mood_has_distinct_cluster() {
        let mut angles: Vec<f64> = Mood::KNOWN
            .iter()
            .map(|m| m.cluster().unwrap().angle)
            .collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
        angles.dedup();
        assert_eq!(angles.len(), 8);

        for mood in Mood::KNOWN {
            let factor = mood.cluster().unwrap().radius_factor;
            assert!(factor > 0.0 && factor <= 1.0);
        }
        assert!(
            Mood::Peaceful.cluster().unwrap().radius_factor
                < Mood::Overwhelmed.cluster().unwrap().radius_factor
        );
    }

    #[test]
    fn test_sharp_and_soft_sets_are_disjoint() {
        for mood in Mood::KNOWN {
            assert!(!(mood.is_sharp() && mood.is_soft()), "{mood}");
        }
        assert!(!Mood::Disconnected.is_sharp());
        assert!(!Mood::Disconnected.is_soft());
    }

    #[test]
    fn test_unknown_tone_falls_back_to_sage() {
        let tone: MoodTone = serde_json::from_str(r#""teal""#).unwrap();
        assert_eq!(tone, MoodTone::Sage);
        assert_eq!(serde_json::to_string(&MoodTone::Lavender).unwrap(), r#""lavender""#);
    }

    #[test]
    fn test_time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
    }

    #[test]
    fn test_unknown_shape_renders_as_oval() {
        assert_eq!(Shape::from("blob").clip_path(), Shape::Oval.clip_path());
        assert_eq!(LeafColor::from("muted teal").palette(), MoodTone::Sage);
    }
}
