pub mod growth_state;
pub mod leaf;
pub mod mood;
pub mod quiet_thought;
pub mod reflection;
pub mod seasonal;
pub mod trend;

pub use growth_state::GrowthState;
pub use leaf::{Leaf, LeafPosition};
pub use mood::{Direction, LeafColor, Mood, MoodCluster, MoodTone, Shape, TimeOfDay};
pub use quiet_thought::QuietThought;
pub use reflection::{NewReflection, Reflection};
pub use seasonal::{Season, SeasonalEffects};
pub use trend::{gentle_question, EmotionalTrend};

/// Most frequent item and its count. Ties go to the item that first
/// appeared in the sequence.
pub(crate) fn first_mode<T, I>(items: I) -> Option<(T, u32)>
where
    T: PartialEq,
    I: IntoIterator<Item = T>,
{
    let mut counts: Vec<(T, u32)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }

    let mut best: Option<(T, u32)> = None;
    for (item, count) in counts {
        if best.as_ref().map_or(true, |(_, top)| count > *top) {
            best = Some((item, count));
        }
    }
    best
}
