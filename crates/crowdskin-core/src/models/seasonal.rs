use super::GrowthState;
use crate::constants::{
    BLOOMING_SEASON_THRESHOLD, GROWING_SEASON_THRESHOLD, MATURE_SEASON_THRESHOLD,
};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Seedling,
    Growing,
    Blooming,
    Mature,
}

impl Season {
    pub fn for_total(total_reflections: u32) -> Self {
        match total_reflections {
            n if n >= MATURE_SEASON_THRESHOLD => Self::Mature,
            n if n >= BLOOMING_SEASON_THRESHOLD => Self::Blooming,
            n if n >= GROWING_SEASON_THRESHOLD => Self::Growing,
            _ => Self::Seedling,
        }
    }
}

/// Ambient effects the tree view layers on top of the leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalEffects {
    pub has_wind: bool,
    pub has_birds: bool,
    pub has_blossoms: bool,
    pub has_twilight_glow: bool,
    pub current_season: Season,
}

impl SeasonalEffects {
    /// Wind stills in silent mode; everything else follows the milestones.
    pub fn derive(state: &GrowthState, silent_mode: bool) -> Self {
        Self {
            has_wind: !silent_mode,
            has_birds: state.has_bird(),
            has_blossoms: state.has_flowers(),
            has_twilight_glow: state.twilight_mode(),
            current_season: Season::for_total(state.total_reflections()),
        }
    }
}
