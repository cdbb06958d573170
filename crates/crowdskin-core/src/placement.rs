//! Leaf placement on the canopy.
//!
//! The tree grows outward as reflections accumulate: a new branch slot opens
//! every 30 reflections, the canopy widens until it reaches twice its base
//! expansion, and each mood keeps to its own angular sector. Leaves further
//! along a branch sit further from the trunk. Angle, radius and depth carry
//! bounded random jitter so the layout never looks mechanical.

use crate::constants::canopy::*;
use crate::models::{LeafPosition, Mood};
use rand::Rng;

/// Branch slots for a tree holding `total_reflections` leaves.
pub fn branch_count(total_reflections: u32) -> u32 {
    total_reflections / REFLECTIONS_PER_BRANCH + MIN_BRANCHES
}

/// Canopy radius for a tree holding `total_reflections` leaves.
pub fn canopy_radius(total_reflections: u32) -> f64 {
    let expansion = (total_reflections as f64 / REFLECTIONS_PER_EXPANSION).min(MAX_EXPANSION);
    BASE_RADIUS + expansion * RADIUS_STEP
}

/// The deterministic part of a placement, before the angle jitter is
/// applied. Exposed for inspection and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchSlot {
    pub branch_count: u32,
    pub branch_index: u32,
    pub leaf_on_branch: u32,
    pub canopy_radius: f64,
}

impl BranchSlot {
    /// Slot for the leaf added when the tree already holds `leaf_count` leaves.
    pub fn for_leaf(leaf_count: u32) -> Self {
        let branch_count = branch_count(leaf_count + 1);
        Self {
            branch_count,
            branch_index: leaf_count % branch_count,
            leaf_on_branch: leaf_count / branch_count,
            canopy_radius: canopy_radius(leaf_count + 1),
        }
    }

    /// Angular offset of this branch, in degrees.
    pub fn branch_angle(&self) -> f64 {
        self.branch_index as f64 * (360.0 / self.branch_count as f64)
    }

    /// Multiplier pushing later leaves on a branch further out.
    pub fn reach(&self) -> f64 {
        BRANCH_BASE_REACH + self.leaf_on_branch as f64 * BRANCH_REACH_STEP
    }
}

/// Place the next leaf given how many leaves the tree already holds.
pub fn place_leaf<R: Rng>(leaf_count: u32, mood: &Mood, rng: &mut R) -> LeafPosition {
    let slot = BranchSlot::for_leaf(leaf_count);

    let (cluster_angle, radius_factor) = match mood.cluster() {
        Some(cluster) => (cluster.angle, cluster.radius_factor),
        None => (rng.gen_range(0.0..360.0), UNKNOWN_MOOD_RADIUS_FACTOR),
    };

    let angle_jitter = rng.gen_range(-ANGLE_JITTER_DEG..=ANGLE_JITTER_DEG);
    let radius_jitter = radius_factor * rng.gen_range(-RADIUS_JITTER..=RADIUS_JITTER);

    let angle = (cluster_angle + angle_jitter + slot.branch_angle()).rem_euclid(360.0);
    let radius = slot.canopy_radius * (radius_factor + radius_jitter) * slot.reach();

    let depth = rng.gen_range(0.0..MAX_DEPTH);

    project(angle, radius, depth)
}

/// Convert polar canopy coordinates to clamped viewport percentages.
pub fn project(angle_deg: f64, radius: f64, depth: f64) -> LeafPosition {
    let radians = angle_deg.to_radians();
    let x = CENTER_X + radians.cos() * radius;
    let y = CENTER_Y + radians.sin() * radius * Y_SQUASH;

    LeafPosition {
        x: x.clamp(MIN_X, MAX_X),
        y: y.clamp(MIN_Y, MAX_Y),
        depth,
    }
}
