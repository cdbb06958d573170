use super::reflection::{default_color, default_shape};
use super::{LeafColor, Reflection, Shape};
use crate::constants::GLOW_INTENSITY;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position of a leaf in percent of the tree viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafPosition {
    pub x: f64,
    pub y: f64,
    /// Draw-order layer in [0, 10); higher is painted first
    #[serde(default)]
    pub depth: f64,
}

/// Visual projection of one reflection onto the canopy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaf {
    pub id: String,
    pub reflection: Reflection,
    #[serde(default = "default_shape")]
    pub shape: Shape,
    #[serde(default = "default_color")]
    pub color: LeafColor,
    pub position: LeafPosition,
    /// 1-based sequence number of the reflection that grew this leaf
    pub growth_day: u32,
    /// Always follows the reflection's intensity, also for loaded leaves
    #[serde(default)]
    pub is_glowing: bool,
}

impl Leaf {
    pub fn grow(reflection: Reflection, position: LeafPosition, growth_day: u32) -> Self {
        Self {
            id: format!("leaf-{}", Uuid::new_v4()),
            shape: reflection.shape.clone(),
            color: reflection.color.clone(),
            is_glowing: glows(&reflection),
            reflection,
            position,
            growth_day,
        }
    }

    /// Re-derive the glow flag from the reflection, whatever was stored.
    pub(crate) fn refresh_glow(&mut self) {
        self.is_glowing = glows(&self.reflection);
    }
}

fn glows(reflection: &Reflection) -> bool {
    reflection.intensity >= GLOW_INTENSITY
}
