use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A released difficult thought. It never becomes a leaf; after a while it
/// grows into a mushroom at the foot of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuietThought {
    pub id: String,
    pub text: String,
    pub date: DateTime<FixedOffset>,
    #[serde(default)]
    pub has_grown: bool,
}

impl QuietThought {
    pub fn new(text: String, date: DateTime<FixedOffset>) -> Self {
        Self {
            id: format!("thought-{}", Uuid::new_v4()),
            text,
            date,
            has_grown: false,
        }
    }
}
