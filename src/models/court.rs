//! Court model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A physical court. Seed data, never created through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Court {
    pub id: i32,
    pub name: String,
}

impl Court {
    /// The four courts seeded by the initial migration
    pub fn default_courts() -> Vec<Court> {
        (1..=4)
            .map(|id| Court {
                id,
                name: format!("Court {}", id),
            })
            .collect()
    }
}
