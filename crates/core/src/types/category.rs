//! Product categories.
//!
//! Categories are seed-only: the persistence layer exposes no create,
//! update, or delete for them, and product writes never auto-create one.

use serde::{Deserialize, Serialize};

use crate::types::Status;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Icon class reference rendered by the admin panel.
    pub icon: String,
    #[serde(default)]
    pub status: Status,
}

impl Category {
    fn new(id: &str, name: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            status: Status::Active,
        }
    }

    /// The fixed default category set seeded into an empty store.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("1", "Parure", "fas fa-layer-group"),
            Self::new("2", "Bracelet", "fas fa-band-aid"),
            Self::new("3", "Bague", "fas fa-ring"),
            Self::new("4", "Boucles", "fas fa-gem"),
            Self::new("5", "Montre", "fas fa-clock"),
            Self::new("6", "Collier", "fas fa-necklace"),
        ]
    }
}
