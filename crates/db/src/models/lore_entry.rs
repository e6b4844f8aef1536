//! Campaign lore entry model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `lore_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LoreEntry {
    pub id: DbId,
    pub campaign_id: DbId,
    pub title: String,
    pub category: Option<String>,
    pub content: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lore entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoreEntry {
    pub title: String,
    pub category: Option<String>,
    pub content: Option<String>,
}

impl From<&LoreEntry> for NewLoreEntry {
    fn from(source: &LoreEntry) -> Self {
        Self {
            title: source.title.clone(),
            category: source.category.clone(),
            content: source.content.clone(),
        }
    }
}
