//! Tag and character-tag link models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: Option<String>,
}

impl From<&Tag> for NewTag {
    fn from(source: &Tag) -> Self {
        Self {
            name: source.name.clone(),
            color: source.color.clone(),
        }
    }
}

/// A row from the `character_tags` link table.
///
/// Pure link row: everything on it is a foreign key, all remapped during
/// a copy. No create DTO exists; the copier inserts links directly.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterTag {
    pub id: DbId,
    pub character_id: DbId,
    pub tag_id: DbId,
    pub related_character_id: Option<DbId>,
    pub created_at: Timestamp,
}
