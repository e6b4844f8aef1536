//! Vault character child models: images, locations, spells, writings,
//! and vault-side relationships.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// A row from the `character_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterImage {
    pub id: DbId,
    pub character_id: DbId,
    pub user_id: Option<DbId>,
    pub url: String,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a character image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCharacterImage {
    pub url: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

impl From<&CharacterImage> for NewCharacterImage {
    fn from(source: &CharacterImage) -> Self {
        Self {
            url: source.url.clone(),
            caption: source.caption.clone(),
            is_primary: source.is_primary,
        }
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// A row from the `character_locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterLocation {
    pub id: DbId,
    pub character_id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a character location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCharacterLocation {
    pub name: String,
    pub description: Option<String>,
}

impl From<&CharacterLocation> for NewCharacterLocation {
    fn from(source: &CharacterLocation) -> Self {
        Self {
            name: source.name.clone(),
            description: source.description.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Spells
// ---------------------------------------------------------------------------

/// A row from the `character_spells` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterSpell {
    pub id: DbId,
    pub character_id: DbId,
    pub name: String,
    pub level: Option<i32>,
    pub school: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a character spell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCharacterSpell {
    pub name: String,
    pub level: Option<i32>,
    pub school: Option<String>,
    pub description: Option<String>,
}

impl From<&CharacterSpell> for NewCharacterSpell {
    fn from(source: &CharacterSpell) -> Self {
        Self {
            name: source.name.clone(),
            level: source.level,
            school: source.school.clone(),
            description: source.description.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Writings
// ---------------------------------------------------------------------------

/// A row from the `character_writings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterWriting {
    pub id: DbId,
    pub character_id: DbId,
    pub user_id: Option<DbId>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a character writing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCharacterWriting {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<&CharacterWriting> for NewCharacterWriting {
    fn from(source: &CharacterWriting) -> Self {
        Self {
            title: source.title.clone(),
            content: source.content.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Vault relationships
// ---------------------------------------------------------------------------

/// A row from the `vault_character_relationships` table.
///
/// Unlike campaign relationships, the far end is a free-text name; the
/// optional `related_character_id` link exists only when the named
/// character also lives in the same vault.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VaultRelationship {
    pub id: DbId,
    pub character_id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub relationship_type: Option<String>,
    pub description: Option<String>,
    pub related_character_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a vault relationship. The `related_character_id`
/// link travels separately through the translation table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVaultRelationship {
    pub name: String,
    pub relationship_type: Option<String>,
    pub description: Option<String>,
}

impl From<&VaultRelationship> for NewVaultRelationship {
    fn from(source: &VaultRelationship) -> Self {
        Self {
            name: source.name.clone(),
            relationship_type: source.relationship_type.clone(),
            description: source.description.clone(),
        }
    }
}
