//! Campaign character relationship model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `character_relationships` table. References two
/// characters in the same campaign; both endpoints must exist.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Relationship {
    pub id: DbId,
    pub campaign_id: DbId,
    pub from_character_id: DbId,
    pub to_character_id: DbId,
    pub relationship_type: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Content fields of a relationship; endpoints travel separately since
/// the copier rewrites them through the translation table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRelationship {
    pub relationship_type: Option<String>,
    pub description: Option<String>,
}

impl From<&Relationship> for NewRelationship {
    fn from(source: &Relationship) -> Self {
        Self {
            relationship_type: source.relationship_type.clone(),
            description: source.description.clone(),
        }
    }
}
