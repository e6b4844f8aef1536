//! World map model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `world_maps` table. The image itself lives in object
/// storage; only the URL is carried, as an opaque string.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorldMap {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a world map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorldMap {
    pub name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl From<&WorldMap> for NewWorldMap {
    fn from(source: &WorldMap) -> Self {
        Self {
            name: source.name.clone(),
            image_url: source.image_url.clone(),
            description: source.description.clone(),
        }
    }
}
