//! Media gallery item model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `media_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaItem {
    pub id: DbId,
    pub campaign_id: DbId,
    pub title: Option<String>,
    pub media_type: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a media item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMediaItem {
    pub title: Option<String>,
    pub media_type: Option<String>,
    pub url: String,
    pub description: Option<String>,
}

impl From<&MediaItem> for NewMediaItem {
    fn from(source: &MediaItem) -> Self {
        Self {
            title: source.title.clone(),
            media_type: source.media_type.clone(),
            url: source.url.clone(),
            description: source.description.clone(),
        }
    }
}
