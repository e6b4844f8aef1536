//! Save-slot model: a user's claim on a published template version.

use serde::Serialize;
use sqlx::FromRow;

use lorebound_core::content::ContentType;
use lorebound_core::types::{DbId, Timestamp};

/// A row from the `content_saves` table.
///
/// `instance_id` is null until the user materializes a live copy; once
/// set it never changes, which is what makes materialization idempotent.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentSave {
    pub id: DbId,
    pub user_id: DbId,
    pub snapshot_id: DbId,
    pub source_type: String,
    pub source_name: String,
    pub source_image_url: Option<String>,
    pub source_owner_id: Option<DbId>,
    pub saved_version: i32,
    pub instance_id: Option<DbId>,
    pub started_playing_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl ContentSave {
    pub fn source_type(&self) -> Option<ContentType> {
        ContentType::from_str(&self.source_type)
    }
}

/// DTO for recording a save against a template snapshot.
#[derive(Debug, Clone)]
pub struct NewContentSave {
    pub snapshot_id: DbId,
    pub source_type: ContentType,
    pub source_name: String,
    pub source_image_url: Option<String>,
    pub source_owner_id: Option<DbId>,
    pub saved_version: i32,
}
