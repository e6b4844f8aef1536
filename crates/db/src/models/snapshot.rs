//! Snapshot models: immutable template versions and per-character
//! point-in-time snapshots.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use lorebound_core::content::{ContentType, SnapshotKind};
use lorebound_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Template snapshots
// ---------------------------------------------------------------------------

/// A row from the `template_snapshots` table.
///
/// `snapshot_data` holds the aggregate root with non-transferable fields
/// stripped; `related_data` holds the child graph keyed by entity kind.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateSnapshot {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub content_type: String,
    pub content_id: DbId,
    pub version: i32,
    pub version_name: Option<String>,
    pub version_notes: Option<String>,
    pub snapshot_data: Value,
    pub related_data: Value,
    pub allow_save: bool,
    pub save_count: i32,
    pub attribution_name: Option<String>,
    pub template_description: Option<String>,
    pub created_at: Timestamp,
}

impl TemplateSnapshot {
    pub fn content_type(&self) -> Option<ContentType> {
        ContentType::from_str(&self.content_type)
    }
}

/// DTO for publishing a new template version.
#[derive(Debug, Clone)]
pub struct NewTemplateSnapshot {
    pub content_type: ContentType,
    pub content_id: DbId,
    pub version: i32,
    pub version_name: Option<String>,
    pub version_notes: Option<String>,
    pub snapshot_data: Value,
    pub related_data: Value,
    pub allow_save: bool,
    pub attribution_name: Option<String>,
    pub template_description: Option<String>,
}

// ---------------------------------------------------------------------------
// Character snapshots
// ---------------------------------------------------------------------------

/// A row from the `character_snapshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterSnapshot {
    pub id: DbId,
    pub campaign_id: DbId,
    pub campaign_character_id: DbId,
    pub vault_character_id: Option<DbId>,
    pub snapshot_kind: String,
    pub snapshot_name: Option<String>,
    pub snapshot_data: Value,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

impl CharacterSnapshot {
    pub fn snapshot_kind(&self) -> Option<SnapshotKind> {
        SnapshotKind::from_str(&self.snapshot_kind)
    }
}

/// DTO for capturing a character snapshot.
#[derive(Debug, Clone)]
pub struct NewCharacterSnapshot {
    pub campaign_id: DbId,
    pub campaign_character_id: DbId,
    pub vault_character_id: Option<DbId>,
    pub snapshot_kind: SnapshotKind,
    pub snapshot_name: Option<String>,
    pub snapshot_data: Value,
}
