//! Repository for the `character_snapshots` table.

use sqlx::PgPool;

use lorebound_core::content::SnapshotKind;
use lorebound_core::types::DbId;

use crate::models::snapshot::{CharacterSnapshot, NewCharacterSnapshot};

const COLUMNS: &str =
    "id, campaign_id, campaign_character_id, vault_character_id, snapshot_kind, snapshot_name, \
     snapshot_data, created_by, created_at";

/// Point-in-time captures of a campaign character's sheet.
pub struct CharacterSnapshotRepo;

impl CharacterSnapshotRepo {
    /// Insert a snapshot, returning the created row.
    ///
    /// The partial unique index rejects a second session-0 snapshot for
    /// the same (campaign, character) pair.
    pub async fn create(
        pool: &PgPool,
        created_by: Option<DbId>,
        input: &NewCharacterSnapshot,
    ) -> Result<CharacterSnapshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_snapshots
                 (campaign_id, campaign_character_id, vault_character_id, snapshot_kind,
                  snapshot_name, snapshot_data, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterSnapshot>(&query)
            .bind(input.campaign_id)
            .bind(input.campaign_character_id)
            .bind(input.vault_character_id)
            .bind(input.snapshot_kind.as_str())
            .bind(&input.snapshot_name)
            .bind(&input.snapshot_data)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// The session-0 snapshot for a character, if one was captured.
    pub async fn find_session0(
        pool: &PgPool,
        campaign_id: DbId,
        campaign_character_id: DbId,
    ) -> Result<Option<CharacterSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_snapshots
             WHERE campaign_id = $1 AND campaign_character_id = $2
               AND snapshot_kind = 'session_0'"
        );
        sqlx::query_as::<_, CharacterSnapshot>(&query)
            .bind(campaign_id)
            .bind(campaign_character_id)
            .fetch_optional(pool)
            .await
    }

    /// List snapshots of one character, newest first, optionally filtered
    /// by kind.
    pub async fn list_by_character(
        pool: &PgPool,
        campaign_id: DbId,
        campaign_character_id: DbId,
        kind: Option<SnapshotKind>,
    ) -> Result<Vec<CharacterSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_snapshots
             WHERE campaign_id = $1 AND campaign_character_id = $2
               AND ($3::text IS NULL OR snapshot_kind = $3)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, CharacterSnapshot>(&query)
            .bind(campaign_id)
            .bind(campaign_character_id)
            .bind(kind.map(|k| k.as_str()))
            .fetch_all(pool)
            .await
    }
}
