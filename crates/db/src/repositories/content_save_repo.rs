//! Repository for the `content_saves` table.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::content_save::{ContentSave, NewContentSave};

const COLUMNS: &str =
    "id, user_id, snapshot_id, source_type, source_name, source_image_url, source_owner_id, \
     saved_version, instance_id, started_playing_at, created_at";

/// A user's saved copies of published templates.
pub struct ContentSaveRepo;

impl ContentSaveRepo {
    /// Record a save of a template snapshot for a user.
    ///
    /// The unique constraint on (user_id, snapshot_id) rejects a second
    /// save of the same version by the same user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &NewContentSave,
    ) -> Result<ContentSave, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_saves
                 (user_id, snapshot_id, source_type, source_name, source_image_url,
                  source_owner_id, saved_version)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentSave>(&query)
            .bind(user_id)
            .bind(input.snapshot_id)
            .bind(input.source_type.as_str())
            .bind(&input.source_name)
            .bind(&input.source_image_url)
            .bind(input.source_owner_id)
            .bind(input.saved_version)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentSave>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_saves WHERE id = $1");
        sqlx::query_as::<_, ContentSave>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's saves, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ContentSave>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_saves
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ContentSave>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Atomically claim the instance slot on a save.
    ///
    /// Returns the updated row only when `instance_id` was still null;
    /// a concurrent or repeated materialization gets `None` and must
    /// re-read the row for the winning instance id.
    pub async fn claim_instance(
        pool: &PgPool,
        id: DbId,
        instance_id: DbId,
    ) -> Result<Option<ContentSave>, sqlx::Error> {
        let query = format!(
            "UPDATE content_saves
             SET instance_id = $2, started_playing_at = NOW()
             WHERE id = $1 AND instance_id IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentSave>(&query)
            .bind(id)
            .bind(instance_id)
            .fetch_optional(pool)
            .await
    }
}
