//! Repository for the `template_snapshots` table.

use sqlx::PgPool;

use lorebound_core::content::ContentType;
use lorebound_core::types::DbId;

use crate::models::snapshot::{NewTemplateSnapshot, TemplateSnapshot};

const COLUMNS: &str =
    "id, user_id, content_type, content_id, version, version_name, version_notes, \
     snapshot_data, related_data, allow_save, save_count, attribution_name, \
     template_description, created_at";

/// Immutable published template versions.
pub struct TemplateSnapshotRepo;

impl TemplateSnapshotRepo {
    /// Insert a new template version, returning the created row.
    ///
    /// The unique constraint on (content_type, content_id, version)
    /// rejects a concurrent publish of the same version number.
    pub async fn create(
        pool: &PgPool,
        user_id: Option<DbId>,
        input: &NewTemplateSnapshot,
    ) -> Result<TemplateSnapshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO template_snapshots
                 (user_id, content_type, content_id, version, version_name, version_notes,
                  snapshot_data, related_data, allow_save, attribution_name, template_description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateSnapshot>(&query)
            .bind(user_id)
            .bind(input.content_type.as_str())
            .bind(input.content_id)
            .bind(input.version)
            .bind(&input.version_name)
            .bind(&input.version_notes)
            .bind(&input.snapshot_data)
            .bind(&input.related_data)
            .bind(input.allow_save)
            .bind(&input.attribution_name)
            .bind(&input.template_description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TemplateSnapshot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM template_snapshots WHERE id = $1");
        sqlx::query_as::<_, TemplateSnapshot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a specific published version of one piece of content.
    pub async fn find_version(
        pool: &PgPool,
        content_type: ContentType,
        content_id: DbId,
        version: i32,
    ) -> Result<Option<TemplateSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_snapshots
             WHERE content_type = $1 AND content_id = $2 AND version = $3"
        );
        sqlx::query_as::<_, TemplateSnapshot>(&query)
            .bind(content_type.as_str())
            .bind(content_id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// Highest published version for one piece of content, or 0 if never
    /// published.
    pub async fn latest_version(
        pool: &PgPool,
        content_type: ContentType,
        content_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version), 0) FROM template_snapshots
             WHERE content_type = $1 AND content_id = $2",
        )
        .bind(content_type.as_str())
        .bind(content_id)
        .fetch_one(pool)
        .await
    }

    /// List all versions of one piece of content, newest first.
    pub async fn list_versions(
        pool: &PgPool,
        content_type: ContentType,
        content_id: DbId,
    ) -> Result<Vec<TemplateSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_snapshots
             WHERE content_type = $1 AND content_id = $2
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, TemplateSnapshot>(&query)
            .bind(content_type.as_str())
            .bind(content_id)
            .fetch_all(pool)
            .await
    }

    /// Increment the save counter on a snapshot.
    pub async fn increment_save_count(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE template_snapshots SET save_count = save_count + 1 WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete superseded versions nobody ever saved, keeping the latest.
    /// Returns the number of rows removed.
    pub async fn prune_unsaved_versions(
        pool: &PgPool,
        content_type: ContentType,
        content_id: DbId,
        keep_version: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM template_snapshots
             WHERE content_type = $1 AND content_id = $2
               AND version < $3 AND save_count = 0",
        )
        .bind(content_type.as_str())
        .bind(content_id)
        .bind(keep_version)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
