//! Repository for the `oneshots` table.

use sqlx::PgPool;

use lorebound_core::content::ContentMode;
use lorebound_core::types::DbId;

use crate::models::oneshot::{NewOneshot, Oneshot};

const COLUMNS: &str =
    "id, user_id, title, description, image_url, game_system, level_range, content_mode, \
     is_published, template_version, template_id, saved_template_version, published_at, \
     allow_save, template_save_count, attribution_name, template_description, \
     created_at, updated_at, deleted_at";

/// CRUD plus publish-state helpers for oneshots.
pub struct OneshotRepo;

impl OneshotRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &NewOneshot,
    ) -> Result<Oneshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO oneshots
                 (user_id, title, description, image_url, game_system, level_range,
                  template_id, saved_template_version)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Oneshot>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(&input.game_system)
            .bind(&input.level_range)
            .bind(input.template_id)
            .bind(input.saved_template_version)
            .fetch_one(pool)
            .await
    }

    /// Find a oneshot by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Oneshot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM oneshots WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Oneshot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all oneshots owned by a user, newest first. Excludes soft-deleted rows.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Oneshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM oneshots
             WHERE user_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Oneshot>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a oneshot published at the given template version, flipping
    /// it into template mode.
    pub async fn mark_published(
        pool: &PgPool,
        id: DbId,
        version: i32,
        allow_save: bool,
        attribution_name: Option<&str>,
        template_description: Option<&str>,
    ) -> Result<Option<Oneshot>, sqlx::Error> {
        let query = format!(
            "UPDATE oneshots SET
                content_mode = $2,
                is_published = TRUE,
                template_version = $3,
                published_at = NOW(),
                allow_save = $4,
                attribution_name = $5,
                template_description = $6,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Oneshot>(&query)
            .bind(id)
            .bind(ContentMode::Template.as_str())
            .bind(version)
            .bind(allow_save)
            .bind(attribution_name)
            .bind(template_description)
            .fetch_optional(pool)
            .await
    }

    /// Increment the denormalized save counter on the published template.
    pub async fn increment_save_count(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE oneshots SET template_save_count = template_save_count + 1
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
