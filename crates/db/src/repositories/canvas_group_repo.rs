//! Repository for the `canvas_groups` table.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::canvas_group::{CanvasGroup, NewCanvasGroup};

const COLUMNS: &str =
    "id, campaign_id, name, color, position_x, position_y, width, height, created_at, updated_at";

/// Visual groupings on the campaign canvas.
pub struct CanvasGroupRepo;

impl CanvasGroupRepo {
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &NewCanvasGroup,
    ) -> Result<CanvasGroup, sqlx::Error> {
        let query = format!(
            "INSERT INTO canvas_groups (campaign_id, name, color, position_x, position_y, width, height)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CanvasGroup>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.color)
            .bind(input.position_x)
            .bind(input.position_y)
            .bind(input.width)
            .bind(input.height)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<CanvasGroup>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM canvas_groups WHERE campaign_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, CanvasGroup>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }
}
