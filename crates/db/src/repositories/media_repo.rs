//! Repository for the `media_items` table.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::media_item::{MediaItem, NewMediaItem};

const COLUMNS: &str = "id, campaign_id, title, media_type, url, description, created_at";

pub struct MediaRepo;

impl MediaRepo {
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &NewMediaItem,
    ) -> Result<MediaItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_items (campaign_id, title, media_type, url, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaItem>(&query)
            .bind(campaign_id)
            .bind(&input.title)
            .bind(&input.media_type)
            .bind(&input.url)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<MediaItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM media_items WHERE campaign_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, MediaItem>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }
}
