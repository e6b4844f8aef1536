//! Repository for the `lore_entries` table.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::lore_entry::{LoreEntry, NewLoreEntry};

const COLUMNS: &str = "id, campaign_id, title, category, content, created_at, updated_at";

pub struct LoreRepo;

impl LoreRepo {
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &NewLoreEntry,
    ) -> Result<LoreEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO lore_entries (campaign_id, title, category, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LoreEntry>(&query)
            .bind(campaign_id)
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<LoreEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM lore_entries WHERE campaign_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, LoreEntry>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }
}
