//! Repository for the `world_maps` table.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::world_map::{NewWorldMap, WorldMap};

const COLUMNS: &str = "id, campaign_id, name, image_url, description, created_at";

pub struct WorldMapRepo;

impl WorldMapRepo {
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &NewWorldMap,
    ) -> Result<WorldMap, sqlx::Error> {
        let query = format!(
            "INSERT INTO world_maps (campaign_id, name, image_url, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorldMap>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.image_url)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<WorldMap>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM world_maps WHERE campaign_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, WorldMap>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }
}
