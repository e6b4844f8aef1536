//! Repository for the `character_relationships` table.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::relationship::{NewRelationship, Relationship};

const COLUMNS: &str =
    "id, campaign_id, from_character_id, to_character_id, relationship_type, description, \
     created_at, updated_at";

/// Directed relationships between two campaign characters.
pub struct RelationshipRepo;

impl RelationshipRepo {
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        from_character_id: DbId,
        to_character_id: DbId,
        input: &NewRelationship,
    ) -> Result<Relationship, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_relationships
                 (campaign_id, from_character_id, to_character_id, relationship_type, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(campaign_id)
            .bind(from_character_id)
            .bind(to_character_id)
            .bind(&input.relationship_type)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<Relationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_relationships
             WHERE campaign_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }
}
