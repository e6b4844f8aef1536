//! Repositories for the `tags` and `character_tags` tables.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::tag::{CharacterTag, NewTag, Tag};

const TAG_COLUMNS: &str = "id, campaign_id, name, color, created_at";
const LINK_COLUMNS: &str = "id, character_id, tag_id, related_character_id, created_at";

/// CRUD for campaign tags.
pub struct TagRepo;

impl TagRepo {
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &NewTag,
    ) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (campaign_id, name, color)
             VALUES ($1, $2, $3)
             RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE campaign_id = $1 ORDER BY name ASC"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }
}

/// Link rows between characters and tags, with an optional related
/// character for "ally of", "rival of" style tags.
pub struct CharacterTagRepo;

impl CharacterTagRepo {
    pub async fn create(
        pool: &PgPool,
        character_id: DbId,
        tag_id: DbId,
        related_character_id: Option<DbId>,
    ) -> Result<CharacterTag, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_tags (character_id, tag_id, related_character_id)
             VALUES ($1, $2, $3)
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, CharacterTag>(&query)
            .bind(character_id)
            .bind(tag_id)
            .bind(related_character_id)
            .fetch_one(pool)
            .await
    }

    /// List every tag link in a campaign by joining through `tags`.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<CharacterTag>, sqlx::Error> {
        sqlx::query_as::<_, CharacterTag>(
            "SELECT ct.id, ct.character_id, ct.tag_id, ct.related_character_id, ct.created_at
             FROM character_tags ct
             JOIN tags t ON t.id = ct.tag_id
             WHERE t.campaign_id = $1
             ORDER BY ct.id ASC",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }
}
