//! Repository for the `campaign_characters` table.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::campaign_character::{CampaignCharacter, NewCampaignCharacter};

const COLUMNS: &str =
    "id, campaign_id, name, kind, description, summary, notes, backstory, motivations, \
     image_url, detail_image_url, status, status_color, race, class, background, appearance, \
     personality, goals, secrets, age, role, important_people, quotes, story_hooks, dm_notes, \
     visibility, play_status, is_party_member, position_x, position_y, controlled_by_user_id, \
     vault_character_id, created_at, updated_at";

/// CRUD plus vault-link helpers for campaign characters.
pub struct CampaignCharacterRepo;

impl CampaignCharacterRepo {
    /// Insert a character into a campaign, returning the created row.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &NewCampaignCharacter,
    ) -> Result<CampaignCharacter, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_characters
                 (campaign_id, name, kind, description, summary, notes, backstory, motivations,
                  image_url, detail_image_url, status, status_color, race, class, background,
                  appearance, personality, goals, secrets, age, role, important_people, quotes,
                  story_hooks, dm_notes, visibility, play_status, is_party_member,
                  position_x, position_y, vault_character_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignCharacter>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(&input.description)
            .bind(&input.summary)
            .bind(&input.notes)
            .bind(&input.backstory)
            .bind(&input.motivations)
            .bind(&input.image_url)
            .bind(&input.detail_image_url)
            .bind(&input.status)
            .bind(&input.status_color)
            .bind(&input.race)
            .bind(&input.class)
            .bind(&input.background)
            .bind(&input.appearance)
            .bind(&input.personality)
            .bind(&input.goals)
            .bind(&input.secrets)
            .bind(input.age)
            .bind(&input.role)
            .bind(&input.important_people)
            .bind(&input.quotes)
            .bind(&input.story_hooks)
            .bind(&input.dm_notes)
            .bind(&input.visibility)
            .bind(&input.play_status)
            .bind(input.is_party_member)
            .bind(input.position_x)
            .bind(input.position_y)
            .bind(input.vault_character_id)
            .fetch_one(pool)
            .await
    }

    /// Find a campaign character by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CampaignCharacter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaign_characters WHERE id = $1");
        sqlx::query_as::<_, CampaignCharacter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all characters in a campaign, ordered by name.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<CampaignCharacter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaign_characters
             WHERE campaign_id = $1
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, CampaignCharacter>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Point a campaign character at its linked vault character.
    pub async fn link_to_vault(
        pool: &PgPool,
        id: DbId,
        vault_character_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaign_characters SET vault_character_id = $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(vault_character_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a projected field update from a linked vault character.
    ///
    /// Only the synced subset is written; campaign-only fields (role,
    /// story hooks, DM notes, canvas position, visibility) are untouched.
    pub async fn apply_synced_fields(
        pool: &PgPool,
        id: DbId,
        input: &NewCampaignCharacter,
    ) -> Result<Option<CampaignCharacter>, sqlx::Error> {
        let query = format!(
            "UPDATE campaign_characters SET
                name = $2,
                description = $3,
                summary = $4,
                notes = $5,
                backstory = $6,
                motivations = $7,
                image_url = $8,
                detail_image_url = $9,
                status = $10,
                status_color = $11,
                race = $12,
                class = $13,
                background = $14,
                appearance = $15,
                personality = $16,
                goals = $17,
                secrets = $18,
                age = $19,
                important_people = $20,
                quotes = $21,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignCharacter>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.summary)
            .bind(&input.notes)
            .bind(&input.backstory)
            .bind(&input.motivations)
            .bind(&input.image_url)
            .bind(&input.detail_image_url)
            .bind(&input.status)
            .bind(&input.status_color)
            .bind(&input.race)
            .bind(&input.class)
            .bind(&input.background)
            .bind(&input.appearance)
            .bind(&input.personality)
            .bind(&input.goals)
            .bind(&input.secrets)
            .bind(input.age)
            .bind(&input.important_people)
            .bind(&input.quotes)
            .fetch_optional(pool)
            .await
    }
}
