//! Repository for the `vault_characters` table.

use sqlx::PgPool;

use lorebound_core::content::ContentMode;
use lorebound_core::types::DbId;

use crate::models::vault_character::{ExportSummary, NewVaultCharacter, VaultCharacter};

const COLUMNS: &str =
    "id, user_id, name, kind, description, summary, notes, backstory, motivations, image_url, \
     detail_image_url, status, status_color, race, class, background, appearance, personality, \
     goals, secrets, age, npc_role, important_people, quotes, is_archived, is_favorite, \
     content_mode, is_published, template_version, template_id, saved_template_version, \
     published_at, allow_save, template_save_count, attribution_name, template_description, \
     source_type, source_campaign_id, source_campaign_name, source_campaign_character_id, \
     source_snapshot_date, source_session_number, character_lineage_id, \
     created_at, updated_at, deleted_at";

/// CRUD plus lineage and link queries for vault characters.
pub struct VaultCharacterRepo;

impl VaultCharacterRepo {
    /// Insert a vault character owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &NewVaultCharacter,
    ) -> Result<VaultCharacter, sqlx::Error> {
        let query = format!(
            "INSERT INTO vault_characters
                 (user_id, name, kind, description, summary, notes, backstory, motivations,
                  image_url, detail_image_url, status, status_color, race, class, background,
                  appearance, personality, goals, secrets, age, npc_role, important_people,
                  quotes, is_archived, is_favorite, template_id, saved_template_version,
                  source_type, source_campaign_id, source_campaign_name,
                  source_campaign_character_id, source_snapshot_date, source_session_number,
                  character_lineage_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30,
                     $31, $32, $33, $34)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VaultCharacter>(&query)
            .bind(user_id)
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
            .bind(&input.age)
            .bind(&input.npc_role)
            .bind(&input.important_people)
            .bind(&input.quotes)
            .bind(input.is_archived)
            .bind(input.is_favorite)
            .bind(input.template_id)
            .bind(input.saved_template_version)
            .bind(&input.source.source_type)
            .bind(input.source.source_campaign_id)
            .bind(&input.source.source_campaign_name)
            .bind(input.source.source_campaign_character_id)
            .bind(input.source.source_snapshot_date)
            .bind(input.source.source_session_number)
            .bind(input.source.character_lineage_id)
            .fetch_one(pool)
            .await
    }

    /// Find a vault character by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VaultCharacter>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM vault_characters WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, VaultCharacter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all vault characters owned by a user. Excludes soft-deleted rows.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<VaultCharacter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vault_characters
             WHERE user_id = $1 AND deleted_at IS NULL
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, VaultCharacter>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find the user's live-linked vault copy of a campaign character, if any.
    pub async fn find_linked(
        pool: &PgPool,
        user_id: DbId,
        campaign_id: DbId,
        campaign_character_id: DbId,
    ) -> Result<Option<VaultCharacter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vault_characters
             WHERE user_id = $1
               AND source_campaign_id = $2
               AND source_campaign_character_id = $3
               AND source_type = 'linked'
               AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, VaultCharacter>(&query)
            .bind(user_id)
            .bind(campaign_id)
            .bind(campaign_character_id)
            .fetch_optional(pool)
            .await
    }

    /// All exports a user has taken of one campaign character, most
    /// recent snapshot first.
    pub async fn list_exports(
        pool: &PgPool,
        user_id: DbId,
        campaign_id: DbId,
        campaign_character_id: DbId,
    ) -> Result<Vec<ExportSummary>, sqlx::Error> {
        sqlx::query_as::<_, ExportSummary>(
            "SELECT id, name, source_snapshot_date, source_session_number, source_type
             FROM vault_characters
             WHERE user_id = $1
               AND source_campaign_id = $2
               AND source_campaign_character_id = $3
               AND deleted_at IS NULL
             ORDER BY source_snapshot_date DESC NULLS LAST",
        )
        .bind(user_id)
        .bind(campaign_id)
        .bind(campaign_character_id)
        .fetch_all(pool)
        .await
    }

    /// Lineage id shared by prior exports of one campaign character:
    /// the earliest export's lineage id, falling back to its own id.
    pub async fn find_lineage_root(
        pool: &PgPool,
        user_id: DbId,
        campaign_id: DbId,
        campaign_character_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT COALESCE(character_lineage_id, id)
             FROM vault_characters
             WHERE user_id = $1
               AND source_campaign_id = $2
               AND source_campaign_character_id = $3
               AND deleted_at IS NULL
             ORDER BY created_at ASC
             LIMIT 1",
        )
        .bind(user_id)
        .bind(campaign_id)
        .bind(campaign_character_id)
        .fetch_optional(pool)
        .await
    }

    /// Backfill the lineage id on a row that anchors a new lineage.
    pub async fn set_lineage(
        pool: &PgPool,
        id: DbId,
        lineage_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE vault_characters SET character_lineage_id = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(lineage_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite an existing export in place with fresh content and source
    /// tracking. Identity columns (id, user, lineage) are preserved.
    pub async fn overwrite_export(
        pool: &PgPool,
        id: DbId,
        input: &NewVaultCharacter,
    ) -> Result<Option<VaultCharacter>, sqlx::Error> {
        let query = format!(
            "UPDATE vault_characters SET
                name = $2, kind = $3, description = $4, summary = $5, notes = $6,
                backstory = $7, motivations = $8, image_url = $9, detail_image_url = $10,
                status = $11, status_color = $12, race = $13, class = $14, background = $15,
                appearance = $16, personality = $17, goals = $18, secrets = $19, age = $20,
                npc_role = $21, important_people = $22, quotes = $23,
                source_type = $24, source_campaign_id = $25, source_campaign_name = $26,
                source_campaign_character_id = $27, source_snapshot_date = $28,
                source_session_number = $29,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VaultCharacter>(&query)
            .bind(id)
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
            .bind(&input.age)
            .bind(&input.npc_role)
            .bind(&input.important_people)
            .bind(&input.quotes)
            .bind(&input.source.source_type)
            .bind(input.source.source_campaign_id)
            .bind(&input.source.source_campaign_name)
            .bind(input.source.source_campaign_character_id)
            .bind(input.source.source_snapshot_date)
            .bind(input.source.source_session_number)
            .fetch_optional(pool)
            .await
    }

    /// Apply a projected field update flowing back from a linked campaign
    /// character. Vault-only fields (npc_role, favorites, source tracking)
    /// are untouched.
    pub async fn apply_synced_fields(
        pool: &PgPool,
        id: DbId,
        input: &NewVaultCharacter,
    ) -> Result<Option<VaultCharacter>, sqlx::Error> {
        let query = format!(
            "UPDATE vault_characters SET
                name = $2, description = $3, summary = $4, notes = $5, backstory = $6,
                motivations = $7, image_url = $8, detail_image_url = $9, status = $10,
                status_color = $11, race = $12, class = $13, background = $14,
                appearance = $15, personality = $16, goals = $17, secrets = $18,
                age = $19, important_people = $20, quotes = $21,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VaultCharacter>(&query)
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
            .bind(&input.age)
            .bind(&input.important_people)
            .bind(&input.quotes)
            .fetch_optional(pool)
            .await
    }

    /// Mark a vault character published at the given template version,
    /// flipping it into template mode.
    pub async fn mark_published(
        pool: &PgPool,
        id: DbId,
        version: i32,
        allow_save: bool,
        attribution_name: Option<&str>,
        template_description: Option<&str>,
    ) -> Result<Option<VaultCharacter>, sqlx::Error> {
        let query = format!(
            "UPDATE vault_characters SET
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
        sqlx::query_as::<_, VaultCharacter>(&query)
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
            "UPDATE vault_characters SET template_save_count = template_save_count + 1
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
