//! Repositories for vault character child tables: images, locations,
//! spells, writings, and vault-side relationships.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::character_assets::{
    CharacterImage, CharacterLocation, CharacterSpell, CharacterWriting, NewCharacterImage,
    NewCharacterLocation, NewCharacterSpell, NewCharacterWriting, NewVaultRelationship,
    VaultRelationship,
};

const IMAGE_COLUMNS: &str = "id, character_id, user_id, url, caption, is_primary, created_at";
const LOCATION_COLUMNS: &str =
    "id, character_id, user_id, name, description, created_at, updated_at";
const SPELL_COLUMNS: &str = "id, character_id, name, level, school, description, created_at";
const WRITING_COLUMNS: &str = "id, character_id, user_id, title, content, created_at, updated_at";
const RELATIONSHIP_COLUMNS: &str =
    "id, character_id, user_id, name, relationship_type, description, related_character_id, \
     created_at, updated_at";

pub struct CharacterImageRepo;

impl CharacterImageRepo {
    pub async fn create(
        pool: &PgPool,
        character_id: DbId,
        user_id: Option<DbId>,
        input: &NewCharacterImage,
    ) -> Result<CharacterImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_images (character_id, user_id, url, caption, is_primary)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {IMAGE_COLUMNS}"
        );
        sqlx::query_as::<_, CharacterImage>(&query)
            .bind(character_id)
            .bind(user_id)
            .bind(&input.url)
            .bind(&input.caption)
            .bind(input.is_primary)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<CharacterImage>, sqlx::Error> {
        let query = format!(
            "SELECT {IMAGE_COLUMNS} FROM character_images WHERE character_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, CharacterImage>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }
}

pub struct CharacterLocationRepo;

impl CharacterLocationRepo {
    pub async fn create(
        pool: &PgPool,
        character_id: DbId,
        user_id: Option<DbId>,
        input: &NewCharacterLocation,
    ) -> Result<CharacterLocation, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_locations (character_id, user_id, name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {LOCATION_COLUMNS}"
        );
        sqlx::query_as::<_, CharacterLocation>(&query)
            .bind(character_id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<CharacterLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {LOCATION_COLUMNS} FROM character_locations
             WHERE character_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, CharacterLocation>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }
}

pub struct CharacterSpellRepo;

impl CharacterSpellRepo {
    pub async fn create(
        pool: &PgPool,
        character_id: DbId,
        input: &NewCharacterSpell,
    ) -> Result<CharacterSpell, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_spells (character_id, name, level, school, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SPELL_COLUMNS}"
        );
        sqlx::query_as::<_, CharacterSpell>(&query)
            .bind(character_id)
            .bind(&input.name)
            .bind(input.level)
            .bind(&input.school)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<CharacterSpell>, sqlx::Error> {
        let query = format!(
            "SELECT {SPELL_COLUMNS} FROM character_spells WHERE character_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, CharacterSpell>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }
}

pub struct CharacterWritingRepo;

impl CharacterWritingRepo {
    pub async fn create(
        pool: &PgPool,
        character_id: DbId,
        user_id: Option<DbId>,
        input: &NewCharacterWriting,
    ) -> Result<CharacterWriting, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_writings (character_id, user_id, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {WRITING_COLUMNS}"
        );
        sqlx::query_as::<_, CharacterWriting>(&query)
            .bind(character_id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<CharacterWriting>, sqlx::Error> {
        let query = format!(
            "SELECT {WRITING_COLUMNS} FROM character_writings
             WHERE character_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, CharacterWriting>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }
}

pub struct VaultRelationshipRepo;

impl VaultRelationshipRepo {
    pub async fn create(
        pool: &PgPool,
        character_id: DbId,
        user_id: Option<DbId>,
        related_character_id: Option<DbId>,
        input: &NewVaultRelationship,
    ) -> Result<VaultRelationship, sqlx::Error> {
        let query = format!(
            "INSERT INTO vault_character_relationships
                 (character_id, user_id, name, relationship_type, description, related_character_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {RELATIONSHIP_COLUMNS}"
        );
        sqlx::query_as::<_, VaultRelationship>(&query)
            .bind(character_id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.relationship_type)
            .bind(&input.description)
            .bind(related_character_id)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<VaultRelationship>, sqlx::Error> {
        let query = format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM vault_character_relationships
             WHERE character_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, VaultRelationship>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }
}
