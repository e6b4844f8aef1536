//! Campaign character model and DTOs.
//!
//! The richest child kind: a full character sheet plus canvas placement
//! and controller assignment. The vault keeps a parallel shape
//! (`vault_characters`) with a slightly different field set; the engine's
//! sync module projects between the two.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `campaign_characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignCharacter {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub backstory: Option<String>,
    pub motivations: Option<String>,
    pub image_url: Option<String>,
    pub detail_image_url: Option<String>,
    pub status: Option<String>,
    pub status_color: Option<String>,
    pub race: Option<String>,
    pub class: Option<String>,
    pub background: Option<String>,
    pub appearance: Option<String>,
    pub personality: Option<String>,
    pub goals: Option<String>,
    pub secrets: Option<String>,
    /// Numeric here; textual on the vault side.
    pub age: Option<i32>,
    pub role: Option<String>,
    pub important_people: Option<serde_json::Value>,
    /// Legacy rows store either a JSON string or an array.
    pub quotes: Option<serde_json::Value>,
    pub story_hooks: Option<String>,
    pub dm_notes: Option<String>,
    pub visibility: String,
    pub play_status: String,
    pub is_party_member: bool,
    pub position_x: f32,
    pub position_y: f32,
    pub controlled_by_user_id: Option<DbId>,
    pub vault_character_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a campaign character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCampaignCharacter {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub backstory: Option<String>,
    pub motivations: Option<String>,
    pub image_url: Option<String>,
    pub detail_image_url: Option<String>,
    pub status: Option<String>,
    pub status_color: Option<String>,
    pub race: Option<String>,
    pub class: Option<String>,
    pub background: Option<String>,
    pub appearance: Option<String>,
    pub personality: Option<String>,
    pub goals: Option<String>,
    pub secrets: Option<String>,
    pub age: Option<i32>,
    pub role: Option<String>,
    pub important_people: Option<serde_json::Value>,
    pub quotes: Option<serde_json::Value>,
    pub story_hooks: Option<String>,
    pub dm_notes: Option<String>,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default = "default_play_status")]
    pub play_status: String,
    #[serde(default)]
    pub is_party_member: bool,
    #[serde(default)]
    pub position_x: f32,
    #[serde(default)]
    pub position_y: f32,
    /// Back-link to a vault character, set for linked imports only.
    /// Never deserialized from snapshot data: the referenced vault row
    /// belongs to another account.
    #[serde(skip_deserializing)]
    pub vault_character_id: Option<DbId>,
}

fn default_kind() -> String {
    "npc".to_string()
}

fn default_visibility() -> String {
    "public".to_string()
}

fn default_play_status() -> String {
    "active".to_string()
}

impl From<&CampaignCharacter> for NewCampaignCharacter {
    /// Content-field projection of a live row.
    ///
    /// Controller assignment and the vault back-link are severed: a copy
    /// belongs to its new owner and links to nobody's vault.
    fn from(source: &CampaignCharacter) -> Self {
        Self {
            name: source.name.clone(),
            kind: source.kind.clone(),
            description: source.description.clone(),
            summary: source.summary.clone(),
            notes: source.notes.clone(),
            backstory: source.backstory.clone(),
            motivations: source.motivations.clone(),
            image_url: source.image_url.clone(),
            detail_image_url: source.detail_image_url.clone(),
            status: source.status.clone(),
            status_color: source.status_color.clone(),
            race: source.race.clone(),
            class: source.class.clone(),
            background: source.background.clone(),
            appearance: source.appearance.clone(),
            personality: source.personality.clone(),
            goals: source.goals.clone(),
            secrets: source.secrets.clone(),
            age: source.age,
            role: source.role.clone(),
            important_people: source.important_people.clone(),
            quotes: source.quotes.clone(),
            story_hooks: source.story_hooks.clone(),
            dm_notes: source.dm_notes.clone(),
            visibility: source.visibility.clone(),
            play_status: source.play_status.clone(),
            is_party_member: source.is_party_member,
            position_x: source.position_x,
            position_y: source.position_y,
            vault_character_id: None,
        }
    }
}
