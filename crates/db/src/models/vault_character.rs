//! Vault character aggregate model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `vault_characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VaultCharacter {
    pub id: DbId,
    pub user_id: DbId,
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
    /// Textual here; numeric on the campaign side.
    pub age: Option<String>,
    pub npc_role: Option<String>,
    pub important_people: Option<serde_json::Value>,
    pub quotes: Option<Vec<String>>,
    pub is_archived: bool,
    pub is_favorite: bool,
    pub content_mode: String,
    pub is_published: bool,
    pub template_version: i32,
    pub template_id: Option<DbId>,
    pub saved_template_version: Option<i32>,
    pub published_at: Option<Timestamp>,
    pub allow_save: bool,
    pub template_save_count: i32,
    pub attribution_name: Option<String>,
    pub template_description: Option<String>,
    pub source_type: String,
    pub source_campaign_id: Option<DbId>,
    pub source_campaign_name: Option<String>,
    pub source_campaign_character_id: Option<DbId>,
    pub source_snapshot_date: Option<Timestamp>,
    pub source_session_number: Option<i32>,
    pub character_lineage_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a vault character.
///
/// Source tracking fields are populated by the export path and reset by
/// the clone/materialize paths. Publication metadata is stamped fresh by
/// the repository, never carried from a source row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVaultCharacter {
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
    pub age: Option<String>,
    pub npc_role: Option<String>,
    pub important_people: Option<serde_json::Value>,
    pub quotes: Option<Vec<String>>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(skip_deserializing)]
    pub template_id: Option<DbId>,
    #[serde(skip_deserializing)]
    pub saved_template_version: Option<i32>,
    #[serde(skip_deserializing, default = "SourceFields::original")]
    pub source: SourceFields,
}

/// Export provenance carried on a new vault character.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFields {
    pub source_type: String,
    pub source_campaign_id: Option<DbId>,
    pub source_campaign_name: Option<String>,
    pub source_campaign_character_id: Option<DbId>,
    pub source_snapshot_date: Option<Timestamp>,
    pub source_session_number: Option<i32>,
    pub character_lineage_id: Option<DbId>,
}

impl SourceFields {
    /// Provenance for characters that did not come out of a campaign.
    pub fn original() -> Self {
        Self {
            source_type: "original".to_string(),
            source_campaign_id: None,
            source_campaign_name: None,
            source_campaign_character_id: None,
            source_snapshot_date: None,
            source_session_number: None,
            character_lineage_id: None,
        }
    }
}

fn default_kind() -> String {
    "pc".to_string()
}

impl From<&VaultCharacter> for NewVaultCharacter {
    /// Content-field projection of a live row.
    ///
    /// Source tracking resets to `original`: a duplicated vault character
    /// is a fresh authored character, not another export of the campaign
    /// character its ancestor came from.
    fn from(source: &VaultCharacter) -> Self {
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
            age: source.age.clone(),
            npc_role: source.npc_role.clone(),
            important_people: source.important_people.clone(),
            quotes: source.quotes.clone(),
            is_archived: source.is_archived,
            is_favorite: source.is_favorite,
            template_id: None,
            saved_template_version: None,
            source: SourceFields::original(),
        }
    }
}

/// Summary row for the "overwrite existing export?" picker.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExportSummary {
    pub id: DbId,
    pub name: String,
    pub source_snapshot_date: Option<Timestamp>,
    pub source_session_number: Option<i32>,
    pub source_type: String,
}
