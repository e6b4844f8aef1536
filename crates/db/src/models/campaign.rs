//! Campaign aggregate root model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub game_system: Option<String>,
    pub setting: Option<String>,
    pub status: String,
    pub current_session: i32,
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
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a campaign.
///
/// Publication and ownership metadata is deliberately absent: every
/// campaign this engine inserts starts as an unpublished, active-mode
/// copy. Template provenance (`template_id`, `saved_template_version`)
/// is present only so materialized copies can record where they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub game_system: Option<String>,
    pub setting: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub current_session: i32,
    #[serde(skip_deserializing)]
    pub template_id: Option<DbId>,
    #[serde(skip_deserializing)]
    pub saved_template_version: Option<i32>,
}

fn default_status() -> String {
    "active".to_string()
}

impl From<&Campaign> for NewCampaign {
    /// Content-field projection of a live row, template provenance reset.
    fn from(source: &Campaign) -> Self {
        Self {
            name: source.name.clone(),
            description: source.description.clone(),
            image_url: source.image_url.clone(),
            game_system: source.game_system.clone(),
            setting: source.setting.clone(),
            status: source.status.clone(),
            current_session: source.current_session,
            template_id: None,
            saved_template_version: None,
        }
    }
}
