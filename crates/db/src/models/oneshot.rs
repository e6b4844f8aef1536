//! Oneshot aggregate root model and DTOs.
//!
//! Oneshots have no child collections; copying one is a single-row
//! operation.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `oneshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Oneshot {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub game_system: Option<String>,
    pub level_range: Option<String>,
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

/// DTO for creating a oneshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOneshot {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub game_system: Option<String>,
    pub level_range: Option<String>,
    #[serde(skip_deserializing)]
    pub template_id: Option<DbId>,
    #[serde(skip_deserializing)]
    pub saved_template_version: Option<i32>,
}

impl From<&Oneshot> for NewOneshot {
    fn from(source: &Oneshot) -> Self {
        Self {
            title: source.title.clone(),
            description: source.description.clone(),
            image_url: source.image_url.clone(),
            game_system: source.game_system.clone(),
            level_range: source.level_range.clone(),
            template_id: None,
            saved_template_version: None,
        }
    }
}
