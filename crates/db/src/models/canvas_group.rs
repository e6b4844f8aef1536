//! Canvas group model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `canvas_groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CanvasGroup {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub position_x: f32,
    pub position_y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a canvas group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCanvasGroup {
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub position_x: f32,
    #[serde(default)]
    pub position_y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl From<&CanvasGroup> for NewCanvasGroup {
    fn from(source: &CanvasGroup) -> Self {
        Self {
            name: source.name.clone(),
            color: source.color.clone(),
            position_x: source.position_x,
            position_y: source.position_y,
            width: source.width,
            height: source.height,
        }
    }
}
