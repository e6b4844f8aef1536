//! Campaign session and player session note models.
//!
//! Session notes double as the session-0 gate's "history exists" signal:
//! the capture window closes the moment any note is written.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lorebound_core::types::{DbId, Timestamp};

/// A row from the `campaign_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignSession {
    pub id: DbId,
    pub campaign_id: DbId,
    pub session_number: i32,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub session_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCampaignSession {
    pub session_number: i32,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub session_date: Option<Timestamp>,
}

impl From<&CampaignSession> for NewCampaignSession {
    fn from(source: &CampaignSession) -> Self {
        Self {
            session_number: source.session_number,
            title: source.title.clone(),
            notes: source.notes.clone(),
            session_date: source.session_date,
        }
    }
}

/// A row from the `player_session_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlayerSessionNote {
    pub id: DbId,
    pub session_id: DbId,
    pub author_user_id: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}
