//! Repositories for the `campaign_sessions` and `player_session_notes` tables.

use sqlx::PgPool;

use lorebound_core::types::DbId;

use crate::models::campaign_session::{CampaignSession, NewCampaignSession, PlayerSessionNote};

const SESSION_COLUMNS: &str =
    "id, campaign_id, session_number, title, notes, session_date, created_at, updated_at";
const NOTE_COLUMNS: &str = "id, session_id, author_user_id, notes, created_at";

/// Session logs for a campaign.
pub struct CampaignSessionRepo;

impl CampaignSessionRepo {
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &NewCampaignSession,
    ) -> Result<CampaignSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_sessions (campaign_id, session_number, title, notes, session_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, CampaignSession>(&query)
            .bind(campaign_id)
            .bind(input.session_number)
            .bind(&input.title)
            .bind(&input.notes)
            .bind(input.session_date)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<CampaignSession>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM campaign_sessions
             WHERE campaign_id = $1
             ORDER BY session_number ASC"
        );
        sqlx::query_as::<_, CampaignSession>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Highest recorded session number, or 0 when no sessions exist.
    pub async fn current_session_number(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(session_number), 0) FROM campaign_sessions WHERE campaign_id = $1",
        )
        .bind(campaign_id)
        .fetch_one(pool)
        .await
    }

    /// Whether any play has been recorded for a campaign: a session log
    /// entry or a player note attached to one.
    pub async fn has_session_history(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM campaign_sessions cs
                 LEFT JOIN player_session_notes psn ON psn.session_id = cs.id
                 WHERE cs.campaign_id = $1
                   AND (cs.notes IS NOT NULL OR psn.id IS NOT NULL)
             )",
        )
        .bind(campaign_id)
        .fetch_one(pool)
        .await
    }
}

/// Player-authored notes attached to a session.
pub struct PlayerSessionNoteRepo;

impl PlayerSessionNoteRepo {
    pub async fn create(
        pool: &PgPool,
        session_id: DbId,
        author_user_id: Option<DbId>,
        notes: &str,
    ) -> Result<PlayerSessionNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO player_session_notes (session_id, author_user_id, notes)
             VALUES ($1, $2, $3)
             RETURNING {NOTE_COLUMNS}"
        );
        sqlx::query_as::<_, PlayerSessionNote>(&query)
            .bind(session_id)
            .bind(author_user_id)
            .bind(notes)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<PlayerSessionNote>, sqlx::Error> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM player_session_notes
             WHERE session_id = $1
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, PlayerSessionNote>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }
}
