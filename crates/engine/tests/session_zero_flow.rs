//! Integration tests for the session-0 capture gate: the pre-play
//! snapshot window, replay of the captured sheet, and window closure.

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::PgPool;

use lorebound_core::content::SnapshotKind;
use lorebound_core::error::CoreError;
use lorebound_core::session_zero::{Session0State, WINDOW_CLOSED_REASON};
use lorebound_db::models::campaign::NewCampaign;
use lorebound_db::models::campaign_character::NewCampaignCharacter;
use lorebound_db::models::campaign_session::NewCampaignSession;
use lorebound_db::repositories::{
    CampaignCharacterRepo, CampaignRepo, CampaignSessionRepo, CharacterSnapshotRepo,
    PlayerSessionNoteRepo,
};
use lorebound_engine::lineage::{
    check_session0_availability, export_character, ExportKind, ExportRequest,
};
use lorebound_engine::EngineError;

const OWNER: i64 = 1;
const PLAYER: i64 = 3;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_campaign(name: &str) -> NewCampaign {
    serde_json::from_value(json!({ "name": name })).expect("valid campaign input")
}

fn new_character(name: &str) -> NewCampaignCharacter {
    serde_json::from_value(json!({ "name": name })).expect("valid character input")
}

async fn seed_character(pool: &PgPool, name: &str) -> (i64, i64) {
    let campaign = CampaignRepo::create(pool, OWNER, &new_campaign("Ashvale"))
        .await
        .unwrap();
    let character = CampaignCharacterRepo::create(pool, campaign.id, &new_character(name))
        .await
        .unwrap();
    (campaign.id, character.id)
}

fn session0_req(campaign_id: i64, character_id: i64) -> ExportRequest {
    ExportRequest {
        user_id: OWNER,
        campaign_id,
        campaign_character_id: character_id,
        kind: ExportKind::Session0,
        overwrite_id: None,
    }
}

async fn log_session(pool: &PgPool, campaign_id: i64, number: i32, notes: Option<&str>) -> i64 {
    CampaignSessionRepo::create(
        pool,
        campaign_id,
        &NewCampaignSession {
            session_number: number,
            title: None,
            notes: notes.map(str::to_string),
            session_date: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn rename_live_character(pool: &PgPool, character_id: i64, name: &str) {
    sqlx::query("UPDATE campaign_characters SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(character_id)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn first_export_captures_the_pre_play_sheet(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Vesna").await;

    let availability = check_session0_availability(&pool, campaign_id, character_id)
        .await
        .unwrap();
    assert_eq!(availability.state, Session0State::Capturable);
    assert!(availability.snapshot.is_none());

    let outcome = export_character(&pool, &session0_req(campaign_id, character_id))
        .await
        .unwrap();
    assert_eq!(outcome.vault_character.source_type, "session_0");
    assert_eq!(outcome.vault_character.source_session_number, Some(0));

    let captured = CharacterSnapshotRepo::find_session0(&pool, campaign_id, character_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(captured.snapshot_kind, "session_0");
    assert_eq!(captured.snapshot_data["name"], "Vesna");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn replayed_export_keeps_the_captured_sheet(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Vesna").await;

    export_character(&pool, &session0_req(campaign_id, character_id))
        .await
        .unwrap();
    let captured = CharacterSnapshotRepo::find_session0(&pool, campaign_id, character_id)
        .await
        .unwrap()
        .unwrap();
    rename_live_character(&pool, character_id, "Vesna the Fallen").await;

    let replay = export_character(&pool, &session0_req(campaign_id, character_id))
        .await
        .unwrap();

    // The replay carries the pre-play name and the original capture date,
    // not the character's current state.
    assert_eq!(replay.vault_character.name, "Vesna");
    assert_eq!(
        replay.vault_character.source_snapshot_date,
        Some(captured.created_at)
    );
    assert_eq!(replay.vault_character.source_session_number, Some(0));

    // Replays never write a second capture row.
    let captures = CharacterSnapshotRepo::list_by_character(
        &pool,
        campaign_id,
        character_id,
        Some(SnapshotKind::Session0),
    )
    .await
    .unwrap();
    assert_eq!(captures.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dm_session_notes_close_the_window(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Vesna").await;
    log_session(&pool, campaign_id, 1, Some("The party met at the crossroads.")).await;

    let availability = check_session0_availability(&pool, campaign_id, character_id)
        .await
        .unwrap();
    assert_eq!(availability.state, Session0State::WindowClosed);
    assert_eq!(availability.reason, WINDOW_CLOSED_REASON);

    let err = export_character(&pool, &session0_req(campaign_id, character_id))
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Forbidden(msg)) if msg == WINDOW_CLOSED_REASON);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn a_player_note_alone_closes_the_window(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Vesna").await;
    let session_id = log_session(&pool, campaign_id, 1, None).await;
    PlayerSessionNoteRepo::create(&pool, session_id, Some(PLAYER), "I stole the gem.")
        .await
        .unwrap();

    let availability = check_session0_availability(&pool, campaign_id, character_id)
        .await
        .unwrap();
    assert_eq!(availability.state, Session0State::WindowClosed);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn an_empty_session_row_leaves_the_window_open(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Vesna").await;
    log_session(&pool, campaign_id, 1, None).await;

    let availability = check_session0_availability(&pool, campaign_id, character_id)
        .await
        .unwrap();
    assert_eq!(availability.state, Session0State::Capturable);

    let outcome = export_character(&pool, &session0_req(campaign_id, character_id))
        .await
        .unwrap();
    assert_eq!(outcome.vault_character.source_type, "session_0");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn capture_survives_later_session_history(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Vesna").await;

    export_character(&pool, &session0_req(campaign_id, character_id))
        .await
        .unwrap();
    log_session(&pool, campaign_id, 1, Some("Campfire stories.")).await;
    rename_live_character(&pool, character_id, "Vesna the Fallen").await;

    let availability = check_session0_availability(&pool, campaign_id, character_id)
        .await
        .unwrap();
    assert_eq!(availability.state, Session0State::Captured);

    // The captured sheet is still retrievable after play begins.
    let replay = export_character(&pool, &session0_req(campaign_id, character_id))
        .await
        .unwrap();
    assert_eq!(replay.vault_character.name, "Vesna");
}
