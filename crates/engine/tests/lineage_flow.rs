//! Integration tests for character export lineage: shared lineage ids,
//! linked exports, and in-place overwrites.

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::PgPool;

use lorebound_core::content::SnapshotKind;
use lorebound_core::error::CoreError;
use lorebound_db::models::campaign::NewCampaign;
use lorebound_db::models::campaign_character::NewCampaignCharacter;
use lorebound_db::models::vault_character::NewVaultCharacter;
use lorebound_db::repositories::{
    CampaignCharacterRepo, CampaignRepo, CharacterSnapshotRepo, VaultCharacterRepo,
};
use lorebound_engine::lineage::{
    export_character, join_campaign, list_exports_for_source, sync_from_vault, sync_to_vault,
    ExportKind, ExportRequest,
};
use lorebound_engine::EngineError;

const OWNER: i64 = 1;
const OTHER: i64 = 2;

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
    let campaign = CampaignRepo::create(pool, OWNER, &new_campaign("Emberfall"))
        .await
        .unwrap();
    let character = CampaignCharacterRepo::create(pool, campaign.id, &new_character(name))
        .await
        .unwrap();
    (campaign.id, character.id)
}

fn export_req(campaign_id: i64, character_id: i64, kind: ExportKind) -> ExportRequest {
    ExportRequest {
        user_id: OWNER,
        campaign_id,
        campaign_character_id: character_id,
        kind,
        overwrite_id: None,
    }
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
async fn repeated_exports_share_one_lineage(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Kaela").await;
    let req = export_req(campaign_id, character_id, ExportKind::Current);

    let first = export_character(&pool, &req).await.unwrap();
    let second = export_character(&pool, &req).await.unwrap();
    let third = export_character(&pool, &req).await.unwrap();

    // The first export anchors the lineage with its own id.
    let root_id = first.vault_character.id;
    assert_eq!(first.vault_character.character_lineage_id, Some(root_id));
    assert_eq!(second.vault_character.character_lineage_id, Some(root_id));
    assert_eq!(third.vault_character.character_lineage_id, Some(root_id));
    assert_ne!(second.vault_character.id, root_id);

    let exports = list_exports_for_source(&pool, OWNER, campaign_id, character_id)
        .await
        .unwrap();
    assert_eq!(exports.len(), 3);
    // Most recent snapshot first.
    assert_eq!(exports[0].id, third.vault_character.id);
    assert_eq!(exports[2].id, root_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_carries_source_tracking(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Kaela").await;

    let outcome = export_character(
        &pool,
        &export_req(campaign_id, character_id, ExportKind::Current),
    )
    .await
    .unwrap();

    let vault = outcome.vault_character;
    assert_eq!(vault.user_id, OWNER);
    assert_eq!(vault.name, "Kaela");
    assert_eq!(vault.source_type, "export");
    assert_eq!(vault.source_campaign_id, Some(campaign_id));
    assert_eq!(vault.source_campaign_name.as_deref(), Some("Emberfall"));
    assert_eq!(vault.source_campaign_character_id, Some(character_id));
    assert_eq!(vault.source_session_number, Some(0));
    assert!(vault.source_snapshot_date.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn linked_export_back_links_the_campaign_character(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Bren").await;

    let outcome = export_character(
        &pool,
        &export_req(campaign_id, character_id, ExportKind::Linked),
    )
    .await
    .unwrap();

    assert_eq!(outcome.vault_character.source_type, "linked");

    let live = CampaignCharacterRepo::find_by_id(&pool, character_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.vault_character_id, Some(outcome.vault_character.id));

    let linked = VaultCharacterRepo::find_linked(&pool, OWNER, campaign_id, character_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(linked.id, outcome.vault_character.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overwrite_replaces_content_in_place(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Tamsin").await;

    let original = export_character(
        &pool,
        &export_req(campaign_id, character_id, ExportKind::Current),
    )
    .await
    .unwrap()
    .vault_character;

    rename_live_character(&pool, character_id, "Tamsin the Grey").await;

    let mut req = export_req(campaign_id, character_id, ExportKind::Current);
    req.overwrite_id = Some(original.id);
    let outcome = export_character(&pool, &req).await.unwrap();

    assert!(outcome.overwritten);
    let updated = outcome.vault_character;
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.name, "Tamsin the Grey");
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.character_lineage_id, original.character_lineage_id);

    // No second vault row appeared.
    let rows = VaultCharacterRepo::list_by_user(&pool, OWNER).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overwrite_rejects_foreign_and_mismatched_targets(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Tamsin").await;
    let other_character =
        CampaignCharacterRepo::create(&pool, campaign_id, &new_character("Oswin"))
            .await
            .unwrap();

    let export = export_character(
        &pool,
        &export_req(campaign_id, character_id, ExportKind::Current),
    )
    .await
    .unwrap()
    .vault_character;

    // Another user cannot overwrite this export.
    let mut req = export_req(campaign_id, character_id, ExportKind::Current);
    req.user_id = OTHER;
    req.overwrite_id = Some(export.id);
    let err = export_character(&pool, &req).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Forbidden(_)));

    // The target must be an export of the same campaign character.
    let mut req = export_req(campaign_id, other_character.id, ExportKind::Current);
    req.overwrite_id = Some(export.id);
    let err = export_character(&pool, &req).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overwrite_is_reserved_for_current_sheet_exports(pool: PgPool) {
    let (campaign_id, character_id) = seed_character(&pool, "Tamsin").await;

    let export = export_character(
        &pool,
        &export_req(campaign_id, character_id, ExportKind::Current),
    )
    .await
    .unwrap()
    .vault_character;

    for kind in [ExportKind::Session0, ExportKind::Linked] {
        let mut req = export_req(campaign_id, character_id, kind);
        req.overwrite_id = Some(export.id);
        let err = export_character(&pool, &req).await.unwrap_err();
        assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
    }

    // Still a single vault row.
    let rows = VaultCharacterRepo::list_by_user(&pool, OWNER).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn join_campaign_creates_a_linked_member(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, OWNER, &new_campaign("Emberfall"))
        .await
        .unwrap();
    let vault: NewVaultCharacter =
        serde_json::from_value(json!({ "name": "Ildan", "age": "34" })).unwrap();
    let vault = VaultCharacterRepo::create(&pool, OWNER, &vault).await.unwrap();

    let joined = join_campaign(&pool, OWNER, campaign.id, vault.id, (40.0, 12.5))
        .await
        .unwrap();
    assert_eq!(joined.name, "Ildan");
    assert_eq!(joined.vault_character_id, Some(vault.id));
    // Textual age parses back to a number on the campaign side.
    assert_eq!(joined.age, Some(34));
    assert_eq!(joined.position_x, 40.0);

    let joins = CharacterSnapshotRepo::list_by_character(
        &pool,
        campaign.id,
        joined.id,
        Some(SnapshotKind::Join),
    )
    .await
    .unwrap();
    assert_eq!(joins.len(), 1);

    // Another user's vault character cannot join.
    let err = join_campaign(&pool, OTHER, campaign.id, vault.id, (0.0, 0.0))
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Forbidden(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn linked_sync_flows_both_ways(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, OWNER, &new_campaign("Emberfall"))
        .await
        .unwrap();
    let vault: NewVaultCharacter =
        serde_json::from_value(json!({ "name": "Ildan", "is_favorite": true })).unwrap();
    let vault = VaultCharacterRepo::create(&pool, OWNER, &vault).await.unwrap();
    let joined = join_campaign(&pool, OWNER, campaign.id, vault.id, (0.0, 0.0))
        .await
        .unwrap();

    // Campaign-side edit pushes to the vault; vault-only state survives.
    rename_live_character(&pool, joined.id, "Ildan the Bold").await;
    let synced = sync_to_vault(&pool, joined.id).await.unwrap().unwrap();
    assert_eq!(synced.name, "Ildan the Bold");
    assert!(synced.is_favorite);

    // Vault-side edit pulls back into the campaign character.
    sqlx::query("UPDATE vault_characters SET race = 'dwarf' WHERE id = $1")
        .bind(vault.id)
        .execute(&pool)
        .await
        .unwrap();
    let pulled = sync_from_vault(&pool, joined.id).await.unwrap().unwrap();
    assert_eq!(pulled.race.as_deref(), Some("dwarf"));
    assert_eq!(pulled.name, "Ildan the Bold");

    // A character without a link syncs to nothing.
    let loose = CampaignCharacterRepo::create(&pool, campaign.id, &new_character("Loose"))
        .await
        .unwrap();
    assert!(sync_to_vault(&pool, loose.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_validates_campaign_membership(pool: PgPool) {
    let (_, character_id) = seed_character(&pool, "Kaela").await;
    let unrelated = CampaignRepo::create(&pool, OWNER, &new_campaign("Elsewhere"))
        .await
        .unwrap();

    let err = export_character(
        &pool,
        &export_req(unrelated.id, character_id, ExportKind::Current),
    )
    .await
    .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}
