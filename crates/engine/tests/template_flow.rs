//! Integration tests for the template lifecycle:
//! publish -> save -> materialize, version pruning, save guards, and
//! idempotent materialization.

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::PgPool;

use lorebound_core::content::ContentType;
use lorebound_core::error::CoreError;
use lorebound_core::transfer::EntityKind;
use lorebound_db::models::campaign::NewCampaign;
use lorebound_db::models::campaign_character::NewCampaignCharacter;
use lorebound_db::models::oneshot::NewOneshot;
use lorebound_db::models::snapshot::NewTemplateSnapshot;
use lorebound_db::repositories::{
    CampaignCharacterRepo, CampaignRepo, ContentSaveRepo, OneshotRepo, RelationshipRepo, TagRepo,
    TemplateSnapshotRepo,
};
use lorebound_db::models::relationship::NewRelationship;
use lorebound_db::models::tag::NewTag;
use lorebound_engine::snapshot::{materialize, publish_template, save_template, PublishOptions};
use lorebound_engine::EngineError;

const OWNER: i64 = 1;
const PLAYER: i64 = 2;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_campaign(name: &str) -> NewCampaign {
    NewCampaign {
        name: name.to_string(),
        description: Some("a publishable campaign".to_string()),
        image_url: Some("https://cdn.example/cover.png".to_string()),
        game_system: Some("5e".to_string()),
        setting: None,
        status: "active".to_string(),
        current_session: 0,
        template_id: None,
        saved_template_version: None,
    }
}

fn new_character(name: &str) -> NewCampaignCharacter {
    serde_json::from_value(json!({ "name": name })).expect("valid character input")
}

fn saveable() -> PublishOptions {
    PublishOptions {
        allow_save: true,
        attribution_name: Some("The DM".to_string()),
        ..PublishOptions::default()
    }
}

async fn seed_published_campaign(pool: &PgPool) -> (i64, i64) {
    let campaign = CampaignRepo::create(pool, OWNER, &new_campaign("Winter Crown"))
        .await
        .unwrap();
    let serah = CampaignCharacterRepo::create(pool, campaign.id, &new_character("Serah"))
        .await
        .unwrap();
    let brann = CampaignCharacterRepo::create(pool, campaign.id, &new_character("Brann"))
        .await
        .unwrap();
    TagRepo::create(
        pool,
        campaign.id,
        &NewTag {
            name: "intro".to_string(),
            color: None,
        },
    )
    .await
    .unwrap();
    RelationshipRepo::create(
        pool,
        campaign.id,
        serah.id,
        brann.id,
        &NewRelationship {
            relationship_type: Some("rival".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();

    let snapshot = publish_template(pool, OWNER, ContentType::Campaign, campaign.id, &saveable())
        .await
        .unwrap();
    (campaign.id, snapshot.id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn publish_save_materialize_end_to_end(pool: PgPool) {
    let (campaign_id, snapshot_id) = seed_published_campaign(&pool).await;

    let published = CampaignRepo::find_by_id(&pool, campaign_id).await.unwrap().unwrap();
    assert!(published.is_published);
    assert_eq!(published.template_version, 1);
    assert_eq!(published.content_mode, "template");

    let save = save_template(&pool, PLAYER, snapshot_id).await.unwrap();
    assert_eq!(save.saved_version, 1);
    assert_eq!(save.source_name, "Winter Crown");
    assert_eq!(save.instance_id, None);

    let outcome = materialize(&pool, save.id).await.unwrap();
    assert!(!outcome.already_materialized);
    assert!(outcome.report.errors.is_empty());
    assert_eq!(outcome.report.created_count(EntityKind::CampaignCharacter), 2);
    assert_eq!(outcome.report.created_count(EntityKind::Tag), 1);
    assert_eq!(outcome.report.created_count(EntityKind::Relationship), 1);

    let instance = CampaignRepo::find_by_id(&pool, outcome.instance_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(instance.user_id, PLAYER);
    assert_eq!(instance.template_id, Some(campaign_id));
    assert_eq!(instance.saved_template_version, Some(1));
    assert!(!instance.is_published);
    assert_eq!(instance.content_mode, "active");

    // The copied relationship resolves inside the instance.
    let characters = CampaignCharacterRepo::list_by_campaign(&pool, instance.id)
        .await
        .unwrap();
    let ids: Vec<i64> = characters.iter().map(|c| c.id).collect();
    let relationships = RelationshipRepo::list_by_campaign(&pool, instance.id).await.unwrap();
    assert_eq!(relationships.len(), 1);
    assert!(ids.contains(&relationships[0].from_character_id));
    assert!(ids.contains(&relationships[0].to_character_id));

    let claimed = ContentSaveRepo::find_by_id(&pool, save.id).await.unwrap().unwrap();
    assert_eq!(claimed.instance_id, Some(instance.id));
    assert!(claimed.started_playing_at.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn oneshot_publish_save_materialize(pool: PgPool) {
    let oneshot = OneshotRepo::create(
        &pool,
        OWNER,
        &NewOneshot {
            title: "Tomb of the Glass King".to_string(),
            description: Some("one evening, one dungeon".to_string()),
            image_url: None,
            game_system: Some("5e".to_string()),
            level_range: Some("3-5".to_string()),
            template_id: None,
            saved_template_version: None,
        },
    )
    .await
    .unwrap();

    let snapshot = publish_template(&pool, OWNER, ContentType::Oneshot, oneshot.id, &saveable())
        .await
        .unwrap();
    let published = OneshotRepo::find_by_id(&pool, oneshot.id).await.unwrap().unwrap();
    assert!(published.is_published);
    assert_eq!(published.content_mode, "template");

    let save = save_template(&pool, PLAYER, snapshot.id).await.unwrap();
    assert_eq!(save.source_name, "Tomb of the Glass King");

    let outcome = materialize(&pool, save.id).await.unwrap();
    assert!(outcome.report.errors.is_empty());
    assert_eq!(outcome.report.created_count(EntityKind::Oneshot), 1);

    let instance = OneshotRepo::find_by_id(&pool, outcome.instance_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(instance.user_id, PLAYER);
    assert_eq!(instance.title, "Tomb of the Glass King");
    assert_eq!(instance.level_range.as_deref(), Some("3-5"));
    assert_eq!(instance.template_id, Some(oneshot.id));
    assert_eq!(instance.saved_template_version, Some(1));
    assert_eq!(instance.content_mode, "active");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn materialize_twice_returns_existing_instance(pool: PgPool) {
    let (_, snapshot_id) = seed_published_campaign(&pool).await;
    let save = save_template(&pool, PLAYER, snapshot_id).await.unwrap();

    let first = materialize(&pool, save.id).await.unwrap();
    let second = materialize(&pool, save.id).await.unwrap();

    assert!(second.already_materialized);
    assert_eq!(second.instance_id, first.instance_id);
    assert!(second.report.created.is_empty(), "second call performs no writes");

    let instances = CampaignRepo::list_by_user(&pool, PLAYER).await.unwrap();
    assert_eq!(instances.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn save_guards_reject_invalid_saves(pool: PgPool) {
    let (_, snapshot_id) = seed_published_campaign(&pool).await;

    // Owner cannot save their own content.
    let err = save_template(&pool, OWNER, snapshot_id).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));

    // Saving the same version twice is a conflict.
    save_template(&pool, PLAYER, snapshot_id).await.unwrap();
    let err = save_template(&pool, PLAYER, snapshot_id).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn save_requires_allow_save(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, OWNER, &new_campaign("Private"))
        .await
        .unwrap();
    let snapshot = publish_template(
        &pool,
        OWNER,
        ContentType::Campaign,
        campaign.id,
        &PublishOptions::default(),
    )
    .await
    .unwrap();

    let err = save_template(&pool, PLAYER, snapshot.id).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Forbidden(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn republish_bumps_version_and_prunes_unsaved(pool: PgPool) {
    let (campaign_id, _) = seed_published_campaign(&pool).await;

    let second = publish_template(&pool, OWNER, ContentType::Campaign, campaign_id, &saveable())
        .await
        .unwrap();
    assert_eq!(second.version, 2);

    // Version 1 had no saves, so publishing v2 pruned it.
    let versions = TemplateSnapshotRepo::list_versions(&pool, ContentType::Campaign, campaign_id)
        .await
        .unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn saved_versions_survive_pruning(pool: PgPool) {
    let (campaign_id, snapshot_id) = seed_published_campaign(&pool).await;
    save_template(&pool, PLAYER, snapshot_id).await.unwrap();

    publish_template(&pool, OWNER, ContentType::Campaign, campaign_id, &saveable())
        .await
        .unwrap();

    let versions = TemplateSnapshotRepo::list_versions(&pool, ContentType::Campaign, campaign_id)
        .await
        .unwrap();
    assert_eq!(versions.len(), 2, "a saved version is never pruned");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn materialize_reports_partial_failure(pool: PgPool) {
    // A hand-built snapshot with five characters, one of which violates
    // the visibility check constraint, plus relationships touching both
    // surviving and failed rows.
    let characters: Vec<_> = (1..=4)
        .map(|i| json!({ "id": i, "name": format!("Hero {i}") }))
        .collect();
    let mut characters = characters;
    characters.push(json!({ "id": 5, "name": "Broken", "visibility": "sneaky" }));

    let snapshot = TemplateSnapshotRepo::create(
        &pool,
        Some(OWNER),
        &NewTemplateSnapshot {
            content_type: ContentType::Campaign,
            content_id: 424_242,
            version: 1,
            version_name: None,
            version_notes: None,
            snapshot_data: json!({ "name": "Forged Campaign" }),
            related_data: json!({
                "characters": characters,
                "relationships": [
                    { "id": 10, "from_character_id": 1, "to_character_id": 2 },
                    { "id": 11, "from_character_id": 3, "to_character_id": 5 },
                ],
                "rituals": [ { "id": 1, "name": "unknown collection, ignored" } ],
            }),
            allow_save: true,
            attribution_name: None,
            template_description: None,
        },
    )
    .await
    .unwrap();

    let save = save_template(&pool, PLAYER, snapshot.id).await.unwrap();
    let outcome = materialize(&pool, save.id).await.unwrap();

    assert_eq!(outcome.report.created_count(EntityKind::CampaignCharacter), 4);
    assert_eq!(outcome.report.errors.len(), 1);
    assert_eq!(outcome.report.errors[0].kind, EntityKind::CampaignCharacter);
    assert_eq!(outcome.report.errors[0].source_id, Some(5));

    // The relationship between two surviving characters is remapped; the
    // one touching the failed character is dropped without an error.
    assert_eq!(outcome.report.created_count(EntityKind::Relationship), 1);

    let characters = CampaignCharacterRepo::list_by_campaign(&pool, outcome.instance_id)
        .await
        .unwrap();
    assert_eq!(characters.len(), 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_root_is_an_infrastructure_error(pool: PgPool) {
    let snapshot = TemplateSnapshotRepo::create(
        &pool,
        Some(OWNER),
        &NewTemplateSnapshot {
            content_type: ContentType::Campaign,
            content_id: 424_243,
            version: 1,
            version_name: None,
            version_notes: None,
            snapshot_data: json!("not an object"),
            related_data: json!({}),
            allow_save: true,
            attribution_name: None,
            template_description: None,
        },
    )
    .await
    .unwrap();

    let save = save_template(&pool, PLAYER, snapshot.id).await.unwrap();
    let err = materialize(&pool, save.id).await.unwrap_err();
    assert_matches!(err, EngineError::MalformedSnapshot(_));
}
