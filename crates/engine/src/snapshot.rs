//! Template snapshot capture and materialization.
//!
//! Publishing serializes an aggregate plus its child graph into an
//! immutable `template_snapshots` row. Materializing replays the graph
//! copier against the snapshot's embedded `related_data` instead of
//! live rows, producing a fresh aggregate owned by the saving user.
//!
//! Snapshot JSON is data at rest, not live rows: non-transferable
//! fields are stripped on the way back out, unknown collection keys and
//! unknown row fields are ignored, and a single bad row degrades to an
//! entity-level failure instead of sinking the whole materialization.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sqlx::PgPool;

use lorebound_core::content::ContentType;
use lorebound_core::report::CopyReport;
use lorebound_core::transfer::{strip_non_transferable, EntityKind};
use lorebound_core::translate::TranslationTable;
use lorebound_core::types::DbId;

use lorebound_db::models::campaign::NewCampaign;
use lorebound_db::models::campaign_character::NewCampaignCharacter;
use lorebound_db::models::campaign_session::NewCampaignSession;
use lorebound_db::models::canvas_group::NewCanvasGroup;
use lorebound_db::models::character_assets::{
    NewCharacterImage, NewCharacterLocation, NewCharacterSpell, NewCharacterWriting,
    NewVaultRelationship,
};
use lorebound_db::models::content_save::{ContentSave, NewContentSave};
use lorebound_db::models::lore_entry::NewLoreEntry;
use lorebound_db::models::media_item::NewMediaItem;
use lorebound_db::models::oneshot::NewOneshot;
use lorebound_db::models::relationship::NewRelationship;
use lorebound_db::models::snapshot::{NewTemplateSnapshot, TemplateSnapshot};
use lorebound_db::models::tag::NewTag;
use lorebound_db::models::vault_character::NewVaultCharacter;
use lorebound_db::models::world_map::NewWorldMap;
use lorebound_db::repositories::{
    CampaignRepo, ContentSaveRepo, OneshotRepo, TemplateSnapshotRepo, VaultCharacterRepo,
};

use crate::copier::{self, load_campaign_graph, load_character_graph};
use crate::error::{EngineError, EngineResult};

/// Publish-time metadata supplied by the content owner.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    pub version_name: Option<String>,
    pub version_notes: Option<String>,
    pub allow_save: bool,
    pub attribution_name: Option<String>,
    pub template_description: Option<String>,
}

/// Result of materializing a save into a live aggregate.
#[derive(Debug)]
pub struct MaterializeOutcome {
    /// Id of the live aggregate bound to the save.
    pub instance_id: DbId,
    pub report: CopyReport,
    /// True when the save already had an instance and no writes occurred.
    pub already_materialized: bool,
}

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

/// Capture an aggregate and its children into a new template version.
///
/// The version number is latest + 1, the live aggregate is flipped to
/// published template state, and older versions nobody saved are pruned.
pub async fn publish_template(
    pool: &PgPool,
    user_id: DbId,
    content_type: ContentType,
    content_id: DbId,
    opts: &PublishOptions,
) -> EngineResult<TemplateSnapshot> {
    let (snapshot_data, related_data) = match content_type {
        ContentType::Campaign => {
            let graph = load_campaign_graph(pool, content_id).await?;
            let data = root_snapshot_data(EntityKind::Campaign, &graph.campaign)?;
            let related = json!({
                "tags": to_rows(&graph.tags)?,
                "characters": to_rows(&graph.characters)?,
                "character_tags": to_rows(&graph.character_tags)?,
                "relationships": to_rows(&graph.relationships)?,
                "canvas_groups": to_rows(&graph.canvas_groups)?,
                "sessions": to_rows(&graph.sessions)?,
                "world_maps": to_rows(&graph.world_maps)?,
                "media_items": to_rows(&graph.media_items)?,
                "lore_entries": to_rows(&graph.lore_entries)?,
            });
            (data, related)
        }
        ContentType::Character => {
            let graph = load_character_graph(pool, content_id).await?;
            let data = root_snapshot_data(EntityKind::VaultCharacter, &graph.character)?;
            let related = json!({
                "images": to_rows(&graph.images)?,
                "locations": to_rows(&graph.locations)?,
                "spells": to_rows(&graph.spells)?,
                "writings": to_rows(&graph.writings)?,
                "relationships": to_rows(&graph.relationships)?,
            });
            (data, related)
        }
        ContentType::Oneshot => {
            let oneshot = OneshotRepo::find_by_id(pool, content_id)
                .await?
                .ok_or_else(|| EngineError::not_found("oneshot", content_id))?;
            (root_snapshot_data(EntityKind::Oneshot, &oneshot)?, json!({}))
        }
    };

    let version = TemplateSnapshotRepo::latest_version(pool, content_type, content_id).await? + 1;
    let snapshot = TemplateSnapshotRepo::create(
        pool,
        Some(user_id),
        &NewTemplateSnapshot {
            content_type,
            content_id,
            version,
            version_name: opts.version_name.clone(),
            version_notes: opts.version_notes.clone(),
            snapshot_data,
            related_data,
            allow_save: opts.allow_save,
            attribution_name: opts.attribution_name.clone(),
            template_description: opts.template_description.clone(),
        },
    )
    .await?;

    match content_type {
        ContentType::Campaign => {
            CampaignRepo::mark_published(
                pool,
                content_id,
                version,
                opts.allow_save,
                opts.attribution_name.as_deref(),
                opts.template_description.as_deref(),
            )
            .await?;
        }
        ContentType::Character => {
            VaultCharacterRepo::mark_published(
                pool,
                content_id,
                version,
                opts.allow_save,
                opts.attribution_name.as_deref(),
                opts.template_description.as_deref(),
            )
            .await?;
        }
        ContentType::Oneshot => {
            OneshotRepo::mark_published(
                pool,
                content_id,
                version,
                opts.allow_save,
                opts.attribution_name.as_deref(),
                opts.template_description.as_deref(),
            )
            .await?;
        }
    }

    let pruned =
        TemplateSnapshotRepo::prune_unsaved_versions(pool, content_type, content_id, version)
            .await?;
    tracing::info!(
        content_type = %content_type,
        content_id,
        version,
        pruned,
        "template version published"
    );
    Ok(snapshot)
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Record that `user_id` saved a published template version.
///
/// Guards: the snapshot must allow saving, a user cannot save their own
/// content, and a version can be saved at most once per user.
pub async fn save_template(
    pool: &PgPool,
    user_id: DbId,
    snapshot_id: DbId,
) -> EngineResult<ContentSave> {
    let snapshot = TemplateSnapshotRepo::find_by_id(pool, snapshot_id)
        .await?
        .ok_or_else(|| EngineError::not_found("template_snapshot", snapshot_id))?;

    if !snapshot.allow_save {
        return Err(EngineError::forbidden("saving is not enabled for this template"));
    }
    if snapshot.user_id == Some(user_id) {
        return Err(EngineError::validation("cannot save your own published content"));
    }
    let source_type = snapshot
        .content_type()
        .ok_or_else(|| EngineError::MalformedSnapshot(format!(
            "unknown content type {:?}",
            snapshot.content_type
        )))?;

    let source_name = snapshot
        .snapshot_data
        .get("name")
        .or_else(|| snapshot.snapshot_data.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("Untitled")
        .to_string();
    let source_image_url = snapshot
        .snapshot_data
        .get("image_url")
        .and_then(Value::as_str)
        .map(str::to_string);

    let save = match ContentSaveRepo::create(
        pool,
        user_id,
        &NewContentSave {
            snapshot_id,
            source_type,
            source_name,
            source_image_url,
            source_owner_id: snapshot.user_id,
            saved_version: snapshot.version,
        },
    )
    .await
    {
        Ok(save) => save,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(EngineError::conflict("this template version is already saved"));
        }
        Err(e) => return Err(e.into()),
    };

    TemplateSnapshotRepo::increment_save_count(pool, snapshot_id).await?;
    match source_type {
        ContentType::Campaign => {
            CampaignRepo::increment_save_count(pool, snapshot.content_id).await?
        }
        ContentType::Character => {
            VaultCharacterRepo::increment_save_count(pool, snapshot.content_id).await?
        }
        ContentType::Oneshot => {
            OneshotRepo::increment_save_count(pool, snapshot.content_id).await?
        }
    };

    tracing::info!(user_id, snapshot_id, version = snapshot.version, "template saved");
    Ok(save)
}

// ---------------------------------------------------------------------------
// Materialize
// ---------------------------------------------------------------------------

/// Create the saving user's live copy of a saved template version.
///
/// Calling again after a copy exists is not an error: the existing
/// instance id is returned and nothing is written.
pub async fn materialize(pool: &PgPool, save_id: DbId) -> EngineResult<MaterializeOutcome> {
    let save = ContentSaveRepo::find_by_id(pool, save_id)
        .await?
        .ok_or_else(|| EngineError::not_found("content_save", save_id))?;

    if let Some(instance_id) = save.instance_id {
        return Ok(MaterializeOutcome {
            instance_id,
            report: CopyReport::new(),
            already_materialized: true,
        });
    }

    let snapshot = TemplateSnapshotRepo::find_by_id(pool, save.snapshot_id)
        .await?
        .ok_or_else(|| EngineError::not_found("template_snapshot", save.snapshot_id))?;
    let content_type = snapshot
        .content_type()
        .ok_or_else(|| EngineError::MalformedSnapshot(format!(
            "unknown content type {:?}",
            snapshot.content_type
        )))?;
    if !snapshot.related_data.is_object() {
        return Err(EngineError::MalformedSnapshot(
            "related_data is not an object".to_string(),
        ));
    }

    let dest_user_id = save.user_id;
    let mut table = TranslationTable::new();
    let mut report = CopyReport::new();

    let root_id = match content_type {
        ContentType::Campaign => {
            let mut input: NewCampaign =
                parse_root(EntityKind::Campaign, &snapshot.snapshot_data)?;
            input.template_id = Some(snapshot.content_id);
            input.saved_template_version = Some(snapshot.version);

            let created = CampaignRepo::create(pool, dest_user_id, &input).await?;
            report.record_created(EntityKind::Campaign);
            materialize_campaign_children(
                pool,
                &snapshot.related_data,
                created.id,
                &mut table,
                &mut report,
            )
            .await;
            created.id
        }
        ContentType::Character => {
            let mut input: NewVaultCharacter =
                parse_root(EntityKind::VaultCharacter, &snapshot.snapshot_data)?;
            input.template_id = Some(snapshot.content_id);
            input.saved_template_version = Some(snapshot.version);

            let created = VaultCharacterRepo::create(pool, dest_user_id, &input).await?;
            report.record_created(EntityKind::VaultCharacter);
            materialize_character_children(
                pool,
                &snapshot.related_data,
                created.id,
                dest_user_id,
                &table,
                &mut report,
            )
            .await;
            created.id
        }
        ContentType::Oneshot => {
            let mut input: NewOneshot = parse_root(EntityKind::Oneshot, &snapshot.snapshot_data)?;
            input.template_id = Some(snapshot.content_id);
            input.saved_template_version = Some(snapshot.version);

            let created = OneshotRepo::create(pool, dest_user_id, &input).await?;
            report.record_created(EntityKind::Oneshot);
            created.id
        }
    };

    let instance_id = match ContentSaveRepo::claim_instance(pool, save_id, root_id).await? {
        Some(updated) => updated.instance_id.unwrap_or(root_id),
        None => {
            // A concurrent materialization won the claim; surface its
            // instance instead of the copy we just made.
            let winner = ContentSaveRepo::find_by_id(pool, save_id)
                .await?
                .and_then(|s| s.instance_id)
                .unwrap_or(root_id);
            tracing::warn!(save_id, root_id, winner, "lost materialize race");
            return Ok(MaterializeOutcome {
                instance_id: winner,
                report,
                already_materialized: true,
            });
        }
    };

    tracing::info!(
        save_id,
        instance_id,
        errors = report.errors.len(),
        "template materialized"
    );
    Ok(MaterializeOutcome {
        instance_id,
        report,
        already_materialized: false,
    })
}

async fn materialize_campaign_children(
    pool: &PgPool,
    related: &Value,
    dest_campaign_id: DbId,
    table: &mut TranslationTable,
    report: &mut CopyReport,
) {
    for row in rows(related, "tags") {
        if let Some((source_id, input)) = parse_child::<NewTag>(EntityKind::Tag, row, report) {
            copier::insert_tag(pool, dest_campaign_id, source_id, &input, table, report).await;
        }
    }
    for row in rows(related, "characters") {
        if let Some((source_id, input)) =
            parse_child::<NewCampaignCharacter>(EntityKind::CampaignCharacter, row, report)
        {
            copier::insert_campaign_character(
                pool,
                dest_campaign_id,
                source_id,
                &input,
                table,
                report,
            )
            .await;
        }
    }
    for row in rows(related, "character_tags") {
        let (character_id, tag_id) = match (field_id(row, "character_id"), field_id(row, "tag_id"))
        {
            (Some(c), Some(t)) => (c, t),
            _ => {
                report.record_failure(
                    EntityKind::CharacterTag,
                    field_id(row, "id"),
                    "snapshot row is missing its link ids",
                );
                continue;
            }
        };
        copier::insert_character_tag(
            pool,
            character_id,
            tag_id,
            field_id(row, "related_character_id"),
            table,
            report,
        )
        .await;
    }
    for row in rows(related, "relationships") {
        let (from_id, to_id) = match (
            field_id(row, "from_character_id"),
            field_id(row, "to_character_id"),
        ) {
            (Some(f), Some(t)) => (f, t),
            _ => {
                report.record_failure(
                    EntityKind::Relationship,
                    field_id(row, "id"),
                    "snapshot row is missing its endpoint ids",
                );
                continue;
            }
        };
        if let Some((source_id, input)) =
            parse_child::<NewRelationship>(EntityKind::Relationship, row, report)
        {
            copier::insert_relationship(
                pool,
                dest_campaign_id,
                source_id,
                from_id,
                to_id,
                &input,
                table,
                report,
            )
            .await;
        }
    }
    for row in rows(related, "canvas_groups") {
        if let Some((source_id, input)) =
            parse_child::<NewCanvasGroup>(EntityKind::CanvasGroup, row, report)
        {
            copier::insert_canvas_group(pool, dest_campaign_id, source_id, &input, report).await;
        }
    }
    for row in rows(related, "sessions") {
        if let Some((source_id, input)) =
            parse_child::<NewCampaignSession>(EntityKind::Session, row, report)
        {
            copier::insert_session(pool, dest_campaign_id, source_id, &input, report).await;
        }
    }
    for row in rows(related, "world_maps") {
        if let Some((source_id, input)) =
            parse_child::<NewWorldMap>(EntityKind::WorldMap, row, report)
        {
            copier::insert_world_map(pool, dest_campaign_id, source_id, &input, report).await;
        }
    }
    for row in rows(related, "media_items") {
        if let Some((source_id, input)) =
            parse_child::<NewMediaItem>(EntityKind::MediaItem, row, report)
        {
            copier::insert_media_item(pool, dest_campaign_id, source_id, &input, report).await;
        }
    }
    for row in rows(related, "lore_entries") {
        if let Some((source_id, input)) =
            parse_child::<NewLoreEntry>(EntityKind::LoreEntry, row, report)
        {
            copier::insert_lore_entry(pool, dest_campaign_id, source_id, &input, report).await;
        }
    }
}

async fn materialize_character_children(
    pool: &PgPool,
    related: &Value,
    dest_character_id: DbId,
    dest_user_id: DbId,
    table: &TranslationTable,
    report: &mut CopyReport,
) {
    for row in rows(related, "images") {
        if let Some((source_id, input)) =
            parse_child::<NewCharacterImage>(EntityKind::CharacterImage, row, report)
        {
            copier::insert_character_image(
                pool,
                dest_character_id,
                Some(dest_user_id),
                source_id,
                &input,
                report,
            )
            .await;
        }
    }
    for row in rows(related, "locations") {
        if let Some((source_id, input)) =
            parse_child::<NewCharacterLocation>(EntityKind::CharacterLocation, row, report)
        {
            copier::insert_character_location(
                pool,
                dest_character_id,
                Some(dest_user_id),
                source_id,
                &input,
                report,
            )
            .await;
        }
    }
    for row in rows(related, "spells") {
        if let Some((source_id, input)) =
            parse_child::<NewCharacterSpell>(EntityKind::CharacterSpell, row, report)
        {
            copier::insert_character_spell(pool, dest_character_id, source_id, &input, report)
                .await;
        }
    }
    for row in rows(related, "writings") {
        if let Some((source_id, input)) =
            parse_child::<NewCharacterWriting>(EntityKind::CharacterWriting, row, report)
        {
            copier::insert_character_writing(
                pool,
                dest_character_id,
                Some(dest_user_id),
                source_id,
                &input,
                report,
            )
            .await;
        }
    }
    for row in rows(related, "relationships") {
        if let Some((source_id, input)) =
            parse_child::<NewVaultRelationship>(EntityKind::VaultRelationship, row, report)
        {
            copier::insert_vault_relationship(
                pool,
                dest_character_id,
                Some(dest_user_id),
                source_id,
                field_id(row, "related_character_id"),
                &input,
                table,
                report,
            )
            .await;
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot JSON helpers
// ---------------------------------------------------------------------------

/// Serialize an aggregate root for storage, with non-transferable
/// fields removed.
fn root_snapshot_data<T: serde::Serialize>(kind: EntityKind, root: &T) -> EngineResult<Value> {
    let mut data = serde_json::to_value(root)
        .map_err(|e| EngineError::MalformedSnapshot(format!("{kind}: {e}")))?;
    strip_non_transferable(kind, &mut data);
    Ok(data)
}

fn to_rows<T: serde::Serialize>(rows: &[T]) -> EngineResult<Value> {
    serde_json::to_value(rows).map_err(|e| EngineError::MalformedSnapshot(e.to_string()))
}

/// Deserialize the aggregate root out of `snapshot_data`. A malformed
/// root is an infrastructure error: nothing can be materialized from it.
fn parse_root<T: DeserializeOwned>(kind: EntityKind, data: &Value) -> EngineResult<T> {
    if !data.is_object() {
        return Err(EngineError::MalformedSnapshot(format!(
            "{kind} snapshot_data is not an object"
        )));
    }
    let mut copy = data.clone();
    strip_non_transferable(kind, &mut copy);
    serde_json::from_value(copy).map_err(|e| EngineError::MalformedSnapshot(format!("{kind}: {e}")))
}

/// Deserialize one child row out of `related_data`. A malformed row is
/// an entity-level failure: it is recorded and skipped.
fn parse_child<T: DeserializeOwned>(
    kind: EntityKind,
    row: &Value,
    report: &mut CopyReport,
) -> Option<(DbId, T)> {
    let source_id = match field_id(row, "id") {
        Some(id) => id,
        None => {
            report.record_failure(kind, None, "snapshot row has no id");
            return None;
        }
    };
    let mut copy = row.clone();
    strip_non_transferable(kind, &mut copy);
    match serde_json::from_value(copy) {
        Ok(input) => Some((source_id, input)),
        Err(e) => {
            report.record_failure(kind, Some(source_id), e.to_string());
            None
        }
    }
}

/// The rows of a known collection key; empty for a missing or
/// non-array value. Unknown keys are never read.
fn rows<'a>(related: &'a Value, key: &str) -> &'a [Value] {
    related
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn field_id(row: &Value, field: &str) -> Option<DbId> {
    row.get(field).and_then(Value::as_i64)
}
