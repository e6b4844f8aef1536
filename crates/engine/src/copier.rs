//! Graph copier: ID translation and topological re-insertion.
//!
//! All copy paths (admin account clone, user "save as copy", template
//! materialization) funnel through the per-entity insert helpers here.
//! Collections are processed in a fixed topological order so that by
//! the time a row referencing another child row is inserted, the
//! referenced row's translation entry already exists. A reference with
//! no translation entry means the target was skipped or failed; the
//! referencing row is dropped rather than inserted dangling.
//!
//! Copies are best-effort, not transactions: each entity insert is
//! attempted individually and failures are accumulated into the
//! `CopyReport` while processing continues.

use sqlx::PgPool;

use lorebound_core::report::CopyReport;
use lorebound_core::transfer::EntityKind;
use lorebound_core::translate::TranslationTable;
use lorebound_core::types::DbId;

use lorebound_db::models::campaign::{Campaign, NewCampaign};
use lorebound_db::models::campaign_character::{CampaignCharacter, NewCampaignCharacter};
use lorebound_db::models::campaign_session::{CampaignSession, NewCampaignSession};
use lorebound_db::models::canvas_group::{CanvasGroup, NewCanvasGroup};
use lorebound_db::models::character_assets::{
    CharacterImage, CharacterLocation, CharacterSpell, CharacterWriting, NewCharacterImage,
    NewCharacterLocation, NewCharacterSpell, NewCharacterWriting, NewVaultRelationship,
    VaultRelationship,
};
use lorebound_db::models::lore_entry::{LoreEntry, NewLoreEntry};
use lorebound_db::models::media_item::{MediaItem, NewMediaItem};
use lorebound_db::models::oneshot::{NewOneshot, Oneshot};
use lorebound_db::models::relationship::{NewRelationship, Relationship};
use lorebound_db::models::tag::{CharacterTag, NewTag, Tag};
use lorebound_db::models::vault_character::{NewVaultCharacter, VaultCharacter};
use lorebound_db::models::world_map::{NewWorldMap, WorldMap};
use lorebound_db::repositories::{
    CampaignCharacterRepo, CampaignRepo, CampaignSessionRepo, CanvasGroupRepo,
    CharacterImageRepo, CharacterLocationRepo, CharacterSpellRepo, CharacterTagRepo,
    CharacterWritingRepo, LoreRepo, MediaRepo, OneshotRepo, RelationshipRepo, TagRepo,
    VaultCharacterRepo, VaultRelationshipRepo, WorldMapRepo,
};

use crate::error::{EngineError, EngineResult};

// ---------------------------------------------------------------------------
// Graph bundles
// ---------------------------------------------------------------------------

/// A campaign and every child collection it owns, fetched at one point
/// in time.
#[derive(Debug)]
pub struct CampaignGraph {
    pub campaign: Campaign,
    pub tags: Vec<Tag>,
    pub characters: Vec<CampaignCharacter>,
    pub character_tags: Vec<CharacterTag>,
    pub relationships: Vec<Relationship>,
    pub canvas_groups: Vec<CanvasGroup>,
    pub sessions: Vec<CampaignSession>,
    pub world_maps: Vec<WorldMap>,
    pub media_items: Vec<MediaItem>,
    pub lore_entries: Vec<LoreEntry>,
}

/// A vault character and its child collections.
#[derive(Debug)]
pub struct CharacterGraph {
    pub character: VaultCharacter,
    pub images: Vec<CharacterImage>,
    pub locations: Vec<CharacterLocation>,
    pub spells: Vec<CharacterSpell>,
    pub writings: Vec<CharacterWriting>,
    pub relationships: Vec<VaultRelationship>,
}

/// Fetch a campaign and all of its children.
pub async fn load_campaign_graph(
    pool: &PgPool,
    campaign_id: DbId,
) -> EngineResult<CampaignGraph> {
    let campaign = CampaignRepo::find_by_id(pool, campaign_id)
        .await?
        .ok_or_else(|| EngineError::not_found("campaign", campaign_id))?;

    Ok(CampaignGraph {
        tags: TagRepo::list_by_campaign(pool, campaign_id).await?,
        characters: CampaignCharacterRepo::list_by_campaign(pool, campaign_id).await?,
        character_tags: CharacterTagRepo::list_by_campaign(pool, campaign_id).await?,
        relationships: RelationshipRepo::list_by_campaign(pool, campaign_id).await?,
        canvas_groups: CanvasGroupRepo::list_by_campaign(pool, campaign_id).await?,
        sessions: CampaignSessionRepo::list_by_campaign(pool, campaign_id).await?,
        world_maps: WorldMapRepo::list_by_campaign(pool, campaign_id).await?,
        media_items: MediaRepo::list_by_campaign(pool, campaign_id).await?,
        lore_entries: LoreRepo::list_by_campaign(pool, campaign_id).await?,
        campaign,
    })
}

/// Fetch a vault character and all of its children.
pub async fn load_character_graph(
    pool: &PgPool,
    character_id: DbId,
) -> EngineResult<CharacterGraph> {
    let character = VaultCharacterRepo::find_by_id(pool, character_id)
        .await?
        .ok_or_else(|| EngineError::not_found("vault_character", character_id))?;

    Ok(CharacterGraph {
        images: CharacterImageRepo::list_by_character(pool, character_id).await?,
        locations: CharacterLocationRepo::list_by_character(pool, character_id).await?,
        spells: CharacterSpellRepo::list_by_character(pool, character_id).await?,
        writings: CharacterWritingRepo::list_by_character(pool, character_id).await?,
        relationships: VaultRelationshipRepo::list_by_character(pool, character_id).await?,
        character,
    })
}

// ---------------------------------------------------------------------------
// Per-entity insert helpers (the shared remap/insert path)
// ---------------------------------------------------------------------------

pub(crate) async fn insert_tag(
    pool: &PgPool,
    dest_campaign_id: DbId,
    source_id: DbId,
    input: &NewTag,
    table: &mut TranslationTable,
    report: &mut CopyReport,
) {
    match TagRepo::create(pool, dest_campaign_id, input).await {
        Ok(created) => {
            table.record(EntityKind::Tag, source_id, created.id);
            report.record_created(EntityKind::Tag);
        }
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy tag");
            report.record_failure(EntityKind::Tag, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_campaign_character(
    pool: &PgPool,
    dest_campaign_id: DbId,
    source_id: DbId,
    input: &NewCampaignCharacter,
    table: &mut TranslationTable,
    report: &mut CopyReport,
) {
    match CampaignCharacterRepo::create(pool, dest_campaign_id, input).await {
        Ok(created) => {
            table.record(EntityKind::CampaignCharacter, source_id, created.id);
            report.record_created(EntityKind::CampaignCharacter);
        }
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy campaign character");
            report.record_failure(EntityKind::CampaignCharacter, Some(source_id), e.to_string());
        }
    }
}

/// Copy a character-tag link. Dropped silently when either endpoint was
/// not copied in this pass; the optional related character is severed
/// rather than left dangling.
pub(crate) async fn insert_character_tag(
    pool: &PgPool,
    source_character_id: DbId,
    source_tag_id: DbId,
    source_related_id: Option<DbId>,
    table: &mut TranslationTable,
    report: &mut CopyReport,
) {
    let (character_id, tag_id) = match (
        table.lookup(EntityKind::CampaignCharacter, source_character_id),
        table.lookup(EntityKind::Tag, source_tag_id),
    ) {
        (Some(c), Some(t)) => (c, t),
        _ => return,
    };
    let related = table.remap_optional(EntityKind::CampaignCharacter, source_related_id);

    match CharacterTagRepo::create(pool, character_id, tag_id, related).await {
        Ok(_) => report.record_created(EntityKind::CharacterTag),
        Err(e) => {
            tracing::warn!(source_character_id, source_tag_id, error = %e, "failed to copy character tag");
            report.record_failure(EntityKind::CharacterTag, None, e.to_string());
        }
    }
}

/// Copy a relationship. Dropped silently when either endpoint character
/// was not copied in this pass.
pub(crate) async fn insert_relationship(
    pool: &PgPool,
    dest_campaign_id: DbId,
    source_id: DbId,
    source_from_id: DbId,
    source_to_id: DbId,
    input: &NewRelationship,
    table: &mut TranslationTable,
    report: &mut CopyReport,
) {
    let (from_id, to_id) = match (
        table.lookup(EntityKind::CampaignCharacter, source_from_id),
        table.lookup(EntityKind::CampaignCharacter, source_to_id),
    ) {
        (Some(f), Some(t)) => (f, t),
        _ => return,
    };

    match RelationshipRepo::create(pool, dest_campaign_id, from_id, to_id, input).await {
        Ok(created) => {
            table.record(EntityKind::Relationship, source_id, created.id);
            report.record_created(EntityKind::Relationship);
        }
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy relationship");
            report.record_failure(EntityKind::Relationship, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_canvas_group(
    pool: &PgPool,
    dest_campaign_id: DbId,
    source_id: DbId,
    input: &NewCanvasGroup,
    report: &mut CopyReport,
) {
    match CanvasGroupRepo::create(pool, dest_campaign_id, input).await {
        Ok(_) => report.record_created(EntityKind::CanvasGroup),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy canvas group");
            report.record_failure(EntityKind::CanvasGroup, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_session(
    pool: &PgPool,
    dest_campaign_id: DbId,
    source_id: DbId,
    input: &NewCampaignSession,
    report: &mut CopyReport,
) {
    match CampaignSessionRepo::create(pool, dest_campaign_id, input).await {
        Ok(_) => report.record_created(EntityKind::Session),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy session");
            report.record_failure(EntityKind::Session, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_world_map(
    pool: &PgPool,
    dest_campaign_id: DbId,
    source_id: DbId,
    input: &NewWorldMap,
    report: &mut CopyReport,
) {
    match WorldMapRepo::create(pool, dest_campaign_id, input).await {
        Ok(_) => report.record_created(EntityKind::WorldMap),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy world map");
            report.record_failure(EntityKind::WorldMap, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_media_item(
    pool: &PgPool,
    dest_campaign_id: DbId,
    source_id: DbId,
    input: &NewMediaItem,
    report: &mut CopyReport,
) {
    match MediaRepo::create(pool, dest_campaign_id, input).await {
        Ok(_) => report.record_created(EntityKind::MediaItem),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy media item");
            report.record_failure(EntityKind::MediaItem, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_lore_entry(
    pool: &PgPool,
    dest_campaign_id: DbId,
    source_id: DbId,
    input: &NewLoreEntry,
    report: &mut CopyReport,
) {
    match LoreRepo::create(pool, dest_campaign_id, input).await {
        Ok(_) => report.record_created(EntityKind::LoreEntry),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy lore entry");
            report.record_failure(EntityKind::LoreEntry, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_character_image(
    pool: &PgPool,
    dest_character_id: DbId,
    dest_user_id: Option<DbId>,
    source_id: DbId,
    input: &NewCharacterImage,
    report: &mut CopyReport,
) {
    match CharacterImageRepo::create(pool, dest_character_id, dest_user_id, input).await {
        Ok(_) => report.record_created(EntityKind::CharacterImage),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy character image");
            report.record_failure(EntityKind::CharacterImage, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_character_location(
    pool: &PgPool,
    dest_character_id: DbId,
    dest_user_id: Option<DbId>,
    source_id: DbId,
    input: &NewCharacterLocation,
    report: &mut CopyReport,
) {
    match CharacterLocationRepo::create(pool, dest_character_id, dest_user_id, input).await {
        Ok(_) => report.record_created(EntityKind::CharacterLocation),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy character location");
            report.record_failure(EntityKind::CharacterLocation, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_character_spell(
    pool: &PgPool,
    dest_character_id: DbId,
    source_id: DbId,
    input: &NewCharacterSpell,
    report: &mut CopyReport,
) {
    match CharacterSpellRepo::create(pool, dest_character_id, input).await {
        Ok(_) => report.record_created(EntityKind::CharacterSpell),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy character spell");
            report.record_failure(EntityKind::CharacterSpell, Some(source_id), e.to_string());
        }
    }
}

pub(crate) async fn insert_character_writing(
    pool: &PgPool,
    dest_character_id: DbId,
    dest_user_id: Option<DbId>,
    source_id: DbId,
    input: &NewCharacterWriting,
    report: &mut CopyReport,
) {
    match CharacterWritingRepo::create(pool, dest_character_id, dest_user_id, input).await {
        Ok(_) => report.record_created(EntityKind::CharacterWriting),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy character writing");
            report.record_failure(EntityKind::CharacterWriting, Some(source_id), e.to_string());
        }
    }
}

/// Copy a vault relationship. The optional link to another vault
/// character is remapped when that character is part of the same copy
/// pass and severed otherwise.
pub(crate) async fn insert_vault_relationship(
    pool: &PgPool,
    dest_character_id: DbId,
    dest_user_id: Option<DbId>,
    source_id: DbId,
    source_related_id: Option<DbId>,
    input: &NewVaultRelationship,
    table: &TranslationTable,
    report: &mut CopyReport,
) {
    let related = table.remap_optional(EntityKind::VaultCharacter, source_related_id);

    match VaultRelationshipRepo::create(pool, dest_character_id, dest_user_id, related, input).await
    {
        Ok(_) => report.record_created(EntityKind::VaultRelationship),
        Err(e) => {
            tracing::warn!(source_id, error = %e, "failed to copy vault relationship");
            report.record_failure(EntityKind::VaultRelationship, Some(source_id), e.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Graph insertion (topological order)
// ---------------------------------------------------------------------------

/// Insert every child of a loaded campaign graph under a new campaign.
///
/// Order: tags, characters, character tags, relationships, canvas
/// groups, sessions, world maps, media, lore. The first two populate
/// the translation table entries the link rows depend on.
pub async fn insert_campaign_graph(
    pool: &PgPool,
    graph: &CampaignGraph,
    dest_campaign_id: DbId,
    table: &mut TranslationTable,
    report: &mut CopyReport,
) {
    for tag in &graph.tags {
        insert_tag(pool, dest_campaign_id, tag.id, &NewTag::from(tag), table, report).await;
    }
    for character in &graph.characters {
        let input = NewCampaignCharacter::from(character);
        insert_campaign_character(pool, dest_campaign_id, character.id, &input, table, report)
            .await;
    }
    for link in &graph.character_tags {
        insert_character_tag(
            pool,
            link.character_id,
            link.tag_id,
            link.related_character_id,
            table,
            report,
        )
        .await;
    }
    for rel in &graph.relationships {
        insert_relationship(
            pool,
            dest_campaign_id,
            rel.id,
            rel.from_character_id,
            rel.to_character_id,
            &NewRelationship::from(rel),
            table,
            report,
        )
        .await;
    }
    for group in &graph.canvas_groups {
        insert_canvas_group(
            pool,
            dest_campaign_id,
            group.id,
            &NewCanvasGroup::from(group),
            report,
        )
        .await;
    }
    for session in &graph.sessions {
        insert_session(
            pool,
            dest_campaign_id,
            session.id,
            &NewCampaignSession::from(session),
            report,
        )
        .await;
    }
    for map in &graph.world_maps {
        insert_world_map(pool, dest_campaign_id, map.id, &NewWorldMap::from(map), report).await;
    }
    for item in &graph.media_items {
        insert_media_item(pool, dest_campaign_id, item.id, &NewMediaItem::from(item), report)
            .await;
    }
    for entry in &graph.lore_entries {
        insert_lore_entry(pool, dest_campaign_id, entry.id, &NewLoreEntry::from(entry), report)
            .await;
    }
}

/// Insert every child of a loaded character graph under a new vault
/// character. Order: images, locations, spells, writings, relationships.
pub async fn insert_character_graph(
    pool: &PgPool,
    graph: &CharacterGraph,
    dest_character_id: DbId,
    dest_user_id: Option<DbId>,
    table: &TranslationTable,
    report: &mut CopyReport,
) {
    for image in &graph.images {
        insert_character_image(
            pool,
            dest_character_id,
            dest_user_id,
            image.id,
            &NewCharacterImage::from(image),
            report,
        )
        .await;
    }
    for location in &graph.locations {
        insert_character_location(
            pool,
            dest_character_id,
            dest_user_id,
            location.id,
            &NewCharacterLocation::from(location),
            report,
        )
        .await;
    }
    for spell in &graph.spells {
        insert_character_spell(
            pool,
            dest_character_id,
            spell.id,
            &NewCharacterSpell::from(spell),
            report,
        )
        .await;
    }
    for writing in &graph.writings {
        insert_character_writing(
            pool,
            dest_character_id,
            dest_user_id,
            writing.id,
            &NewCharacterWriting::from(writing),
            report,
        )
        .await;
    }
    for rel in &graph.relationships {
        insert_vault_relationship(
            pool,
            dest_character_id,
            dest_user_id,
            rel.id,
            rel.related_character_id,
            &NewVaultRelationship::from(rel),
            table,
            report,
        )
        .await;
    }
}

// ---------------------------------------------------------------------------
// Duplication entry points
// ---------------------------------------------------------------------------

/// Duplicate a campaign and its whole graph for `dest_user_id`.
///
/// The new campaign starts unpublished in active mode regardless of the
/// source's template state. `new_name` overrides the source name (the
/// admin clone tool uses this for "(from ...)" labeling).
pub async fn duplicate_campaign(
    pool: &PgPool,
    source_campaign_id: DbId,
    dest_user_id: DbId,
    new_name: Option<&str>,
) -> EngineResult<(Campaign, CopyReport)> {
    let graph = load_campaign_graph(pool, source_campaign_id).await?;

    let mut input = NewCampaign::from(&graph.campaign);
    if let Some(name) = new_name {
        input.name = name.to_string();
    }
    let created = CampaignRepo::create(pool, dest_user_id, &input).await?;

    let mut table = TranslationTable::new();
    let mut report = CopyReport::new();
    table.record(EntityKind::Campaign, graph.campaign.id, created.id);
    report.record_created(EntityKind::Campaign);

    insert_campaign_graph(pool, &graph, created.id, &mut table, &mut report).await;

    tracing::info!(
        source_campaign_id,
        new_campaign_id = created.id,
        created = table.len(),
        errors = report.errors.len(),
        "campaign duplicated"
    );
    Ok((created, report))
}

/// Duplicate a oneshot for `dest_user_id`. Oneshots have no child
/// collections, so this is a single-row copy.
pub async fn duplicate_oneshot(
    pool: &PgPool,
    source_oneshot_id: DbId,
    dest_user_id: DbId,
    new_title: Option<&str>,
) -> EngineResult<(Oneshot, CopyReport)> {
    let source = OneshotRepo::find_by_id(pool, source_oneshot_id)
        .await?
        .ok_or_else(|| EngineError::not_found("oneshot", source_oneshot_id))?;

    let mut input = NewOneshot::from(&source);
    if let Some(title) = new_title {
        input.title = title.to_string();
    }
    let created = OneshotRepo::create(pool, dest_user_id, &input).await?;

    let mut report = CopyReport::new();
    report.record_created(EntityKind::Oneshot);
    tracing::info!(source_oneshot_id, new_oneshot_id = created.id, "oneshot duplicated");
    Ok((created, report))
}

/// Duplicate a vault character and its child collections for
/// `dest_user_id`. Relationships to characters outside this copy are
/// severed.
pub async fn duplicate_character(
    pool: &PgPool,
    source_character_id: DbId,
    dest_user_id: DbId,
    new_name: Option<&str>,
) -> EngineResult<(VaultCharacter, CopyReport)> {
    let graph = load_character_graph(pool, source_character_id).await?;

    let mut input = NewVaultCharacter::from(&graph.character);
    if let Some(name) = new_name {
        input.name = name.to_string();
    }
    let created = VaultCharacterRepo::create(pool, dest_user_id, &input).await?;

    let mut table = TranslationTable::new();
    let mut report = CopyReport::new();
    table.record(EntityKind::VaultCharacter, graph.character.id, created.id);
    report.record_created(EntityKind::VaultCharacter);

    insert_character_graph(pool, &graph, created.id, Some(dest_user_id), &table, &mut report)
        .await;

    tracing::info!(
        source_character_id,
        new_character_id = created.id,
        errors = report.errors.len(),
        "vault character duplicated"
    );
    Ok((created, report))
}

/// Clone every aggregate a user owns into another account.
///
/// Each copied aggregate is renamed "{name} (from {label})". Aggregates
/// are cloned independently; one failing is recorded and the clone
/// moves on, so the caller always gets a full summary report.
pub async fn clone_user_content(
    pool: &PgPool,
    source_user_id: DbId,
    dest_user_id: DbId,
    label: &str,
) -> EngineResult<CopyReport> {
    let mut report = CopyReport::new();

    for campaign in CampaignRepo::list_by_user(pool, source_user_id).await? {
        let name = format!("{} (from {label})", campaign.name);
        match duplicate_campaign(pool, campaign.id, dest_user_id, Some(&name)).await {
            Ok((_, r)) => report.merge(r),
            Err(e) => {
                tracing::warn!(campaign_id = campaign.id, error = %e, "campaign clone failed");
                report.record_failure(EntityKind::Campaign, Some(campaign.id), e.to_string());
            }
        }
    }

    for oneshot in OneshotRepo::list_by_user(pool, source_user_id).await? {
        let title = format!("{} (from {label})", oneshot.title);
        match duplicate_oneshot(pool, oneshot.id, dest_user_id, Some(&title)).await {
            Ok((_, r)) => report.merge(r),
            Err(e) => {
                tracing::warn!(oneshot_id = oneshot.id, error = %e, "oneshot clone failed");
                report.record_failure(EntityKind::Oneshot, Some(oneshot.id), e.to_string());
            }
        }
    }

    // Characters clone in two passes sharing one translation table so
    // that vault relationships between two cloned characters remap to
    // the new ids instead of being severed.
    let characters = VaultCharacterRepo::list_by_user(pool, source_user_id).await?;
    let mut table = TranslationTable::new();
    let mut cloned_roots: Vec<DbId> = Vec::new();

    for character in &characters {
        let mut input = NewVaultCharacter::from(character);
        input.name = format!("{} (from {label})", character.name);
        match VaultCharacterRepo::create(pool, dest_user_id, &input).await {
            Ok(created) => {
                table.record(EntityKind::VaultCharacter, character.id, created.id);
                report.record_created(EntityKind::VaultCharacter);
                cloned_roots.push(character.id);
            }
            Err(e) => {
                tracing::warn!(character_id = character.id, error = %e, "character clone failed");
                report.record_failure(EntityKind::VaultCharacter, Some(character.id), e.to_string());
            }
        }
    }
    for source_id in cloned_roots {
        let dest_id = match table.lookup(EntityKind::VaultCharacter, source_id) {
            Some(id) => id,
            None => continue,
        };
        match load_character_graph(pool, source_id).await {
            Ok(graph) => {
                insert_character_graph(pool, &graph, dest_id, Some(dest_user_id), &table, &mut report)
                    .await;
            }
            Err(e) => {
                tracing::warn!(character_id = source_id, error = %e, "character children clone failed");
                report.record_failure(EntityKind::VaultCharacter, Some(source_id), e.to_string());
            }
        }
    }

    tracing::info!(
        source_user_id,
        dest_user_id,
        created = ?report.created,
        errors = report.errors.len(),
        "account clone finished"
    );
    Ok(report)
}
