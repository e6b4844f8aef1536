//! Character export, lineage threading, and the session-0 gate.
//!
//! Every vault character exported from the same campaign character
//! shares one `character_lineage_id`, equal to the first export's own
//! id. The lineage id is resolved before insert when prior exports
//! exist and set self-referentially right after insert otherwise; once
//! assigned it never changes.

use serde_json::Value;
use sqlx::PgPool;

use lorebound_core::content::{SnapshotKind, SourceType};
use lorebound_core::session_zero::{
    session0_state, Session0State, CAPTURED_REASON, WINDOW_CLOSED_REASON,
};
use lorebound_core::types::DbId;

use lorebound_db::models::campaign_character::CampaignCharacter;
use lorebound_db::models::snapshot::{CharacterSnapshot, NewCharacterSnapshot};
use lorebound_db::models::vault_character::{ExportSummary, NewVaultCharacter, VaultCharacter};
use lorebound_db::repositories::{
    CampaignCharacterRepo, CampaignRepo, CampaignSessionRepo, CharacterSnapshotRepo,
    VaultCharacterRepo,
};

use crate::error::{EngineError, EngineResult};
use crate::sync::{campaign_to_vault, synced_fields_update, vault_to_campaign, ExportContext};

const CAPTURABLE_REASON: &str =
    "No Session 0 snapshot exists yet; one can be captured before the first session is logged.";

/// How a campaign character's sheet travels to the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// The pre-play sheet: captured once, retrievable forever.
    Session0,
    /// A point-in-time copy of the current sheet.
    Current,
    /// A live copy that stays linked to the campaign character.
    Linked,
}

impl ExportKind {
    fn source_type(&self) -> SourceType {
        match self {
            Self::Session0 => SourceType::Session0,
            Self::Current => SourceType::Export,
            Self::Linked => SourceType::Linked,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub user_id: DbId,
    pub campaign_id: DbId,
    pub campaign_character_id: DbId,
    pub kind: ExportKind,
    /// Overwrite this existing export in place instead of creating a
    /// new vault row. Must be an export of the same source character.
    pub overwrite_id: Option<DbId>,
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub vault_character: VaultCharacter,
    pub overwritten: bool,
}

/// Outcome of the session-0 gate for one (campaign, character) pair.
#[derive(Debug)]
pub struct Session0Availability {
    pub state: Session0State,
    /// Display string explaining the state.
    pub reason: &'static str,
    /// The existing session-0 snapshot, when one was captured.
    pub snapshot: Option<CharacterSnapshot>,
}

/// Evaluate the session-0 gate. No persistent flag is involved: the
/// window is open until the first session note is written and closes
/// implicitly the moment one exists.
pub async fn check_session0_availability(
    pool: &PgPool,
    campaign_id: DbId,
    campaign_character_id: DbId,
) -> EngineResult<Session0Availability> {
    let snapshot =
        CharacterSnapshotRepo::find_session0(pool, campaign_id, campaign_character_id).await?;
    let has_history = CampaignSessionRepo::has_session_history(pool, campaign_id).await?;

    let state = session0_state(snapshot.is_some(), has_history);
    let reason = match state {
        Session0State::Capturable => CAPTURABLE_REASON,
        Session0State::Captured => CAPTURED_REASON,
        Session0State::WindowClosed => WINDOW_CLOSED_REASON,
    };
    Ok(Session0Availability {
        state,
        reason,
        snapshot,
    })
}

/// Exports a user has already taken of one campaign character, most
/// recent snapshot first. Callers use this to offer "create new export"
/// versus "overwrite export N".
pub async fn list_exports_for_source(
    pool: &PgPool,
    user_id: DbId,
    campaign_id: DbId,
    campaign_character_id: DbId,
) -> EngineResult<Vec<ExportSummary>> {
    Ok(
        VaultCharacterRepo::list_exports(pool, user_id, campaign_id, campaign_character_id)
            .await?,
    )
}

/// Export a campaign character into the user's vault.
///
/// Session-0 exports go through the availability gate: the first one
/// captures the pre-play sheet, later ones replay the stored snapshot,
/// and a closed window is rejected with its display reason. Linked
/// exports back-link the campaign character to the new vault row.
pub async fn export_character(pool: &PgPool, req: &ExportRequest) -> EngineResult<ExportOutcome> {
    let campaign = CampaignRepo::find_by_id(pool, req.campaign_id)
        .await?
        .ok_or_else(|| EngineError::not_found("campaign", req.campaign_id))?;
    let character = CampaignCharacterRepo::find_by_id(pool, req.campaign_character_id)
        .await?
        .ok_or_else(|| EngineError::not_found("campaign_character", req.campaign_character_id))?;
    if character.campaign_id != req.campaign_id {
        return Err(EngineError::validation(
            "character does not belong to the given campaign",
        ));
    }
    if req.overwrite_id.is_some() && req.kind != ExportKind::Current {
        return Err(EngineError::validation(
            "only current-sheet exports may overwrite an existing export",
        ));
    }

    let session_number =
        CampaignSessionRepo::current_session_number(pool, req.campaign_id).await?;
    let lineage_id = match req.overwrite_id {
        // Overwrites keep the target row's lineage untouched.
        Some(_) => None,
        None => {
            VaultCharacterRepo::find_lineage_root(
                pool,
                req.user_id,
                req.campaign_id,
                req.campaign_character_id,
            )
            .await?
        }
    };

    let mut ctx = ExportContext {
        source_type: req.kind.source_type(),
        campaign_id: campaign.id,
        campaign_name: campaign.name.clone(),
        campaign_character_id: character.id,
        snapshot_date: chrono::Utc::now(),
        session_number,
        lineage_id,
    };

    // Resolve the sheet to export and whether a new session-0 snapshot
    // must be captured alongside it.
    let (input, capture_session0) = match req.kind {
        ExportKind::Session0 => {
            let availability =
                check_session0_availability(pool, req.campaign_id, req.campaign_character_id)
                    .await?;
            match availability.state {
                Session0State::WindowClosed => {
                    return Err(EngineError::forbidden(availability.reason));
                }
                Session0State::Captured => {
                    let snapshot = availability.snapshot.ok_or_else(|| {
                        EngineError::MalformedSnapshot(
                            "captured state without a stored snapshot".to_string(),
                        )
                    })?;
                    ctx.snapshot_date = snapshot.created_at;
                    ctx.session_number = 0;
                    (sheet_from_snapshot(&snapshot.snapshot_data, &ctx)?, false)
                }
                Session0State::Capturable => {
                    ctx.session_number = 0;
                    (campaign_to_vault(&character, &ctx), true)
                }
            }
        }
        ExportKind::Current | ExportKind::Linked => (campaign_to_vault(&character, &ctx), false),
    };

    let (vault_character, overwritten) = match req.overwrite_id {
        Some(target_id) => (
            overwrite_export(pool, req, target_id, &input).await?,
            true,
        ),
        None => {
            let mut created = VaultCharacterRepo::create(pool, req.user_id, &input).await?;
            if created.character_lineage_id.is_none() {
                // First export of this character: the row anchors its
                // own lineage.
                VaultCharacterRepo::set_lineage(pool, created.id, created.id).await?;
                created.character_lineage_id = Some(created.id);
            }
            (created, false)
        }
    };

    if req.kind == ExportKind::Linked {
        CampaignCharacterRepo::link_to_vault(pool, character.id, vault_character.id).await?;
    }

    record_export_snapshot(pool, req, &character, &vault_character, &input, capture_session0)
        .await?;

    tracing::info!(
        campaign_id = req.campaign_id,
        campaign_character_id = req.campaign_character_id,
        vault_character_id = vault_character.id,
        lineage_id = vault_character.character_lineage_id,
        kind = ?req.kind,
        overwritten,
        "character exported"
    );
    Ok(ExportOutcome {
        vault_character,
        overwritten,
    })
}

/// Replace an existing export's synced content in place. Id, owner,
/// creation date, and lineage are preserved.
async fn overwrite_export(
    pool: &PgPool,
    req: &ExportRequest,
    target_id: DbId,
    input: &NewVaultCharacter,
) -> EngineResult<VaultCharacter> {
    let existing = VaultCharacterRepo::find_by_id(pool, target_id)
        .await?
        .ok_or_else(|| EngineError::not_found("vault_character", target_id))?;
    if existing.user_id != req.user_id {
        return Err(EngineError::forbidden("export belongs to another user"));
    }
    if existing.source_campaign_character_id != Some(req.campaign_character_id) {
        return Err(EngineError::validation(
            "overwrite target is not an export of this character",
        ));
    }

    VaultCharacterRepo::overwrite_export(pool, target_id, input)
        .await?
        .ok_or_else(|| EngineError::not_found("vault_character", target_id))
}

/// Record the per-export history row in `character_snapshots`.
///
/// A replayed session-0 export records nothing: the original capture is
/// the history.
async fn record_export_snapshot(
    pool: &PgPool,
    req: &ExportRequest,
    character: &CampaignCharacter,
    vault_character: &VaultCharacter,
    input: &NewVaultCharacter,
    capture_session0: bool,
) -> EngineResult<()> {
    let kind = match req.kind {
        ExportKind::Session0 if capture_session0 => SnapshotKind::Session0,
        ExportKind::Session0 => return Ok(()),
        ExportKind::Current => SnapshotKind::CurrentState,
        ExportKind::Linked => SnapshotKind::Join,
    };
    let snapshot_data = serde_json::to_value(input)
        .map_err(|e| EngineError::MalformedSnapshot(e.to_string()))?;

    CharacterSnapshotRepo::create(
        pool,
        Some(req.user_id),
        &NewCharacterSnapshot {
            campaign_id: req.campaign_id,
            campaign_character_id: character.id,
            vault_character_id: Some(vault_character.id),
            snapshot_kind: kind,
            snapshot_name: Some(character.name.clone()),
            snapshot_data,
        },
    )
    .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Linked-character sync
// ---------------------------------------------------------------------------

/// Add a vault character to a campaign as a linked campaign character.
///
/// The new campaign character carries the projected sheet, keeps a link
/// back to the vault row, and gets a join history snapshot.
pub async fn join_campaign(
    pool: &PgPool,
    user_id: DbId,
    campaign_id: DbId,
    vault_character_id: DbId,
    position: (f32, f32),
) -> EngineResult<CampaignCharacter> {
    let campaign = CampaignRepo::find_by_id(pool, campaign_id)
        .await?
        .ok_or_else(|| EngineError::not_found("campaign", campaign_id))?;
    let vault = VaultCharacterRepo::find_by_id(pool, vault_character_id)
        .await?
        .ok_or_else(|| EngineError::not_found("vault_character", vault_character_id))?;
    if vault.user_id != user_id {
        return Err(EngineError::forbidden("character belongs to another user"));
    }

    let input = vault_to_campaign(&vault, position, Some(vault.id));
    let created = CampaignCharacterRepo::create(pool, campaign.id, &input).await?;

    let snapshot_data = serde_json::to_value(&input)
        .map_err(|e| EngineError::MalformedSnapshot(e.to_string()))?;
    CharacterSnapshotRepo::create(
        pool,
        Some(user_id),
        &NewCharacterSnapshot {
            campaign_id: campaign.id,
            campaign_character_id: created.id,
            vault_character_id: Some(vault.id),
            snapshot_kind: SnapshotKind::Join,
            snapshot_name: Some(created.name.clone()),
            snapshot_data,
        },
    )
    .await?;

    tracing::info!(
        campaign_id = campaign.id,
        vault_character_id = vault.id,
        campaign_character_id = created.id,
        "vault character joined campaign"
    );
    Ok(created)
}

/// Push a linked campaign character's current sheet to its vault row.
///
/// Returns `None` when the character has no vault link or the linked
/// row was deleted. Only the synced content subset is written.
pub async fn sync_to_vault(
    pool: &PgPool,
    campaign_character_id: DbId,
) -> EngineResult<Option<VaultCharacter>> {
    let character = CampaignCharacterRepo::find_by_id(pool, campaign_character_id)
        .await?
        .ok_or_else(|| EngineError::not_found("campaign_character", campaign_character_id))?;
    let Some(vault_id) = character.vault_character_id else {
        return Ok(None);
    };

    let update = synced_fields_update(&character);
    Ok(VaultCharacterRepo::apply_synced_fields(pool, vault_id, &update).await?)
}

/// Pull the linked vault row's current sheet into a campaign character.
/// The inverse direction of [`sync_to_vault`].
pub async fn sync_from_vault(
    pool: &PgPool,
    campaign_character_id: DbId,
) -> EngineResult<Option<CampaignCharacter>> {
    let character = CampaignCharacterRepo::find_by_id(pool, campaign_character_id)
        .await?
        .ok_or_else(|| EngineError::not_found("campaign_character", campaign_character_id))?;
    let Some(vault_id) = character.vault_character_id else {
        return Ok(None);
    };
    let Some(vault) = VaultCharacterRepo::find_by_id(pool, vault_id).await? else {
        return Ok(None);
    };

    let update = vault_to_campaign(
        &vault,
        (character.position_x, character.position_y),
        Some(vault_id),
    );
    Ok(CampaignCharacterRepo::apply_synced_fields(pool, character.id, &update).await?)
}

/// Rebuild an export sheet from a stored session-0 snapshot. Source
/// tracking comes from the current export context, not the stored JSON.
fn sheet_from_snapshot(data: &Value, ctx: &ExportContext) -> EngineResult<NewVaultCharacter> {
    if !data.is_object() {
        return Err(EngineError::MalformedSnapshot(
            "session-0 snapshot_data is not an object".to_string(),
        ));
    }
    let mut input: NewVaultCharacter = serde_json::from_value(data.clone())
        .map_err(|e| EngineError::MalformedSnapshot(format!("session-0 sheet: {e}")))?;
    input.source = ctx.source_fields();
    Ok(input)
}
