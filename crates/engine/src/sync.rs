//! Field projector between campaign-character and vault-character shapes.
//!
//! Projections are pure and total: every field either copies verbatim,
//! coerces through a defined conversion (`age`, `quotes`), or is dropped
//! because it has no meaning on the destination side. Unmappable values
//! degrade to `None`, never to an error.

use serde_json::Value;

use lorebound_core::coerce::{age_from_text, age_to_text, normalize_quotes};
use lorebound_core::content::SourceType;
use lorebound_core::types::{DbId, Timestamp};
use lorebound_db::models::campaign_character::{CampaignCharacter, NewCampaignCharacter};
use lorebound_db::models::vault_character::{NewVaultCharacter, SourceFields, VaultCharacter};

/// Campaign-side fields that never travel to the vault: table state,
/// DM bookkeeping, and canvas layout.
pub const CAMPAIGN_ONLY_FIELDS: &[&str] = &[
    "story_hooks",
    "dm_notes",
    "visibility",
    "play_status",
    "is_party_member",
    "position_x",
    "position_y",
    "controlled_by_user_id",
    "vault_character_id",
];

/// Vault-side fields that never travel to a campaign: collection
/// state and source/lineage tracking.
pub const VAULT_ONLY_FIELDS: &[&str] = &[
    "is_archived",
    "is_favorite",
    "source_type",
    "source_campaign_id",
    "source_campaign_name",
    "source_campaign_character_id",
    "source_snapshot_date",
    "source_session_number",
    "character_lineage_id",
];

/// Provenance stamped onto a vault character created by an export.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub source_type: SourceType,
    pub campaign_id: DbId,
    pub campaign_name: String,
    pub campaign_character_id: DbId,
    pub snapshot_date: Timestamp,
    pub session_number: i32,
    pub lineage_id: Option<DbId>,
}

impl ExportContext {
    pub fn source_fields(&self) -> SourceFields {
        SourceFields {
            source_type: self.source_type.as_str().to_string(),
            source_campaign_id: Some(self.campaign_id),
            source_campaign_name: Some(self.campaign_name.clone()),
            source_campaign_character_id: Some(self.campaign_character_id),
            source_snapshot_date: Some(self.snapshot_date),
            source_session_number: Some(self.session_number),
            character_lineage_id: self.lineage_id,
        }
    }
}

/// Project a campaign character into a new vault character.
///
/// Numeric `age` becomes text, `quotes` JSON normalizes to a string
/// array, campaign `role` becomes vault `npc_role`. Publication and
/// template metadata is stamped with fresh-copy defaults, never copied.
pub fn campaign_to_vault(source: &CampaignCharacter, ctx: &ExportContext) -> NewVaultCharacter {
    NewVaultCharacter {
        name: source.name.clone(),
        kind: source.kind.clone(),
        description: source.description.clone(),
        summary: source.summary.clone(),
        notes: source.notes.clone(),
        backstory: source.backstory.clone(),
        motivations: source.motivations.clone(),
        image_url: source.image_url.clone(),
        detail_image_url: source.detail_image_url.clone(),
        status: source.status.clone(),
        status_color: source.status_color.clone(),
        race: source.race.clone(),
        class: source.class.clone(),
        background: source.background.clone(),
        appearance: source.appearance.clone(),
        personality: source.personality.clone(),
        goals: source.goals.clone(),
        secrets: source.secrets.clone(),
        age: age_to_text(source.age),
        npc_role: source.role.clone(),
        important_people: source.important_people.clone(),
        quotes: normalize_quotes(source.quotes.as_ref()),
        is_archived: false,
        is_favorite: false,
        template_id: None,
        saved_template_version: None,
        source: ctx.source_fields(),
    }
}

/// Project a vault character into a new campaign character.
///
/// Textual `age` parses back to a number (null on failure), `quotes`
/// becomes a JSON array, vault `npc_role` becomes campaign `role`.
/// Canvas position comes from the caller; table-state fields start at
/// their fresh-row defaults.
pub fn vault_to_campaign(
    source: &VaultCharacter,
    position: (f32, f32),
    vault_character_id: Option<DbId>,
) -> NewCampaignCharacter {
    NewCampaignCharacter {
        name: source.name.clone(),
        kind: source.kind.clone(),
        description: source.description.clone(),
        summary: source.summary.clone(),
        notes: source.notes.clone(),
        backstory: source.backstory.clone(),
        motivations: source.motivations.clone(),
        image_url: source.image_url.clone(),
        detail_image_url: source.detail_image_url.clone(),
        status: source.status.clone(),
        status_color: source.status_color.clone(),
        race: source.race.clone(),
        class: source.class.clone(),
        background: source.background.clone(),
        appearance: source.appearance.clone(),
        personality: source.personality.clone(),
        goals: source.goals.clone(),
        secrets: source.secrets.clone(),
        age: age_from_text(source.age.as_deref()),
        role: source.npc_role.clone(),
        important_people: source.important_people.clone(),
        quotes: source
            .quotes
            .as_ref()
            .map(|q| Value::Array(q.iter().map(|s| Value::String(s.clone())).collect())),
        story_hooks: None,
        dm_notes: None,
        visibility: "public".to_string(),
        play_status: "active".to_string(),
        is_party_member: false,
        position_x: position.0,
        position_y: position.1,
        vault_character_id,
    }
}

/// Project the synced subset of a campaign character for an in-place
/// update of an existing vault row (export overwrite, linked sync).
///
/// The embedded source fields are placeholders; update queries only
/// touch the synced content columns.
pub fn synced_fields_update(source: &CampaignCharacter) -> NewVaultCharacter {
    let ctx = ExportContext {
        source_type: SourceType::Original,
        campaign_id: source.campaign_id,
        campaign_name: String::new(),
        campaign_character_id: source.id,
        snapshot_date: chrono::Utc::now(),
        session_number: 0,
        lineage_id: None,
    };
    campaign_to_vault(source, &ctx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_campaign_character() -> CampaignCharacter {
        CampaignCharacter {
            id: 11,
            campaign_id: 3,
            name: "Serah Windspear".to_string(),
            kind: "pc".to_string(),
            description: Some("A wandering ranger".to_string()),
            summary: Some("Ranger of the northern wastes".to_string()),
            notes: Some("met the party in session 2".to_string()),
            backstory: Some("Raised by wolves".to_string()),
            motivations: Some("Find her sister".to_string()),
            image_url: Some("https://cdn.example/serah.png".to_string()),
            detail_image_url: None,
            status: Some("alive".to_string()),
            status_color: Some("#22cc55".to_string()),
            race: Some("elf".to_string()),
            class: Some("ranger".to_string()),
            background: Some("outlander".to_string()),
            appearance: Some("tall, silver hair".to_string()),
            personality: Some("wary".to_string()),
            goals: Some("reunite her family".to_string()),
            secrets: Some("afraid of the dark".to_string()),
            age: Some(34),
            role: Some("scout".to_string()),
            important_people: Some(json!([{"name": "Mira", "relation": "sister"}])),
            quotes: Some(json!(["No one gets left behind"])),
            story_hooks: Some("her sister is in the bandit camp".to_string()),
            dm_notes: Some("secretly cursed".to_string()),
            visibility: "public".to_string(),
            play_status: "active".to_string(),
            is_party_member: true,
            position_x: 120.0,
            position_y: 48.5,
            controlled_by_user_id: Some(77),
            vault_character_id: Some(5),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn sample_context() -> ExportContext {
        ExportContext {
            source_type: SourceType::Export,
            campaign_id: 3,
            campaign_name: "Winter Crown".to_string(),
            campaign_character_id: 11,
            snapshot_date: chrono::Utc::now(),
            session_number: 4,
            lineage_id: Some(900),
        }
    }

    #[test]
    fn synced_fields_copy_verbatim() {
        let source = sample_campaign_character();
        let projected = campaign_to_vault(&source, &sample_context());

        assert_eq!(projected.name, source.name);
        assert_eq!(projected.description, source.description);
        assert_eq!(projected.backstory, source.backstory);
        assert_eq!(projected.appearance, source.appearance);
        assert_eq!(projected.secrets, source.secrets);
        assert_eq!(projected.image_url, source.image_url);
        assert_eq!(projected.npc_role, source.role);
    }

    #[test]
    fn age_coerces_to_text_and_back() {
        let source = sample_campaign_character();
        let vault = campaign_to_vault(&source, &sample_context());
        assert_eq!(vault.age.as_deref(), Some("34"));

        let row = vault_row_from(&vault);
        let back = vault_to_campaign(&row, (0.0, 0.0), None);
        assert_eq!(back.age, Some(34));
    }

    #[test]
    fn unparseable_age_degrades_to_null() {
        let vault = VaultCharacter {
            age: Some("ancient beyond counting".to_string()),
            ..vault_row_from(&campaign_to_vault(
                &sample_campaign_character(),
                &sample_context(),
            ))
        };
        let projected = vault_to_campaign(&vault, (0.0, 0.0), None);
        assert_eq!(projected.age, None);
    }

    #[test]
    fn quotes_normalize_to_array() {
        let mut source = sample_campaign_character();
        source.quotes = Some(json!("a lone string quote"));
        let projected = campaign_to_vault(&source, &sample_context());
        assert_eq!(
            projected.quotes,
            Some(vec!["a lone string quote".to_string()])
        );
    }

    #[test]
    fn export_context_is_stamped() {
        let ctx = sample_context();
        let projected = campaign_to_vault(&sample_campaign_character(), &ctx);
        assert_eq!(projected.source.source_type, "export");
        assert_eq!(projected.source.source_campaign_id, Some(3));
        assert_eq!(projected.source.source_campaign_character_id, Some(11));
        assert_eq!(projected.source.source_session_number, Some(4));
        assert_eq!(projected.source.character_lineage_id, Some(900));
    }

    #[test]
    fn projection_stamps_fresh_defaults() {
        let projected = campaign_to_vault(&sample_campaign_character(), &sample_context());
        assert!(!projected.is_archived);
        assert!(!projected.is_favorite);
        assert_eq!(projected.template_id, None);
        assert_eq!(projected.saved_template_version, None);
    }

    #[test]
    fn campaign_only_fields_do_not_serialize_into_vault_shape() {
        let projected = campaign_to_vault(&sample_campaign_character(), &sample_context());
        let as_json = serde_json::to_value(&projected).expect("serializable");
        for field in CAMPAIGN_ONLY_FIELDS {
            assert!(
                as_json.get(field).is_none(),
                "campaign-only field {field} leaked into vault projection"
            );
        }
    }

    #[test]
    fn vault_only_fields_do_not_serialize_into_campaign_shape() {
        let row = vault_row_from(&campaign_to_vault(
            &sample_campaign_character(),
            &sample_context(),
        ));
        let projected = vault_to_campaign(&row, (10.0, 20.0), None);
        let as_json = serde_json::to_value(&projected).expect("serializable");
        for field in VAULT_ONLY_FIELDS {
            assert!(
                as_json.get(field).is_none(),
                "vault-only field {field} leaked into campaign projection"
            );
        }
        assert_eq!(projected.position_x, 10.0);
        assert_eq!(projected.position_y, 20.0);
    }

    /// Expand a create DTO into a full row for reverse-projection tests.
    fn vault_row_from(input: &NewVaultCharacter) -> VaultCharacter {
        VaultCharacter {
            id: 500,
            user_id: 42,
            name: input.name.clone(),
            kind: input.kind.clone(),
            description: input.description.clone(),
            summary: input.summary.clone(),
            notes: input.notes.clone(),
            backstory: input.backstory.clone(),
            motivations: input.motivations.clone(),
            image_url: input.image_url.clone(),
            detail_image_url: input.detail_image_url.clone(),
            status: input.status.clone(),
            status_color: input.status_color.clone(),
            race: input.race.clone(),
            class: input.class.clone(),
            background: input.background.clone(),
            appearance: input.appearance.clone(),
            personality: input.personality.clone(),
            goals: input.goals.clone(),
            secrets: input.secrets.clone(),
            age: input.age.clone(),
            npc_role: input.npc_role.clone(),
            important_people: input.important_people.clone(),
            quotes: input.quotes.clone(),
            is_archived: input.is_archived,
            is_favorite: input.is_favorite,
            content_mode: "active".to_string(),
            is_published: false,
            template_version: 0,
            template_id: input.template_id,
            saved_template_version: input.saved_template_version,
            published_at: None,
            allow_save: false,
            template_save_count: 0,
            attribution_name: None,
            template_description: None,
            source_type: input.source.source_type.clone(),
            source_campaign_id: input.source.source_campaign_id,
            source_campaign_name: input.source.source_campaign_name.clone(),
            source_campaign_character_id: input.source.source_campaign_character_id,
            source_snapshot_date: input.source.source_snapshot_date,
            source_session_number: input.source.source_session_number,
            character_lineage_id: input.source.character_lineage_id,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            deleted_at: None,
        }
    }
}
