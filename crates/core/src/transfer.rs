//! Entity kinds and the declarative non-transferable field policy.
//!
//! Every row kind the graph copier can duplicate is named here, together
//! with the columns that must never travel with a copy: primary keys,
//! parent foreign keys (rewritten by the copier), ownership columns, and
//! audit timestamps. The snapshot materializer consults this table
//! uniformly instead of each call site keeping its own strip list.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entity Kind
// ---------------------------------------------------------------------------

/// A copyable row kind, used as the key for translation tables, copy
/// reports, and non-transferable field lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Campaign,
    Oneshot,
    VaultCharacter,
    CampaignCharacter,
    Tag,
    CharacterTag,
    Relationship,
    CanvasGroup,
    Session,
    WorldMap,
    MediaItem,
    LoreEntry,
    CharacterImage,
    CharacterLocation,
    CharacterSpell,
    CharacterWriting,
    VaultRelationship,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Campaign => "campaign",
            Self::Oneshot => "oneshot",
            Self::VaultCharacter => "vault_character",
            Self::CampaignCharacter => "campaign_character",
            Self::Tag => "tag",
            Self::CharacterTag => "character_tag",
            Self::Relationship => "relationship",
            Self::CanvasGroup => "canvas_group",
            Self::Session => "session",
            Self::WorldMap => "world_map",
            Self::MediaItem => "media_item",
            Self::LoreEntry => "lore_entry",
            Self::CharacterImage => "character_image",
            Self::CharacterLocation => "character_location",
            Self::CharacterSpell => "character_spell",
            Self::CharacterWriting => "character_writing",
            Self::VaultRelationship => "vault_relationship",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Non-transferable fields
// ---------------------------------------------------------------------------

/// Columns stripped from every row kind before re-insertion.
const ALWAYS_STRIPPED: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

/// Ownership and publication columns stripped from aggregate roots.
///
/// These are re-stamped with fresh-copy defaults by the copier, never
/// carried over, so a copy cannot inherit the source's published or
/// template status.
const AGGREGATE_STRIPPED: &[&str] = &[
    "user_id",
    "is_published",
    "published_at",
    "template_version",
    "template_save_count",
    "save_count",
];

/// Parent foreign keys per child kind. The copier rewrites these to the
/// destination aggregate, so a serialized value must not leak through.
fn parent_keys(kind: EntityKind) -> &'static [&'static str] {
    use EntityKind::*;
    match kind {
        Campaign | Oneshot | VaultCharacter => &[],
        CampaignCharacter | Tag | CanvasGroup | Session | WorldMap | MediaItem | LoreEntry => {
            &["campaign_id"]
        }
        CharacterTag => &["character_id", "tag_id"],
        Relationship => &["campaign_id", "from_character_id", "to_character_id"],
        CharacterImage | CharacterLocation | CharacterSpell | CharacterWriting
        | VaultRelationship => &["character_id", "user_id"],
    }
}

/// Whether a field of the given kind is dropped rather than copied.
pub fn is_non_transferable(kind: EntityKind, field: &str) -> bool {
    if ALWAYS_STRIPPED.contains(&field) {
        return true;
    }
    if parent_keys(kind).contains(&field) {
        return true;
    }
    matches!(
        kind,
        EntityKind::Campaign | EntityKind::Oneshot | EntityKind::VaultCharacter
    ) && AGGREGATE_STRIPPED.contains(&field)
}

/// Remove every non-transferable field from a serialized row in place.
///
/// Non-object values are left untouched; the materializer rejects those
/// separately when deserializing into the typed DTO.
pub fn strip_non_transferable(kind: EntityKind, row: &mut serde_json::Value) {
    if let Some(obj) = row.as_object_mut() {
        obj.retain(|field, _| !is_non_transferable(kind, field));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_never_transfers() {
        assert!(is_non_transferable(EntityKind::Tag, "id"));
        assert!(is_non_transferable(EntityKind::Campaign, "id"));
        assert!(is_non_transferable(EntityKind::VaultRelationship, "id"));
    }

    #[test]
    fn audit_timestamps_never_transfer() {
        for field in ["created_at", "updated_at", "deleted_at"] {
            assert!(is_non_transferable(EntityKind::CampaignCharacter, field));
        }
    }

    #[test]
    fn parent_fk_is_stripped_per_kind() {
        assert!(is_non_transferable(EntityKind::Tag, "campaign_id"));
        assert!(is_non_transferable(EntityKind::CharacterSpell, "character_id"));
        assert!(is_non_transferable(EntityKind::Relationship, "from_character_id"));
        assert!(is_non_transferable(EntityKind::CharacterTag, "tag_id"));
    }

    #[test]
    fn aggregate_publication_fields_are_stripped() {
        assert!(is_non_transferable(EntityKind::Campaign, "is_published"));
        assert!(is_non_transferable(EntityKind::VaultCharacter, "template_version"));
        assert!(is_non_transferable(EntityKind::Oneshot, "published_at"));
    }

    #[test]
    fn publication_fields_only_apply_to_aggregates() {
        // Child rows have no publication metadata; a child column that
        // happens to share a name must survive.
        assert!(!is_non_transferable(EntityKind::Tag, "is_published"));
    }

    #[test]
    fn content_fields_transfer() {
        assert!(!is_non_transferable(EntityKind::CampaignCharacter, "name"));
        assert!(!is_non_transferable(EntityKind::Campaign, "description"));
        assert!(!is_non_transferable(EntityKind::WorldMap, "image_url"));
    }

    #[test]
    fn strip_removes_only_non_transferable() {
        let mut row = serde_json::json!({
            "id": 7,
            "campaign_id": 3,
            "name": "Harbor District",
            "description": "Smugglers everywhere",
            "created_at": "2025-01-01T00:00:00Z",
        });
        strip_non_transferable(EntityKind::Tag, &mut row);
        let obj = row.as_object().unwrap();
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("campaign_id"));
        assert!(!obj.contains_key("created_at"));
        assert_eq!(obj.get("name").unwrap(), "Harbor District");
        assert_eq!(obj.len(), 2);
    }

    #[test]
    fn strip_ignores_non_object_values() {
        let mut row = serde_json::json!("not an object");
        strip_non_transferable(EntityKind::Tag, &mut row);
        assert_eq!(row, serde_json::json!("not an object"));
    }

    #[test]
    fn kind_display_matches_as_str() {
        assert_eq!(format!("{}", EntityKind::CharacterTag), "character_tag");
    }
}
