//! Content classification enums shared across the duplication engine.
//!
//! Each enum mirrors a CHECK-constrained text column in the database and
//! provides string conversions in both directions.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Content Type
// ---------------------------------------------------------------------------

/// The kind of aggregate root a snapshot or copy operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Campaign,
    Character,
    Oneshot,
}

impl ContentType {
    /// Return the type name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Campaign => "campaign",
            Self::Character => "character",
            Self::Oneshot => "oneshot",
        }
    }

    /// Parse a type string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "campaign" => Some(Self::Campaign),
            "character" => Some(Self::Character),
            "oneshot" => Some(Self::Oneshot),
            _ => None,
        }
    }

    /// All valid content type values.
    pub const ALL: &'static [&'static str] = &["campaign", "character", "oneshot"];
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Content Mode
// ---------------------------------------------------------------------------

/// Whether an aggregate is live user content or a published template.
///
/// Every copy the engine produces is stamped `Active` regardless of the
/// source's mode, so a copy never inherits template status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    Active,
    Template,
}

impl ContentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Template => "template",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "template" => Some(Self::Template),
            _ => None,
        }
    }

    pub const ALL: &'static [&'static str] = &["active", "template"];
}

impl std::fmt::Display for ContentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Source Type
// ---------------------------------------------------------------------------

/// How a vault character came to exist.
///
/// `Original` is authored directly in the vault. The other three are
/// produced by the export engine and participate in lineage tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Original,
    Linked,
    #[serde(rename = "session_0")]
    Session0,
    Export,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Linked => "linked",
            Self::Session0 => "session_0",
            Self::Export => "export",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "original" => Some(Self::Original),
            "linked" => Some(Self::Linked),
            "session_0" => Some(Self::Session0),
            "export" => Some(Self::Export),
            _ => None,
        }
    }

    pub const ALL: &'static [&'static str] = &["original", "linked", "session_0", "export"];
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Snapshot Kind
// ---------------------------------------------------------------------------

/// The occasion a character snapshot was captured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    /// Pre-campaign state, capturable only before session history exists.
    #[serde(rename = "session_0")]
    Session0,
    /// Captured when a vault character joined a campaign.
    Join,
    /// Captured on an ordinary mid-campaign export.
    CurrentState,
}

impl SnapshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Session0 => "session_0",
            Self::Join => "join",
            Self::CurrentState => "current_state",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "session_0" => Some(Self::Session0),
            "join" => Some(Self::Join),
            "current_state" => Some(Self::CurrentState),
            _ => None,
        }
    }

    pub const ALL: &'static [&'static str] = &["session_0", "join", "current_state"];
}

impl std::fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_round_trip() {
        for s in ContentType::ALL {
            let t = ContentType::from_str(s).unwrap();
            assert_eq!(t.as_str(), *s);
        }
    }

    #[test]
    fn content_type_unknown_returns_none() {
        assert!(ContentType::from_str("world").is_none());
    }

    #[test]
    fn content_mode_round_trip() {
        for s in ContentMode::ALL {
            let m = ContentMode::from_str(s).unwrap();
            assert_eq!(m.as_str(), *s);
        }
    }

    #[test]
    fn source_type_round_trip() {
        for s in SourceType::ALL {
            let t = SourceType::from_str(s).unwrap();
            assert_eq!(t.as_str(), *s);
        }
    }

    #[test]
    fn source_type_display_matches_as_str() {
        assert_eq!(format!("{}", SourceType::Session0), "session_0");
    }

    #[test]
    fn snapshot_kind_round_trip() {
        for s in SnapshotKind::ALL {
            let k = SnapshotKind::from_str(s).unwrap();
            assert_eq!(k.as_str(), *s);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&SourceType::Session0).unwrap();
        assert_eq!(json, "\"session_0\"");
        let back: SourceType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SourceType::Session0);
    }
}
