//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Serialize` + `Deserialize` create DTO for inserts
//!
//! Create DTOs round-trip through snapshot `related_data` JSON, so they
//! carry content fields only — primary keys, parent foreign keys, and
//! ownership columns are passed to the repositories separately.

pub mod campaign;
pub mod campaign_character;
pub mod campaign_session;
pub mod canvas_group;
pub mod character_assets;
pub mod content_save;
pub mod lore_entry;
pub mod media_item;
pub mod oneshot;
pub mod relationship;
pub mod snapshot;
pub mod tag;
pub mod vault_character;
pub mod world_map;
