//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod campaign_character_repo;
pub mod campaign_repo;
pub mod campaign_session_repo;
pub mod canvas_group_repo;
pub mod character_asset_repo;
pub mod character_snapshot_repo;
pub mod content_save_repo;
pub mod lore_repo;
pub mod media_repo;
pub mod oneshot_repo;
pub mod relationship_repo;
pub mod tag_repo;
pub mod template_snapshot_repo;
pub mod vault_character_repo;
pub mod world_map_repo;

pub use campaign_character_repo::CampaignCharacterRepo;
pub use campaign_repo::CampaignRepo;
pub use campaign_session_repo::{CampaignSessionRepo, PlayerSessionNoteRepo};
pub use canvas_group_repo::CanvasGroupRepo;
pub use character_asset_repo::{
    CharacterImageRepo, CharacterLocationRepo, CharacterSpellRepo, CharacterWritingRepo,
    VaultRelationshipRepo,
};
pub use character_snapshot_repo::CharacterSnapshotRepo;
pub use content_save_repo::ContentSaveRepo;
pub use lore_repo::LoreRepo;
pub use media_repo::MediaRepo;
pub use oneshot_repo::OneshotRepo;
pub use relationship_repo::RelationshipRepo;
pub use tag_repo::{CharacterTagRepo, TagRepo};
pub use template_snapshot_repo::TemplateSnapshotRepo;
pub use vault_character_repo::VaultCharacterRepo;
pub use world_map_repo::WorldMapRepo;
