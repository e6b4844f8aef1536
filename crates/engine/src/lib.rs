//! Content duplication and lineage engine.
//!
//! Orchestrates the operations other subsystems call to copy content
//! graphs between owners: whole-account cloning, "save as copy"
//! duplication, template publish/save/materialize, character export to
//! the vault with lineage threading, and the session-0 availability
//! gate. Pure domain rules live in `lorebound_core`; row access lives
//! in `lorebound_db`.

pub mod config;
pub mod copier;
pub mod error;
pub mod lineage;
pub mod snapshot;
pub mod sync;

pub use error::{EngineError, EngineResult};
