//! Pure domain logic for the content duplication and lineage engine.
//!
//! This crate has zero I/O: no database, no async, no filesystem. It holds
//! the types and decision logic that the `lorebound-engine` crate drives
//! against live rows — entity kind tables, ID translation, copy reporting,
//! field coercions, and the session-0 availability state machine.

pub mod coerce;
pub mod content;
pub mod error;
pub mod report;
pub mod session_zero;
pub mod transfer;
pub mod translate;
pub mod types;
