//! Result accounting for bulk copy operations.
//!
//! Copy operations are best-effort: each entity is attempted individually,
//! failures are recorded, and processing continues. Callers surface the
//! finished report to the user ("created 4 characters, 1 failed: ...")
//! instead of an all-or-nothing outcome.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::transfer::EntityKind;
use crate::types::DbId;

/// A single entity-level failure inside a copy operation.
#[derive(Debug, Clone, Serialize)]
pub struct CopyFailure {
    pub kind: EntityKind,
    /// Source row id, when the failure is attributable to one row.
    pub source_id: Option<DbId>,
    pub message: String,
}

/// Per-kind created counts plus the error list for one copy operation.
#[derive(Debug, Default, Serialize)]
pub struct CopyReport {
    /// Rows successfully created, keyed by entity kind. BTreeMap keeps
    /// serialized output deterministic.
    pub created: BTreeMap<EntityKind, u64>,
    pub errors: Vec<CopyFailure>,
}

impl CopyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successfully created row of `kind`.
    pub fn record_created(&mut self, kind: EntityKind) {
        *self.created.entry(kind).or_insert(0) += 1;
    }

    /// Record an entity-level failure. The operation continues.
    pub fn record_failure(
        &mut self,
        kind: EntityKind,
        source_id: Option<DbId>,
        message: impl Into<String>,
    ) {
        self.errors.push(CopyFailure {
            kind,
            source_id,
            message: message.into(),
        });
    }

    /// Created count for a single kind (0 when none).
    pub fn created_count(&self, kind: EntityKind) -> u64 {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    /// Fold another report into this one. Used by multi-aggregate
    /// operations (account clone) that run one sub-report per aggregate.
    pub fn merge(&mut self, other: CopyReport) {
        for (kind, count) in other.created {
            *self.created.entry(kind).or_insert(0) += count;
        }
        self.errors.extend(other.errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
