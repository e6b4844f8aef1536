//! Copy-operation-scoped ID translation.
//!
//! Each copy operation owns one [`TranslationTable`]. As rows are inserted
//! the store-assigned ids are recorded here, and later rows remap their
//! foreign keys through it. Two concurrent copy operations never share a
//! table, so no locking is involved.

use std::collections::HashMap;

use crate::transfer::EntityKind;
use crate::types::DbId;

/// Map from `(entity kind, source id)` to the id of the freshly inserted
/// copy. Populated incrementally as the copier walks the graph in
/// topological order.
#[derive(Debug, Default)]
pub struct TranslationTable {
    entries: HashMap<(EntityKind, DbId), DbId>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source_id` of `kind` was copied as `new_id`.
    pub fn record(&mut self, kind: EntityKind, source_id: DbId, new_id: DbId) {
        self.entries.insert((kind, source_id), new_id);
    }

    /// Look up the destination id for a source id. `None` means the
    /// referenced entity was not copied (skipped or failed), and the
    /// caller must drop the referencing row rather than insert a dangling
    /// pointer.
    pub fn lookup(&self, kind: EntityKind, source_id: DbId) -> Option<DbId> {
        self.entries.get(&(kind, source_id)).copied()
    }

    /// Remap an optional foreign key.
    ///
    /// A `None` source stays `None` (the column was already null). A
    /// present source that has no entry also becomes `None`: the reference
    /// pointed outside the copy set and is severed rather than carried.
    pub fn remap_optional(&self, kind: EntityKind, source_id: Option<DbId>) -> Option<DbId> {
        source_id.and_then(|id| self.lookup(kind, id))
    }

    /// Number of recorded translations, across all kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_then_lookup() {
        let mut table = TranslationTable::new();
        table.record(EntityKind::CampaignCharacter, 11, 101);
        assert_eq!(table.lookup(EntityKind::CampaignCharacter, 11), Some(101));
    }

    #[test]
    fn lookup_missing_returns_none() {
        let table = TranslationTable::new();
        assert_eq!(table.lookup(EntityKind::Tag, 5), None);
    }

    #[test]
    fn same_id_different_kind_is_distinct() {
        let mut table = TranslationTable::new();
        table.record(EntityKind::Tag, 9, 90);
        table.record(EntityKind::CampaignCharacter, 9, 900);
        assert_eq!(table.lookup(EntityKind::Tag, 9), Some(90));
        assert_eq!(table.lookup(EntityKind::CampaignCharacter, 9), Some(900));
    }

    #[test]
    fn remap_optional_preserves_null() {
        let table = TranslationTable::new();
        assert_eq!(table.remap_optional(EntityKind::Tag, None), None);
    }

    #[test]
    fn remap_optional_severs_foreign_reference() {
        let mut table = TranslationTable::new();
        table.record(EntityKind::CampaignCharacter, 1, 10);
        // 2 was never copied, so the pointer is dropped.
        assert_eq!(table.remap_optional(EntityKind::CampaignCharacter, Some(2)), None);
        assert_eq!(table.remap_optional(EntityKind::CampaignCharacter, Some(1)), Some(10));
    }

    #[test]
    fn len_counts_all_kinds() {
        let mut table = TranslationTable::new();
        assert!(table.is_empty());
        table.record(EntityKind::Tag, 1, 2);
        table.record(EntityKind::CampaignCharacter, 1, 2);
        assert_eq!(table.len(), 2);
    }
}
