//! Ordered Group Store: the manipulation order of every group.
//!
//! This order is distinct from what the user sees: the display order is derived from it
//! together with the selection (see `resolver`). Items are never removed.

use serde::{Deserialize, Serialize};

use crate::curation::catalog::{GroupKey, Item, ItemId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSequence {
    pub group: GroupKey,
    pub ids: Vec<ItemId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedGroupStore {
    sequences: Vec<GroupSequence>,
}

impl OrderedGroupStore {
    /// Builds one sequence per distinct group, in catalog order.
    pub fn initialize(items: &[Item]) -> Self {
        let mut store = OrderedGroupStore::default();
        for item in items {
            store.append(item.group, item.id);
        }
        store
    }

    /// Appends `id` to the end of `group`'s sequence. Returns false when the id is
    /// already present, in which case nothing changes.
    pub fn append(&mut self, group: GroupKey, id: ItemId) -> bool {
        match self.sequences.iter_mut().find(|s| s.group == group) {
            Some(sequence) if sequence.ids.contains(&id) => false,
            Some(sequence) => {
                sequence.ids.push(id);
                true
            }
            None => {
                self.sequences.push(GroupSequence {
                    group,
                    ids: vec![id],
                });
                true
            }
        }
    }

    /// The full underlying sequence of a group; empty for groups with no items yet.
    pub fn sequence(&self, group: &GroupKey) -> &[ItemId] {
        self.sequences
            .iter()
            .find(|s| &s.group == group)
            .map(|s| s.ids.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn sequence_mut(&mut self, group: &GroupKey) -> Option<&mut Vec<ItemId>> {
        self.sequences
            .iter_mut()
            .find(|s| &s.group == group)
            .map(|s| &mut s.ids)
    }
}
