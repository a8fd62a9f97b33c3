use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::curation::catalog::ItemId;

/// The ids a user has chosen from one source. Membership is independent of group ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: BTreeSet<ItemId>,
}

impl SelectionSet {
    /// Flips membership of `id` and returns whether it is now selected.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Replaces the selection with `ids` in one assignment.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn deselect_all(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let selection = SelectionSet::default();
        assert!(selection.is_empty());
        assert!(!selection.is_selected(1));
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut selection = SelectionSet::default();
        assert!(selection.toggle(3));
        assert!(selection.is_selected(3));
        assert!(!selection.toggle(3));
        assert!(!selection.is_selected(3));
    }

    #[test]
    fn test_toggle_twice_restores_prior_state() {
        let mut selection = SelectionSet::default();
        selection.select_all([1, 4, 9]);
        let before = selection.clone();

        for id in [1, 2, 9] {
            selection.toggle(id);
            selection.toggle(id);
            assert_eq!(selection, before, "double toggle of {id} must be a no-op");
        }
    }

    #[test]
    fn test_select_all_replaces_existing_selection() {
        let mut selection = SelectionSet::default();
        selection.toggle(100);
        selection.select_all([1, 2, 3]);

        assert_eq!(selection.len(), 3);
        assert!([1, 2, 3].iter().all(|&id| selection.is_selected(id)));
        assert!(!selection.is_selected(100));
    }

    #[test]
    fn test_deselect_all_clears() {
        let mut selection = SelectionSet::default();
        selection.select_all([5, 6]);
        selection.deselect_all();
        assert_eq!(selection.len(), 0);
    }
}
