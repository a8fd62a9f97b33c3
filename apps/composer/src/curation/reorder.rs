//! Reorder Controller: move-up / move-down within a group.
//!
//! Enablement is judged on the selected partition of the display sequence, but the swap
//! itself happens against the immediate neighbour in the full underlying sequence. When
//! that neighbour is unselected the visible selected order does not change; only the
//! unselected tail is permuted. Several clicks can be needed to pass over unselected
//! items. This coupling is kept identical for research, insight and achievement groups.

use serde::{Deserialize, Serialize};

use crate::curation::catalog::{GroupKey, ItemId};
use crate::curation::selection::SelectionSet;
use crate::curation::store::OrderedGroupStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoveEnablement {
    pub up: bool,
    pub down: bool,
}

impl MoveEnablement {
    /// `selected_index` is the item's position within the selected partition,
    /// `None` when the item is not selected.
    pub fn for_position(selected_index: Option<usize>, selected_count: usize) -> Self {
        match selected_index {
            Some(index) => MoveEnablement {
                up: index > 0,
                down: index + 1 < selected_count,
            },
            None => MoveEnablement::default(),
        }
    }

    pub fn allows(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }
}

/// Enablement of `id` within `sequence` given the current selection.
pub fn enablement(sequence: &[ItemId], selection: &SelectionSet, id: ItemId) -> MoveEnablement {
    let mut selected_index = None;
    let mut selected_count = 0;
    for &candidate in sequence {
        if !selection.is_selected(candidate) {
            continue;
        }
        if candidate == id {
            selected_index = Some(selected_count);
        }
        selected_count += 1;
    }
    MoveEnablement::for_position(selected_index, selected_count)
}

/// Moves `id` one step within `group`. Disabled moves and moves that would leave the
/// sequence bounds do nothing. Returns whether the underlying sequence changed.
pub fn move_item(
    store: &mut OrderedGroupStore,
    selection: &SelectionSet,
    group: &GroupKey,
    id: ItemId,
    direction: Direction,
) -> bool {
    let Some(sequence) = store.sequence_mut(group) else {
        return false;
    };
    if !enablement(sequence, selection, id).allows(direction) {
        return false;
    }
    swap_with_neighbour(sequence, id, direction)
}

/// Swaps `id` with its neighbour in the full sequence.
fn swap_with_neighbour(sequence: &mut [ItemId], id: ItemId, direction: Direction) -> bool {
    let Some(index) = sequence.iter().position(|&candidate| candidate == id) else {
        return false;
    };
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|&t| t < sequence.len()),
    };
    match target {
        Some(target) => {
            sequence.swap(index, target);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curation::catalog::{Item, ResearchCategory};
    use crate::curation::resolver::partition_ids;

    const GROUP: GroupKey = GroupKey::Research(ResearchCategory::Requirement);
    const A: ItemId = 1;
    const B: ItemId = 2;
    const C: ItemId = 3;
    const D: ItemId = 4;

    fn store_of(ids: &[ItemId]) -> OrderedGroupStore {
        let items: Vec<Item> = ids
            .iter()
            .map(|&id| Item {
                id,
                text: String::new(),
                group: GROUP,
            })
            .collect();
        OrderedGroupStore::initialize(&items)
    }

    fn selection_of(ids: &[ItemId]) -> SelectionSet {
        let mut selection = SelectionSet::default();
        selection.select_all(ids.iter().copied());
        selection
    }

    #[test]
    fn test_enablement_follows_selected_partition() {
        let sequence = [A, B, C, D];
        let selection = selection_of(&[B, D]);

        assert_eq!(
            enablement(&sequence, &selection, B),
            MoveEnablement { up: false, down: true }
        );
        assert_eq!(
            enablement(&sequence, &selection, D),
            MoveEnablement { up: true, down: false }
        );
        // Unselected items can never move.
        assert_eq!(enablement(&sequence, &selection, A), MoveEnablement::default());
    }

    #[test]
    fn test_single_selected_item_cannot_move() {
        let selection = selection_of(&[C]);
        assert_eq!(
            enablement(&[A, B, C, D], &selection, C),
            MoveEnablement::default()
        );
    }

    #[test]
    fn test_move_first_selected_up_is_noop() {
        let mut store = store_of(&[A, B, C, D]);
        let selection = selection_of(&[B, D]);

        assert!(!move_item(&mut store, &selection, &GROUP, B, Direction::Up));
        assert_eq!(store.sequence(&GROUP), &[A, B, C, D]);
    }

    #[test]
    fn test_move_last_selected_down_is_noop() {
        let mut store = store_of(&[A, B, C, D]);
        let selection = selection_of(&[A, C]);

        assert!(!move_item(&mut store, &selection, &GROUP, C, Direction::Down));
        assert_eq!(store.sequence(&GROUP), &[A, B, C, D]);
    }

    #[test]
    fn test_move_unselected_item_is_noop() {
        let mut store = store_of(&[A, B, C]);
        let selection = selection_of(&[B, C]);

        assert!(!move_item(&mut store, &selection, &GROUP, A, Direction::Down));
        assert_eq!(store.sequence(&GROUP), &[A, B, C]);
    }

    /// D moves up against its full-sequence neighbour C, which is unselected, so the
    /// display order does not change even though the underlying order did.
    #[test]
    fn test_move_up_past_unselected_neighbour_leaves_display_unchanged() {
        let mut store = store_of(&[A, B, C, D]);
        let selection = selection_of(&[B, D]);
        assert_eq!(partition_ids(store.sequence(&GROUP), &selection), vec![B, D, A, C]);

        assert!(move_item(&mut store, &selection, &GROUP, D, Direction::Up));

        assert_eq!(store.sequence(&GROUP), &[A, B, D, C]);
        assert_eq!(partition_ids(store.sequence(&GROUP), &selection), vec![B, D, A, C]);
    }

    #[test]
    fn test_second_click_passes_selected_neighbour() {
        let mut store = store_of(&[A, B, C, D]);
        let selection = selection_of(&[B, D]);

        move_item(&mut store, &selection, &GROUP, D, Direction::Up);
        move_item(&mut store, &selection, &GROUP, D, Direction::Up);

        assert_eq!(store.sequence(&GROUP), &[A, D, B, C]);
        assert_eq!(partition_ids(store.sequence(&GROUP), &selection), vec![D, B, A, C]);
    }

    #[test]
    fn test_move_down_permutes_unselected_tail() {
        let mut store = store_of(&[A, B, C, D]);
        let selection = selection_of(&[A, D]);

        assert!(move_item(&mut store, &selection, &GROUP, A, Direction::Down));
        assert_eq!(store.sequence(&GROUP), &[B, A, C, D]);
        assert_eq!(partition_ids(store.sequence(&GROUP), &selection), vec![A, D, B, C]);
    }

    #[test]
    fn test_move_in_unknown_group_is_noop() {
        let mut store = store_of(&[A, B]);
        let selection = selection_of(&[A, B]);
        assert!(!move_item(
            &mut store,
            &selection,
            &GroupKey::Employer(9),
            A,
            Direction::Down
        ));
    }

    #[test]
    fn test_swap_respects_sequence_bounds() {
        let mut sequence = vec![A, B];
        assert!(!swap_with_neighbour(&mut sequence, A, Direction::Up));
        assert!(!swap_with_neighbour(&mut sequence, B, Direction::Down));
        assert!(!swap_with_neighbour(&mut sequence, C, Direction::Down));
        assert_eq!(sequence, vec![A, B]);
    }
}
