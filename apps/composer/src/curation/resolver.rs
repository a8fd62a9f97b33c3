//! Display Order Resolver.
//!
//! A single stable partition over a group's underlying sequence: selected items first,
//! then unselected, each side keeping its underlying relative order. Pure and uncached;
//! callers re-resolve after every mutation.

use crate::curation::catalog::{Catalog, GroupKey, Item, ItemId};
use crate::curation::selection::SelectionSet;
use crate::curation::store::OrderedGroupStore;

/// Partitions `sequence` into selected ++ unselected.
pub fn partition_ids(sequence: &[ItemId], selection: &SelectionSet) -> Vec<ItemId> {
    let mut selected = Vec::with_capacity(sequence.len());
    let mut unselected = Vec::new();

    for &id in sequence {
        if selection.is_selected(id) {
            selected.push(id);
        } else {
            unselected.push(id);
        }
    }

    selected.extend(unselected);
    selected
}

/// The display sequence of `group`.
pub fn resolve<'a>(
    group: &GroupKey,
    store: &OrderedGroupStore,
    selection: &SelectionSet,
    catalog: &'a Catalog,
) -> Vec<&'a Item> {
    partition_ids(store.sequence(group), selection)
        .into_iter()
        .filter_map(|id| catalog.get(id))
        .collect()
}

/// Only the selected head of the display sequence, in display order.
pub fn resolve_selected<'a>(
    group: &GroupKey,
    store: &OrderedGroupStore,
    selection: &SelectionSet,
    catalog: &'a Catalog,
) -> Vec<&'a Item> {
    store
        .sequence(group)
        .iter()
        .filter(|&&id| selection.is_selected(id))
        .filter_map(|&id| catalog.get(id))
        .collect()
}
