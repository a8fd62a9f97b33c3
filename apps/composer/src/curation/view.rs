//! Presentation of the curation state: display sequences plus move enablement per item.

use serde::Serialize;

use crate::curation::catalog::{GroupKey, ItemId, Source};
use crate::curation::reorder::MoveEnablement;
use crate::curation::session::{CurationState, SourceState};

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub text: String,
    pub selected: bool,
    pub can_move_up: bool,
    pub can_move_down: bool,
    /// An edit is waiting out the quiet window or is being saved.
    pub save_pending: bool,
    /// Last failed save for this item, shown inline until a later save succeeds.
    pub save_error: Option<String>,
}

/// Persistence status of one item, supplied by whoever owns the pending saves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveStatus {
    pub pending: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub group: GroupKey,
    pub label: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceView {
    pub source: Source,
    pub selected_count: usize,
    pub item_count: usize,
    pub groups: Vec<GroupView>,
}

/// Views every source, in the fixed research, insight, achievement order.
pub fn build_views<F>(state: &CurationState, save_status: F) -> Vec<SourceView>
where
    F: Fn(Source, ItemId) -> SaveStatus,
{
    Source::ALL
        .into_iter()
        .map(|source| source_view(state.source(source), &save_status))
        .collect()
}

fn source_view<F>(state: &SourceState, save_status: &F) -> SourceView
where
    F: Fn(Source, ItemId) -> SaveStatus,
{
    let source = state.source();
    let groups = state
        .catalog
        .groups()
        .iter()
        .map(|group| {
            let display = state.display(&group.key);
            let selected_count = display
                .iter()
                .take_while(|item| state.selection.is_selected(item.id))
                .count();

            // Display is selected ++ unselected, so a selected item's display index
            // is its index within the selected partition.
            let items = display
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let selected = index < selected_count;
                    let enablement =
                        MoveEnablement::for_position(selected.then_some(index), selected_count);
                    let status = save_status(source, item.id);
                    ItemView {
                        id: item.id,
                        text: item.text.clone(),
                        selected,
                        can_move_up: enablement.up,
                        can_move_down: enablement.down,
                        save_pending: status.pending,
                        save_error: status.error,
                    }
                })
                .collect();

            GroupView {
                group: group.key,
                label: group.label.clone(),
                items,
            }
        })
        .collect();

    SourceView {
        source,
        selected_count: state.selection.len(),
        item_count: state.catalog.len(),
        groups,
    }
}
