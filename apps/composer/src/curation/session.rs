//! Curation state and its transitions.
//!
//! The whole composition is one serializable record: catalog, ordered store and selection
//! for each of the three sources. Every user action is a pure `(state, action) -> state`
//! transition; a failed transition leaves the input state untouched.

use serde::{Deserialize, Serialize};

use crate::curation::assembler::{assemble, CoverLetterInput};
use crate::curation::catalog::{Catalog, GroupInfo, GroupKey, Item, ItemId, Source};
use crate::curation::reorder::{self, Direction};
use crate::curation::resolver;
use crate::curation::selection::SelectionSet;
use crate::curation::store::OrderedGroupStore;
use crate::curation::CurationError;

/// Catalog, manipulation order and selection for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceState {
    pub catalog: Catalog,
    pub store: OrderedGroupStore,
    pub selection: SelectionSet,
}

impl SourceState {
    /// Fresh state for a source: store in catalog order, nothing selected.
    pub fn load(source: Source, groups: Vec<GroupInfo>, items: Vec<Item>) -> Result<Self, CurationError> {
        let catalog = Catalog::new(source, groups, &items)?;
        let store = OrderedGroupStore::initialize(&items);
        Ok(SourceState {
            catalog,
            store,
            selection: SelectionSet::default(),
        })
    }

    pub fn source(&self) -> Source {
        self.catalog.source()
    }

    pub fn display(&self, group: &GroupKey) -> Vec<&Item> {
        resolver::resolve(group, &self.store, &self.selection, &self.catalog)
    }

    pub fn selected_display(&self, group: &GroupKey) -> Vec<&Item> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        resolver::resolve_selected(group, &self.store, &self.selection, &self.catalog)
    }

    fn toggle(&mut self, id: ItemId) -> Result<(), CurationError> {
        self.catalog.require(id)?;
        self.selection.toggle(id);
        Ok(())
    }

    fn move_item(&mut self, id: ItemId, direction: Direction) -> Result<(), CurationError> {
        let group = self.catalog.require(id)?.group;
        reorder::move_item(&mut self.store, &self.selection, &group, id, direction);
        Ok(())
    }

    fn append(&mut self, item: Item) -> Result<(), CurationError> {
        let (group, id) = (item.group, item.id);
        self.catalog.insert(item)?;
        self.store.append(group, id);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Toggle {
        source: Source,
        id: ItemId,
    },
    SelectAll {
        source: Source,
    },
    DeselectAll {
        source: Source,
    },
    Move {
        source: Source,
        id: ItemId,
        direction: Direction,
    },
    /// A newly created item, carrying the id assigned by the tracker.
    Append {
        item: Item,
    },
    /// A user edit, or the canonical text echoed back after a save.
    ReplaceText {
        source: Source,
        id: ItemId,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurationState {
    pub job_id: i64,
    pub research: SourceState,
    pub insights: SourceState,
    pub achievements: SourceState,
}

impl CurationState {
    pub fn source(&self, source: Source) -> &SourceState {
        match source {
            Source::Research => &self.research,
            Source::Insight => &self.insights,
            Source::Achievement => &self.achievements,
        }
    }

    fn source_mut(&mut self, source: Source) -> &mut SourceState {
        match source {
            Source::Research => &mut self.research,
            Source::Insight => &mut self.insights,
            Source::Achievement => &mut self.achievements,
        }
    }

    /// Applies `action` to a copy of the state and returns the copy.
    pub fn apply(&self, action: Action) -> Result<CurationState, CurationError> {
        let mut next = self.clone();
        match action {
            Action::Toggle { source, id } => next.source_mut(source).toggle(id)?,
            Action::SelectAll { source } => {
                let state = next.source_mut(source);
                let ids: Vec<ItemId> = state.catalog.ids().collect();
                state.selection.select_all(ids);
            }
            Action::DeselectAll { source } => next.source_mut(source).selection.deselect_all(),
            Action::Move {
                source,
                id,
                direction,
            } => next.source_mut(source).move_item(id, direction)?,
            Action::Append { item } => {
                let source = item.group.source();
                if source == Source::Insight {
                    return Err(CurationError::ReadOnlySource(source));
                }
                next.source_mut(source).append(item)?
            }
            Action::ReplaceText { source, id, text } => {
                if source == Source::Insight {
                    return Err(CurationError::ReadOnlySource(source));
                }
                next.source_mut(source).catalog.replace_text(id, text)?
            }
        }
        Ok(next)
    }

    pub fn payload(&self) -> CoverLetterInput {
        assemble(&self.research, &self.insights, &self.achievements)
    }
}
