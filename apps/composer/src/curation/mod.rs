// Curation engine: selection, per-group ordering and payload assembly for cover letter composition.
// Pure data transforms only. No I/O here; persistence and generation live in their own modules.

pub mod assembler;
pub mod catalog;
pub mod load;
pub mod reorder;
pub mod resolver;
pub mod selection;
pub mod session;
pub mod store;
pub mod view;

use thiserror::Error;

use crate::curation::catalog::{GroupKey, ItemId, Source};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurationError {
    #[error("Unknown research category {0}")]
    UnknownCategory(i32),

    #[error("Item {id} not found in {origin} catalog")]
    UnknownItem { origin: Source, id: ItemId },

    #[error("Item {id} already exists in {origin} catalog")]
    DuplicateItem { origin: Source, id: ItemId },

    #[error("Group {group} is not part of the {origin} catalog")]
    UnknownGroup { origin: Source, group: GroupKey },

    #[error("Group {group} does not belong to the {expected} source")]
    WrongSource { expected: Source, group: GroupKey },

    #[error("The {0} source is read-only")]
    ReadOnlySource(Source),
}
