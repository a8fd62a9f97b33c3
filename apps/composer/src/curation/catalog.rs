//! Item Catalog: read-only snapshot of the items one source contributes to a composition.
//!
//! Three sources feed a composition: research notes (grouped by category), role insights
//! (grouped by field) and work achievements (grouped by employer). Every item carries a
//! stable integer id and a group key that never changes after load.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curation::CurationError;

pub type ItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Research,
    Insight,
    Achievement,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Research, Source::Insight, Source::Achievement];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Research => "research",
            Source::Insight => "insight",
            Source::Achievement => "achievement",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Research note categories, encoded on the wire with the tracker's integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ResearchCategory {
    Responsibility,
    Requirement,
    CompanyResearch,
    RoleResearch,
}

impl ResearchCategory {
    pub const ALL: [ResearchCategory; 4] = [
        ResearchCategory::Responsibility,
        ResearchCategory::Requirement,
        ResearchCategory::CompanyResearch,
        ResearchCategory::RoleResearch,
    ];

    pub fn code(self) -> i32 {
        match self {
            ResearchCategory::Responsibility => 1,
            ResearchCategory::Requirement => 2,
            ResearchCategory::CompanyResearch => 3,
            ResearchCategory::RoleResearch => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResearchCategory::Responsibility => "Responsibilities",
            ResearchCategory::Requirement => "Requirements",
            ResearchCategory::CompanyResearch => "Company Research",
            ResearchCategory::RoleResearch => "Role Research",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            ResearchCategory::Responsibility => "responsibility",
            ResearchCategory::Requirement => "requirement",
            ResearchCategory::CompanyResearch => "company_research",
            ResearchCategory::RoleResearch => "role_research",
        }
    }
}

impl TryFrom<i32> for ResearchCategory {
    type Error = CurationError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        ResearchCategory::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or(CurationError::UnknownCategory(code))
    }
}

impl From<ResearchCategory> for i32 {
    fn from(category: ResearchCategory) -> Self {
        category.code()
    }
}

/// Fields extracted from the job description by the role-details workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightField {
    Responsibilities,
    Requirements,
}

impl InsightField {
    pub const ALL: [InsightField; 2] = [InsightField::Responsibilities, InsightField::Requirements];

    pub fn label(self) -> &'static str {
        match self {
            InsightField::Responsibilities => "Responsibilities",
            InsightField::Requirements => "Requirements",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            InsightField::Responsibilities => "responsibilities",
            InsightField::Requirements => "requirements",
        }
    }
}

/// The bucket an item belongs to. Each group has its own independent manipulation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum GroupKey {
    Research(ResearchCategory),
    Insight(InsightField),
    /// Work-experience record id.
    Employer(i64),
}

impl GroupKey {
    pub fn source(&self) -> Source {
        match self {
            GroupKey::Research(_) => Source::Research,
            GroupKey::Insight(_) => Source::Insight,
            GroupKey::Employer(_) => Source::Achievement,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Research(c) => write!(f, "research:{}", c.slug()),
            GroupKey::Insight(field) => write!(f, "insight:{}", field.slug()),
            GroupKey::Employer(id) => write!(f, "employer:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub group: GroupKey,
}

/// Identifies an item across sources. Research and achievement ids come from
/// different tables and may collide, so the source is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub source: Source,
    pub id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub key: GroupKey,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    source: Source,
    /// Declared groups in their fixed presentation order. Groups may be empty.
    groups: Vec<GroupInfo>,
    items: BTreeMap<ItemId, Item>,
}

impl Catalog {
    /// Builds a catalog, rejecting items whose group is foreign to `source`,
    /// undeclared, or whose id is already taken.
    pub fn new(source: Source, groups: Vec<GroupInfo>, items: &[Item]) -> Result<Self, CurationError> {
        if let Some(foreign) = groups.iter().find(|g| g.key.source() != source) {
            return Err(CurationError::WrongSource {
                expected: source,
                group: foreign.key,
            });
        }

        let mut catalog = Catalog {
            source,
            groups,
            items: BTreeMap::new(),
        };
        for item in items {
            catalog.insert(item.clone())?;
        }
        Ok(catalog)
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn groups(&self) -> &[GroupInfo] {
        &self.groups
    }

    pub fn group(&self, key: &GroupKey) -> Option<&GroupInfo> {
        self.groups.iter().find(|g| &g.key == key)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Like [`Catalog::get`], but an absent id is an error.
    pub fn require(&self, id: ItemId) -> Result<&Item, CurationError> {
        self.items.get(&id).ok_or(CurationError::UnknownItem {
            origin: self.source,
            id,
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Adds a newly created item. Its group must already be declared.
    pub fn insert(&mut self, item: Item) -> Result<(), CurationError> {
        if item.group.source() != self.source {
            return Err(CurationError::WrongSource {
                expected: self.source,
                group: item.group,
            });
        }
        if self.group(&item.group).is_none() {
            return Err(CurationError::UnknownGroup {
                origin: self.source,
                group: item.group,
            });
        }
        if self.items.contains_key(&item.id) {
            return Err(CurationError::DuplicateItem {
                origin: self.source,
                id: item.id,
            });
        }
        self.items.insert(item.id, item);
        Ok(())
    }

    /// Replaces an item's text. The group assignment is left untouched.
    pub fn replace_text(&mut self, id: ItemId, text: String) -> Result<(), CurationError> {
        let origin = self.source;
        let item = self
            .items
            .get_mut(&id)
            .ok_or(CurationError::UnknownItem { origin, id })?;
        item.text = text;
        Ok(())
    }
}
