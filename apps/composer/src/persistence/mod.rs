//! Persistence collaborator: everything that talks to the job tracker.
//!
//! The curation engine never persists its own selection or ordering. What does get
//! persisted is item text: new research notes and achievements, and debounced edits.

pub mod debounce;
pub mod tracker_client;

use async_trait::async_trait;
use thiserror::Error;

use crate::curation::catalog::{GroupKey, Item, ItemId, ItemKey, ResearchCategory, Source};
use crate::models::tracker::{AchievementRow, JobRecord, ResearchNoteRow, WorkExperienceRecord};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tracker API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Tracker rejected the request: {0}")]
    Rejected(String),

    #[error("Job application {0} not found")]
    JobNotFound(i64),

    #[error("Tracker response is missing '{0}'")]
    MissingField(&'static str),

    #[error("The {0} source cannot be written to the tracker")]
    Unsupported(Source),
}

/// The tracker operations the composer depends on.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn load_job(&self, job_id: i64) -> Result<JobRecord, TrackerError>;

    async fn load_work_experiences(&self) -> Result<Vec<WorkExperienceRecord>, TrackerError>;

    async fn add_research_note(
        &self,
        job_id: i64,
        category: ResearchCategory,
        info: &str,
    ) -> Result<ResearchNoteRow, TrackerError>;

    async fn add_achievement(
        &self,
        experience_id: i64,
        description: &str,
    ) -> Result<AchievementRow, TrackerError>;

    async fn update_research_note(&self, id: ItemId, info: &str) -> Result<ResearchNoteRow, TrackerError>;

    async fn update_achievement(
        &self,
        id: ItemId,
        description: &str,
    ) -> Result<AchievementRow, TrackerError>;
}

/// Creates an item in `group` and returns it with its tracker-assigned id.
pub async fn create_item(
    store: &dyn ItemStore,
    job_id: i64,
    group: GroupKey,
    text: &str,
) -> Result<Item, TrackerError> {
    match group {
        GroupKey::Research(category) => {
            let row = store.add_research_note(job_id, category, text).await?;
            Ok(Item {
                id: row.id,
                text: row.info,
                group: GroupKey::Research(row.category),
            })
        }
        GroupKey::Employer(experience_id) => {
            let row = store.add_achievement(experience_id, text).await?;
            Ok(Item {
                id: row.id,
                text: row.description,
                group,
            })
        }
        GroupKey::Insight(_) => Err(TrackerError::Unsupported(Source::Insight)),
    }
}

/// Persists an edited text and returns the canonical text stored by the tracker.
pub async fn save_item_text(store: &dyn ItemStore, key: ItemKey, text: &str) -> Result<String, TrackerError> {
    match key.source {
        Source::Research => Ok(store.update_research_note(key.id, text).await?.info),
        Source::Achievement => Ok(store.update_achievement(key.id, text).await?.description),
        Source::Insight => Err(TrackerError::Unsupported(Source::Insight)),
    }
}
