//! Builds a fresh curation state from tracker records.

use crate::curation::catalog::{GroupInfo, GroupKey, InsightField, Item, ResearchCategory, Source};
use crate::curation::session::{CurationState, SourceState};
use crate::curation::CurationError;
use crate::models::tracker::{JobRecord, WorkExperienceRecord};

/// Builds the state for composing a cover letter for `job`. Nothing is selected.
pub fn build_state(
    job: &JobRecord,
    experiences: &[WorkExperienceRecord],
) -> Result<CurationState, CurationError> {
    Ok(CurationState {
        job_id: job.id,
        research: research_state(job)?,
        insights: insight_state(job)?,
        achievements: achievement_state(experiences)?,
    })
}

fn research_state(job: &JobRecord) -> Result<SourceState, CurationError> {
    let groups = ResearchCategory::ALL
        .into_iter()
        .map(|category| GroupInfo {
            key: GroupKey::Research(category),
            label: category.label().to_string(),
        })
        .collect();

    let items = job
        .research_data
        .iter()
        .map(|note| Item {
            id: note.id,
            text: note.info.clone(),
            group: GroupKey::Research(note.category),
        })
        .collect();

    SourceState::load(Source::Research, groups, items)
}

/// Insight items have no server id. Ids are minted sequentially from 1: all
/// responsibilities first, then all requirements, walking role-details workflows in order.
fn insight_state(job: &JobRecord) -> Result<SourceState, CurationError> {
    let groups = InsightField::ALL
        .into_iter()
        .map(|field| GroupInfo {
            key: GroupKey::Insight(field),
            label: field.label().to_string(),
        })
        .collect();

    let role_details: Vec<_> = job.workflows.iter().filter(|w| w.is_role_details()).collect();
    let responsibilities = role_details.iter().flat_map(|w| {
        w.responsibilities
            .iter()
            .map(|text| (InsightField::Responsibilities, text))
    });
    let requirements = role_details.iter().flat_map(|w| {
        w.requirements
            .iter()
            .map(|text| (InsightField::Requirements, text))
    });

    let items = responsibilities
        .chain(requirements)
        .zip(1..)
        .map(|((field, text), id)| Item {
            id,
            text: text.clone(),
            group: GroupKey::Insight(field),
        })
        .collect();

    SourceState::load(Source::Insight, groups, items)
}

fn achievement_state(experiences: &[WorkExperienceRecord]) -> Result<SourceState, CurationError> {
    let groups = experiences
        .iter()
        .map(|record| GroupInfo {
            key: GroupKey::Employer(record.id),
            label: record.label(),
        })
        .collect();

    let items = experiences
        .iter()
        .flat_map(|record| {
            record.work_achievements.iter().map(move |achievement| Item {
                id: achievement.id,
                text: achievement.description.clone(),
                group: GroupKey::Employer(record.id),
            })
        })
        .collect();

    SourceState::load(Source::Achievement, groups, items)
}
