//! Payload Assembler: merges the three sources into the generation request body.
//!
//! Composition rules are fixed:
//! - company_research     = research "company research" ++ research "role research"
//! - job_responsibilities = research "responsibility" ++ insight "responsibilities"
//! - job_requirements     = research "requirement" ++ insight "requirements"
//! - candidate_experience = per work-experience record in catalog order, each selected
//!   achievement prefixed with the record's role/employer label
//!
//! Each list takes selected items only, in display order.

use serde::{Deserialize, Serialize};

use crate::curation::catalog::{GroupKey, InsightField, ResearchCategory};
use crate::curation::session::SourceState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterInput {
    pub candidate_experience: Vec<String>,
    pub company_research: Vec<String>,
    pub job_responsibilities: Vec<String>,
    pub job_requirements: Vec<String>,
}

impl CoverLetterInput {
    /// True when all four lists are empty.
    pub fn is_empty(&self) -> bool {
        self.candidate_experience.is_empty()
            && self.company_research.is_empty()
            && self.job_responsibilities.is_empty()
            && self.job_requirements.is_empty()
    }
}

pub fn assemble(
    research: &SourceState,
    insights: &SourceState,
    achievements: &SourceState,
) -> CoverLetterInput {
    let company_research = [
        (research, GroupKey::Research(ResearchCategory::CompanyResearch)),
        (research, GroupKey::Research(ResearchCategory::RoleResearch)),
    ];
    let job_responsibilities = [
        (research, GroupKey::Research(ResearchCategory::Responsibility)),
        (insights, GroupKey::Insight(InsightField::Responsibilities)),
    ];
    let job_requirements = [
        (research, GroupKey::Research(ResearchCategory::Requirement)),
        (insights, GroupKey::Insight(InsightField::Requirements)),
    ];

    CoverLetterInput {
        candidate_experience: candidate_experience(achievements),
        company_research: concat_selected(&company_research),
        job_responsibilities: concat_selected(&job_responsibilities),
        job_requirements: concat_selected(&job_requirements),
    }
}

/// Formats one achievement line for the generation prompt.
pub fn experience_line(label: &str, achievement: &str) -> String {
    format!("{label}: {achievement}")
}

fn concat_selected(parts: &[(&SourceState, GroupKey)]) -> Vec<String> {
    parts
        .iter()
        .flat_map(|(state, group)| state.selected_display(group))
        .map(|item| item.text.clone())
        .collect()
}

fn candidate_experience(achievements: &SourceState) -> Vec<String> {
    achievements
        .catalog
        .groups()
        .iter()
        .flat_map(|group| {
            achievements
                .selected_display(&group.key)
                .into_iter()
                .map(move |item| experience_line(&group.label, &item.text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curation::catalog::{GroupInfo, Source};
    use crate::curation::reorder::Direction;
    use crate::curation::session::tests::{insight_groups, item, research_groups, sample_state};
    use crate::curation::session::{Action, CurationState};

    fn toggle(state: CurationState, source: Source, ids: &[i64]) -> CurationState {
        ids.iter().fold(state, |state, &id| {
            state.apply(Action::Toggle { source, id }).unwrap()
        })
    }

    #[test]
    fn test_empty_selection_gives_empty_payload() {
        let payload = sample_state().payload();
        assert!(payload.is_empty());
        assert_eq!(payload, CoverLetterInput::default());
    }

    #[test]
    fn test_requirements_concatenate_research_then_insights() {
        let req = GroupKey::Research(ResearchCategory::Requirement);
        let insight_req = GroupKey::Insight(InsightField::Requirements);
        let research = SourceState::load(
            Source::Research,
            research_groups(),
            vec![item(1, "r1", req), item(2, "r2", req), item(3, "r3", req)],
        )
        .unwrap();
        let insights = SourceState::load(
            Source::Insight,
            insight_groups(),
            vec![item(10, "i1", insight_req), item(11, "i2", insight_req)],
        )
        .unwrap();
        let mut state = sample_state();
        state.research = research;
        state.insights = insights;

        let state = toggle(state, Source::Research, &[1, 2]);
        let state = toggle(state, Source::Insight, &[10]);

        assert_eq!(state.payload().job_requirements, vec!["r1", "r2", "i1"]);
    }

    #[test]
    fn test_company_research_precedes_role_research() {
        let company = GroupKey::Research(ResearchCategory::CompanyResearch);
        let role = GroupKey::Research(ResearchCategory::RoleResearch);
        let mut state = sample_state();
        // Role research listed first in the catalog; composition order is still fixed.
        state.research = SourceState::load(
            Source::Research,
            research_groups(),
            vec![item(1, "Team of 6", role), item(2, "Series C", company)],
        )
        .unwrap();

        let state = toggle(state, Source::Research, &[1, 2]);
        assert_eq!(state.payload().company_research, vec!["Series C", "Team of 6"]);
    }

    #[test]
    fn test_responsibilities_follow_display_order() {
        let state = toggle(sample_state(), Source::Insight, &[10]);
        let resp = GroupKey::Research(ResearchCategory::Responsibility);
        let mut state = state;
        state.research = SourceState::load(
            Source::Research,
            research_groups(),
            vec![item(1, "Own on-call", resp), item(2, "Lead design", resp)],
        )
        .unwrap();
        let state = toggle(state, Source::Research, &[2, 1]);
        let state = state
            .apply(Action::Move {
                source: Source::Research,
                id: 2,
                direction: Direction::Up,
            })
            .unwrap();

        assert_eq!(
            state.payload().job_responsibilities,
            vec!["Lead design", "Own on-call", "Design APIs"]
        );
    }

    #[test]
    fn test_candidate_experience_walks_records_in_catalog_order() {
        let state = toggle(sample_state(), Source::Achievement, &[30, 21, 20]);
        assert_eq!(
            state.payload().candidate_experience,
            vec![
                "Senior Engineer at Acme: Cut p99 latency by 40%",
                "Senior Engineer at Acme: Led queue migration",
                "Engineer at Initech: Built billing exports",
            ]
        );
    }

    #[test]
    fn test_unselected_achievement_contributes_nothing() {
        let state = toggle(sample_state(), Source::Achievement, &[21]);
        let payload = state.payload();
        assert_eq!(
            payload.candidate_experience,
            vec!["Senior Engineer at Acme: Led queue migration"]
        );
        assert!(!payload
            .candidate_experience
            .iter()
            .any(|line| line.contains("Built billing exports") || line.contains("p99")));
    }

    #[test]
    fn test_no_unselected_text_appears_anywhere() {
        let state = toggle(sample_state(), Source::Research, &[2, 4]);
        let state = toggle(state, Source::Insight, &[11]);
        let state = toggle(state, Source::Achievement, &[30]);
        let payload = state.payload();

        let emitted: Vec<&String> = payload
            .candidate_experience
            .iter()
            .chain(&payload.company_research)
            .chain(&payload.job_responsibilities)
            .chain(&payload.job_requirements)
            .collect();

        for source in Source::ALL {
            let source_state = state.source(source);
            for id in source_state.catalog.ids() {
                if source_state.selection.is_selected(id) {
                    continue;
                }
                let text = &source_state.catalog.get(id).unwrap().text;
                assert!(
                    !emitted.iter().any(|line| line.contains(text.as_str())),
                    "unselected '{text}' leaked into payload"
                );
            }
        }
        assert_eq!(payload.job_requirements, vec!["Postgres tuning", "Distributed systems"]);
        assert_eq!(payload.company_research, vec!["Team owns payments"]);
    }

    #[test]
    fn test_empty_employer_group_is_skipped() {
        let mut state = sample_state();
        state.achievements = SourceState::load(
            Source::Achievement,
            vec![
                GroupInfo {
                    key: GroupKey::Employer(1),
                    label: "Intern at Hooli".to_string(),
                },
                GroupInfo {
                    key: GroupKey::Employer(2),
                    label: "Engineer at Pied Piper".to_string(),
                },
            ],
            vec![item(7, "Compression benchmarks", GroupKey::Employer(2))],
        )
        .unwrap();
        let state = toggle(state, Source::Achievement, &[7]);
        assert_eq!(
            state.payload().candidate_experience,
            vec!["Engineer at Pied Piper: Compression benchmarks"]
        );
    }

    #[test]
    fn test_payload_serializes_with_generation_field_names() {
        let payload = CoverLetterInput {
            candidate_experience: vec!["a".to_string()],
            ..CoverLetterInput::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "candidate_experience": ["a"],
                "company_research": [],
                "job_responsibilities": [],
                "job_requirements": []
            })
        );
    }
}
