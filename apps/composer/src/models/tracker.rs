//! Records served by the job tracker. Only the fields the composer reads are modelled;
//! unknown fields are ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::curation::catalog::ResearchCategory;

/// Workflow name of the role-details extraction whose output feeds the insight source.
pub const EXTRACT_ROLE_DETAILS: &str = "extract_role_details";

/// Lists stored from model output may come back as `null`; treat that like a missing key.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: i64,
    pub job_title: String,
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub workflows: Vec<WorkflowRecord>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub research_data: Vec<ResearchNoteRow>,
}

/// A workflow attached to a job. Only role-details workflows carry the two lists;
/// other workflow kinds deserialize with them empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub workflow_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub responsibilities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub requirements: Vec<String>,
}

impl WorkflowRecord {
    pub fn is_role_details(&self) -> bool {
        self.workflow_name == EXTRACT_ROLE_DETAILS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchNoteRow {
    pub id: i64,
    pub category: ResearchCategory,
    pub info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkExperienceRecord {
    pub id: i64,
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub work_achievements: Vec<AchievementRow>,
}

impl WorkExperienceRecord {
    /// Role/employer label prefixed to each achievement sent for generation.
    pub fn label(&self) -> String {
        format!("{} at {}", self.job_title, self.company_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRow {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Deserialize)]
pub struct WorkExperiencesResponse {
    pub work_experiences: Vec<WorkExperienceRecord>,
}
