//! Tracker client: HTTP access to the job tracker's JSON endpoints.
//!
//! Write endpoints answer with an envelope `{success, error?, <record>}`; a `success: false`
//! body is a rejection regardless of the status code. No call here is retried: failed
//! writes are reported to the user, who retries by editing again.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curation::catalog::{ItemId, ResearchCategory};
use crate::models::tracker::{
    AchievementRow, JobRecord, JobsResponse, ResearchNoteRow, WorkExperienceRecord,
    WorkExperiencesResponse,
};
use crate::persistence::{ItemStore, TrackerError};

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    research_data: Option<ResearchNoteRow>,
    #[serde(default)]
    work_achievement: Option<AchievementRow>,
}

#[derive(Debug, Serialize)]
struct AddResearchNoteBody<'a> {
    category: ResearchCategory,
    info: &'a str,
}

#[derive(Debug, Serialize)]
struct ResearchInfoBody<'a> {
    info: &'a str,
}

#[derive(Debug, Serialize)]
struct AchievementBody<'a> {
    description: &'a str,
}

#[derive(Clone)]
pub struct TrackerClient {
    client: Client,
    base_url: String,
}

impl TrackerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TrackerError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, TrackerError> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TrackerError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn write<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<Envelope, TrackerError> {
        let response = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        read_envelope(response).await
    }
}

async fn read_envelope(response: Response) -> Result<Envelope, TrackerError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    debug!("Tracker responded {status}: {} bytes", body.len());
    parse_envelope(status, &body)
}

fn parse_envelope(status: u16, body: &str) -> Result<Envelope, TrackerError> {
    let success_status = (200..300).contains(&status);
    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) if !envelope.success => Err(TrackerError::Rejected(
            envelope
                .error
                .unwrap_or_else(|| "no reason given".to_string()),
        )),
        Ok(envelope) if success_status => Ok(envelope),
        _ => Err(TrackerError::Api {
            status,
            message: body.to_string(),
        }),
    }
}

#[async_trait]
impl ItemStore for TrackerClient {
    async fn load_job(&self, job_id: i64) -> Result<JobRecord, TrackerError> {
        let response: JobsResponse = self.get_json("/api/jobs/").await?;
        response
            .jobs
            .into_iter()
            .find(|job| job.id == job_id)
            .ok_or(TrackerError::JobNotFound(job_id))
    }

    async fn load_work_experiences(&self) -> Result<Vec<WorkExperienceRecord>, TrackerError> {
        let response: WorkExperiencesResponse = self.get_json("/api/work-experiences/").await?;
        Ok(response.work_experiences)
    }

    async fn add_research_note(
        &self,
        job_id: i64,
        category: ResearchCategory,
        info: &str,
    ) -> Result<ResearchNoteRow, TrackerError> {
        let envelope = self
            .write(
                Method::POST,
                &format!("/add_research_data/{job_id}/"),
                &AddResearchNoteBody { category, info },
            )
            .await?;
        envelope
            .research_data
            .ok_or(TrackerError::MissingField("research_data"))
    }

    async fn add_achievement(
        &self,
        experience_id: i64,
        description: &str,
    ) -> Result<AchievementRow, TrackerError> {
        let envelope = self
            .write(
                Method::POST,
                &format!("/add_work_achievement/{experience_id}/"),
                &AchievementBody { description },
            )
            .await?;
        envelope
            .work_achievement
            .ok_or(TrackerError::MissingField("work_achievement"))
    }

    async fn update_research_note(&self, id: ItemId, info: &str) -> Result<ResearchNoteRow, TrackerError> {
        let envelope = self
            .write(
                Method::PUT,
                &format!("/update_research_data/{id}/"),
                &ResearchInfoBody { info },
            )
            .await?;
        envelope
            .research_data
            .ok_or(TrackerError::MissingField("research_data"))
    }

    async fn update_achievement(
        &self,
        id: ItemId,
        description: &str,
    ) -> Result<AchievementRow, TrackerError> {
        let envelope = self
            .write(
                Method::PUT,
                &format!("/update_work_achievement/{id}/"),
                &AchievementBody { description },
            )
            .await?;
        envelope
            .work_achievement
            .ok_or(TrackerError::MissingField("work_achievement"))
    }
}
