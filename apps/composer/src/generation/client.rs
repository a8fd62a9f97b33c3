//! Generation client: the single point of entry for cover letter generation requests.
//!
//! The service accepts batches (`job_application_ids` / `cover_letter_inputs` are parallel
//! arrays); the composer always sends a batch of one.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::curation::assembler::CoverLetterInput;
use crate::generation::{CoverLetterGenerator, GenerationError, GenerationOutcome};

const GENERATE_COVER_LETTER_PATH: &str = "/job_application/generate_cover_letter";

#[derive(Debug, Serialize)]
struct GenerateCoverLetterRequest<'a> {
    job_application_ids: [i64; 1],
    cover_letter_inputs: [&'a CoverLetterInput; 1],
}

#[derive(Debug, Deserialize)]
struct GenerateCoverLetterResponse {
    message: String,
    #[serde(default)]
    cover_letters: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    endpoint: String,
}

impl GenerationClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GenerationError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                GENERATE_COVER_LETTER_PATH
            ),
        })
    }
}

#[async_trait]
impl CoverLetterGenerator for GenerationClient {
    async fn generate(
        &self,
        job_id: i64,
        input: &CoverLetterInput,
    ) -> Result<GenerationOutcome, GenerationError> {
        let request_body = GenerateCoverLetterRequest {
            job_application_ids: [job_id],
            cover_letter_inputs: [input],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Generation service returned {}: {}", status, body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let outcome = parse_outcome(&body)?;
        debug!(
            "Generation for job {job_id} finished: {} (letter: {})",
            outcome.message,
            outcome.cover_letter.is_some()
        );
        Ok(outcome)
    }
}

fn parse_outcome(body: &str) -> Result<GenerationOutcome, GenerationError> {
    let response: GenerateCoverLetterResponse = serde_json::from_str(body)?;
    Ok(GenerationOutcome {
        message: response.message,
        cover_letter: response
            .cover_letters
            .and_then(|letters| letters.into_iter().next()),
    })
}

/// Extracts `{"error": "..."}` when present, otherwise returns the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string())
}
