// Generation collaborator: hands the composed payload to the cover letter service.
// One request per explicit submit. Never retried here; the user resubmits.

pub mod client;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::curation::assembler::CoverLetterInput;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What the generation service answered for one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub message: String,
    /// `None` when the service already holds a cover letter for this job.
    pub cover_letter: Option<String>,
}

#[async_trait]
pub trait CoverLetterGenerator: Send + Sync {
    async fn generate(
        &self,
        job_id: i64,
        input: &CoverLetterInput,
    ) -> Result<GenerationOutcome, GenerationError>;
}
