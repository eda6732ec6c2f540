//! Request orchestration: analyze → extract → optimize, strictly in sequence.
//!
//! Every stage failure becomes an `AppError` right where it happens; nothing
//! is retried and nothing runs after the first failure.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::analyzer::{analyze_job_description, AnalysisOutcome};
use crate::analysis::optimizer::optimize_cv;
use crate::config::CompletionConfig;
use crate::errors::AppError;
use crate::extraction::TextExtractor;
use crate::llm_client::CompletionService;

/// A validated upload: non-blank job description plus PDF bytes.
#[derive(Debug, Clone)]
pub struct CvSubmission {
    pub job_description: String,
    pub cv_document: Bytes,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessCvResponse {
    pub success: bool,
    pub job_analysis: AnalysisOutcome,
    #[serde(rename = "originalCV")]
    pub original_cv: String,
    #[serde(rename = "optimizedCV")]
    pub optimized_cv: String,
}

/// Collaborators the pipeline needs, borrowed from `AppState` for one request.
pub struct Pipeline<'a> {
    pub llm: &'a dyn CompletionService,
    pub extractor: &'a dyn TextExtractor,
    pub completion: &'a CompletionConfig,
}

impl Pipeline<'_> {
    pub async fn run(&self, submission: CvSubmission) -> Result<ProcessCvResponse, AppError> {
        info!("Analyzing job description ({} chars)", submission.job_description.len());
        let job_analysis = analyze_job_description(&submission.job_description, self.llm)
            .await
            .map_err(|source| AppError::Upstream {
                source,
                expected_url: self.completion.chat_completions_url(),
            })?
            .ok_or_else(|| AppError::EmptyResult("Failed to analyze job description".to_string()))?;

        info!("Extracting text from CV ({} bytes)", submission.cv_document.len());
        let original_cv = self.extractor.extract_text(submission.cv_document).await?;
        if original_cv.trim().is_empty() {
            warn!("CV extraction produced no text");
            return Err(AppError::EmptyResult(
                "Failed to extract text from CV".to_string(),
            ));
        }

        info!("Optimizing CV against job analysis");
        let optimized_cv = optimize_cv(&job_analysis, &original_cv, self.llm)
            .await
            .map_err(AppError::Optimization)?;

        Ok(ProcessCvResponse {
            success: true,
            job_analysis,
            original_cv,
            optimized_cv,
        })
    }
}
