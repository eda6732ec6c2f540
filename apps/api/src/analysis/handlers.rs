//! Axum route handler for the CV processing endpoint.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::pipeline::{CvSubmission, Pipeline, ProcessCvResponse};
use crate::errors::AppError;
use crate::extraction::PDF_MEDIA_TYPE;
use crate::state::AppState;

/// A file part as it arrived, before validation.
#[derive(Debug)]
pub struct UploadedFile {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Raw multipart fields. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct CvUploadForm {
    pub job_description: Option<String>,
    pub cv_file: Option<UploadedFile>,
}

impl CvUploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = CvUploadForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(String::from);
            match name.as_deref() {
                Some("jobDescription") => form.job_description = Some(field.text().await?),
                Some("cvFile") => {
                    let content_type = field.content_type().map(String::from);
                    let bytes = field.bytes().await?;
                    form.cv_file = Some(UploadedFile {
                        content_type,
                        bytes,
                    });
                }
                _ => {}
            }
        }
        Ok(form)
    }

    /// Checks, in order: job description present, file present, file is a PDF.
    pub fn validate(self) -> Result<CvSubmission, AppError> {
        let job_description = self
            .job_description
            .filter(|jd| !jd.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;

        let cv_file = self
            .cv_file
            .ok_or_else(|| AppError::Validation("CV file is required".to_string()))?;

        if !is_pdf_media_type(cv_file.content_type.as_deref()) {
            return Err(AppError::Validation("CV file must be a PDF".to_string()));
        }

        Ok(CvSubmission {
            job_description,
            cv_document: cv_file.bytes,
        })
    }
}

/// Compares the media type essence, ignoring parameters and case.
fn is_pdf_media_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
}

/// POST /api/process-cv
///
/// Multipart fields `jobDescription` (text) and `cvFile` (PDF). Analyzes the job
/// description, extracts the CV text, and returns a rewritten CV.
pub async fn handle_process_cv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessCvResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("process_cv", %request_id);

    async move {
        let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
        let submission = CvUploadForm::from_multipart(multipart).await?.validate()?;

        let pipeline = Pipeline {
            llm: state.llm.as_ref(),
            extractor: state.extractor.as_ref(),
            completion: &state.config.completion,
        };
        let response = pipeline.run(submission).await?;

        info!("CV processing complete");
        Ok::<_, AppError>(Json(response))
    }
    .instrument(span)
    .await
}
