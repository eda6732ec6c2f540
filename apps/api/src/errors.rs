use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::{LlmError, UpstreamFailure};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// The job-description analysis call failed. Carries the URL the client
    /// was configured to hit so operators can spot a misconfigured deployment.
    #[error("{source}")]
    Upstream {
        source: LlmError,
        expected_url: String,
    },

    /// The upstream call succeeded but produced nothing usable.
    #[error("{0}")]
    EmptyResult(String),

    #[error("Error extracting text from CV: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Optimization(LlmError),
}

/// Wire shape of every error response: `{ error, details? }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<ErrorDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetails {
    message: String,
    code: String,
    suggested_action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_url: Option<String>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::Upstream { source, .. } => source
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::EmptyResult(_) | AppError::Extraction(_) | AppError::Optimization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        let AppError::Upstream {
            source,
            expected_url,
        } = self
        else {
            return ErrorBody {
                error: self.to_string(),
                details: None,
            };
        };

        let message = source.to_string();
        let code = source.code().unwrap_or("ERROR").to_string();

        match source.classify() {
            UpstreamFailure::NotFound => ErrorBody {
                error: "Azure OpenAI Resource Not Found: Please check your deployment configuration."
                    .to_string(),
                details: Some(ErrorDetails {
                    message,
                    code,
                    suggested_action: "Verify that the deployment exists in Azure and that the endpoint URL is correct",
                    expected_url: Some(expected_url.clone()),
                }),
            },
            UpstreamFailure::AuthFailure => ErrorBody {
                error: "Azure OpenAI Authentication Error: Invalid or missing API key.".to_string(),
                details: Some(ErrorDetails {
                    message,
                    code,
                    suggested_action: "Check that your API key is correct and active",
                    expected_url: None,
                }),
            },
            UpstreamFailure::Generic => ErrorBody {
                error: message.clone(),
                details: Some(ErrorDetails {
                    message,
                    code,
                    suggested_action: "Check the error details and Azure OpenAI configuration",
                    expected_url: Some(expected_url.clone()),
                }),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed ({status}): {self}");
        } else {
            tracing::warn!("Request rejected ({status}): {self}");
        }

        (status, Json(self.body())).into_response()
    }
}
