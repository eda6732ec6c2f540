use thiserror::Error;

/// Upstream error codes that identify a missing deployment or resource.
const NOT_FOUND_CODES: [&str; 3] = ["DeploymentNotFound", "ResourceNotFound", "404"];
/// Upstream error codes that identify a rejected or missing API key.
const AUTH_CODES: [&str; 3] = ["InvalidAPIKey", "PermissionDenied", "401"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Completion client configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Coarse bucket an upstream failure falls into, used to shape the error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamFailure {
    NotFound,
    AuthFailure,
    Generic,
}

impl LlmError {
    /// HTTP status reported by the completion service, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            LlmError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Error code reported by the completion service, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            LlmError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Classifies the failure. Typed status and codes win; message substrings
    /// are only consulted when neither identifies the failure, and are matched
    /// case-insensitively.
    pub fn classify(&self) -> UpstreamFailure {
        let code = self.code();
        let status = self.status();

        if status == Some(404) || code.is_some_and(|c| NOT_FOUND_CODES.contains(&c)) {
            return UpstreamFailure::NotFound;
        }
        if status == Some(401) || code.is_some_and(|c| AUTH_CODES.contains(&c)) {
            return UpstreamFailure::AuthFailure;
        }

        let message = self.to_string().to_lowercase();
        if message.contains("not found") {
            UpstreamFailure::NotFound
        } else if message.contains("authenticate") || message.contains("api key") {
            UpstreamFailure::AuthFailure
        } else {
            UpstreamFailure::Generic
        }
    }
}
