use std::fmt;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2024-12-01-preview";
const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("Environment variable '{key}' is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Connection settings for the Azure OpenAI chat completions deployment.
#[derive(Clone)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
    pub model: String,
    pub timeout: Duration,
}

impl CompletionConfig {
    /// `{endpoint}/openai/deployments/{deployment}`, without a trailing slash on the endpoint.
    pub fn deployment_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}",
            self.endpoint.trim_end_matches('/'),
            self.deployment
        )
    }

    /// The full chat completions URL, including the `api-version` query parameter.
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions?api-version={}",
            self.deployment_url(),
            self.api_version
        )
    }
}

// The API key never reaches logs.
impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub completion: CompletionConfig,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    /// Blank values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let completion = CompletionConfig {
            endpoint: require("AZURE_OPENAI_ENDPOINT")?,
            api_key: require("AZURE_OPENAI_API_KEY")?,
            deployment: require("AZURE_OPENAI_DEPLOYMENT_NAME")?,
            api_version: get("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            model: get("AZURE_OPENAI_MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            timeout: Duration::from_secs(parse_or(
                get("COMPLETION_TIMEOUT_SECS"),
                "COMPLETION_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        };

        Ok(Config {
            completion,
            max_upload_bytes: parse_or(
                get("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            port: parse_or(get("PORT"), "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        completion: CompletionConfig {
            endpoint: "https://tailor-test.openai.azure.com/".to_string(),
            api_key: "test-key".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            deployment: "gpt-4o-mini-deploy".to_string(),
            model: DEFAULT_MODEL_NAME.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        },
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        port: 8080,
        rust_log: "info".to_string(),
    }
}
