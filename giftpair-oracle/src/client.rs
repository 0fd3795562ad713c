use std::time::Duration;

use crate::error::{OracleError, OracleResult};
use crate::protocol::{ChatRequest, ChatResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_COPY_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the chat-completions service.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: String,
    /// Base URL up to and including the API version, no trailing slash.
    pub base_url: String,
    /// Model used to rate pairings.
    pub judge_model: String,
    /// Model used to write listing copy.
    pub copy_model: String,
    pub timeout: Duration,
}

impl OracleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            judge_model: DEFAULT_JUDGE_MODEL.to_string(),
            copy_model: DEFAULT_COPY_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_judge_model(mut self, model: impl Into<String>) -> Self {
        self.judge_model = model.into();
        self
    }

    pub fn with_copy_model(mut self, model: impl Into<String>) -> Self {
        self.copy_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Thin chat-completions client shared by the judge and the copywriter.
pub struct ChatClient {
    config: OracleConfig,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: OracleConfig) -> OracleResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(OracleError::MissingApiKey);
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Send one request and return the first choice's text.
    pub async fn complete(&self, request: &ChatRequest) -> OracleResult<String> {
        let url = self.config.completions_url();
        log::debug!("POST {} model={}", url, request.model);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::warn!("chat service returned {} for model={}", status, request.model);
            return Err(OracleError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let decoded: ChatResponse = serde_json::from_str(&body)?;
        decoded.first_content()
    }
}
