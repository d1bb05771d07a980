use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use log::error;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// DeepL client for the DeepL translation REST API
#[derive(Debug, Clone)]
pub struct DeepL {
    /// API key for authentication
    api_key: String,
    /// Base URL of the DeepL API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
}

/// Translation request for the DeepL API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLRequest {
    /// Texts to translate
    text: Vec<String>,
    /// Target language code (uppercase ISO 639-1)
    target_lang: String,
    /// Source language code (uppercase ISO 639-1)
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
    /// How to handle sentence splitting
    #[serde(skip_serializing_if = "Option::is_none")]
    split_sentences: Option<String>,
    /// Whether to preserve formatting hints in the input
    #[serde(skip_serializing_if = "Option::is_none")]
    preserve_formatting: Option<bool>,
}

impl DeepLRequest {
    /// Create a new translation request
    pub fn new(text: impl Into<String>, target_lang: &str) -> Self {
        Self {
            text: vec![text.into()],
            target_lang: target_lang.to_uppercase(),
            source_lang: None,
            split_sentences: None,
            preserve_formatting: Some(true),
        }
    }

    /// Set the source language (auto-detected when unset)
    pub fn source_lang(mut self, source_lang: &str) -> Self {
        self.source_lang = Some(source_lang.to_uppercase());
        self
    }
}

/// Translation response from the DeepL API
#[derive(Debug, Serialize, Deserialize)]
pub struct DeepLResponse {
    /// One entry per input text
    pub translations: Vec<DeepLTranslation>,
}

/// A single translated text with detection metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct DeepLTranslation {
    /// Language DeepL detected for the source text
    #[serde(default)]
    pub detected_source_language: Option<String>,
    /// Translated text
    pub text: String,
}

/// Account usage response, used for connection testing
#[derive(Debug, Deserialize)]
struct UsageResponse {
    character_count: u64,
    character_limit: u64,
}

impl DeepL {
    /// Create a new DeepL client with configuration
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: endpoint.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
            rate_limit,
        }
    }

    /// Classify an error response status. Server errors and rate limiting
    /// are retryable; client errors are not.
    fn error_for_status(status: u16, message: String) -> ProviderError {
        match status {
            401 | 403 => ProviderError::AuthenticationError(message),
            // 456 is DeepL's "quota exceeded" status
            429 | 456 => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError {
                status_code: status,
                message,
            },
        }
    }

    fn is_retryable(error: &ProviderError) -> bool {
        match error {
            ProviderError::ConnectionError(_) | ProviderError::RateLimitExceeded(_) => true,
            ProviderError::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    /// Send a translation request with retry and exponential backoff
    async fn translate_with_retry(
        &self,
        request: &DeepLRequest,
    ) -> Result<DeepLResponse, ProviderError> {
        let url = format!("{}/v2/translate", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            // Pace requests when a client-side rate limit is configured
            if let Some(rate_limit) = self.rate_limit {
                if attempt > 0 && rate_limit > 0 {
                    let delay_ms = 60_000 / u64::from(rate_limit);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            let response_result = self
                .client
                .post(&url)
                .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
                .json(request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<DeepLResponse>().await.map_err(|e| {
                            ProviderError::ParseError(format!(
                                "Failed to parse DeepL response: {}",
                                e
                            ))
                        });
                    }

                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());
                    let err = Self::error_for_status(status.as_u16(), message);
                    if !Self::is_retryable(&err) {
                        error!("DeepL API error ({}): {}", status, err);
                        return Err(err);
                    }
                    error!(
                        "DeepL API error ({}) - attempt {}/{}",
                        status,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(err);
                }
                Err(e) => {
                    error!(
                        "DeepL network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "DeepL request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }
}

#[async_trait]
impl Provider for DeepL {
    type Request = DeepLRequest;
    type Response = DeepLResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.translate_with_retry(&request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/v2/usage", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(Self::error_for_status(status.as_u16(), message));
        }

        let usage: UsageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Invalid usage response: {}", e)))?;

        if usage.character_count >= usage.character_limit {
            return Err(ProviderError::RateLimitExceeded(format!(
                "DeepL character quota exhausted ({}/{})",
                usage.character_count, usage.character_limit
            )));
        }

        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response
            .translations
            .first()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }
}
