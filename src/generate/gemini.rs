//! Gemini generateContent client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

use super::TextGenerator;
use crate::config::GenerationConfig;
use crate::error::{ApiError, Result};

/// Gemini API base URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini text generation client
pub struct GeminiClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: RequestConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct RequestConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Create a client; `host` overrides the production API base URL
    /// (for development/testing)
    pub fn with_host(
        api_key: String,
        config: &GenerationConfig,
        host: Option<String>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            // Backstop only; the pipeline enforces the generation deadline
            .timeout(Duration::from_secs(45))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: host.unwrap_or_else(|| API_BASE_URL.to_string()),
            api_key,
            model: config.model.clone(),
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: RequestConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let data: GenerateResponse = response.json().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;

                let text: String = data
                    .candidates
                    .into_iter()
                    .filter_map(|c| c.content)
                    .flat_map(|c| c.parts)
                    .map(|p| p.text)
                    .collect();

                if text.trim().is_empty() {
                    return Err(
                        ApiError::InvalidResponse("Empty generation response".to_string()).into(),
                    );
                }
                Ok(text)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized.into()),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimit.into()),
            StatusCode::BAD_REQUEST => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => Err(ApiError::InvalidResponse(format!("Unexpected status code: {}", status)).into()),
        }
    }
}
