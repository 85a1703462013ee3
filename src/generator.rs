//! AI-assisted draft generation.
//!
//! The rest of the application only sees [`ContentGenerator`]: a title goes
//! in, a markdown draft comes out. [`GeminiGenerator`] implements it over the
//! Gemini `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Config, NewsError, Result};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Produces a markdown article body for a headline.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Fails on an empty title, a transport failure or an upstream rejection.
    async fn generate(&self, title: &str) -> Result<String>;
}

/// Builds the instruction sent to the model for a given headline
pub fn article_prompt(title: &str) -> String {
    format!(
        "Write a compelling and informative crypto news article about \"{}\". \
         The article should be well-structured with a clear introduction, a detailed body \
         discussing the key points, and a concluding summary. Use markdown for formatting, \
         including headings, bold text, and bullet points where appropriate. The tone should \
         be professional and suitable for crypto enthusiasts and investors.",
        title
    )
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini-backed generator.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Builds a generator from the application configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or(NewsError::MissingApiKey)?;
        Ok(Self::new(api_key, config.generation_timeout())?.with_model(&config.gemini_model))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the client at another endpoint root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    async fn generate(&self, title: &str) -> Result<String> {
        if title.trim().is_empty() {
            return Err(NewsError::Generation {
                message: "Title cannot be empty.".to_string(),
            });
        }

        info!("Generating article content for '{}' with {}", title, self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(article_prompt(title)),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Error calling generation endpoint: {}", e);
                NewsError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Generation endpoint answered {} ({} bytes)", status, body.len());

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(api_error) => api_error.error.message,
                Err(_) => body,
            };
            error!("Generation rejected with status {}: {}", status, message);
            return Err(NewsError::Generation {
                message: format!("upstream returned {}: {}", status.as_u16(), message),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        parsed.into_text().ok_or_else(|| NewsError::Generation {
            message: "response contained no text".to_string(),
        })
    }
}
