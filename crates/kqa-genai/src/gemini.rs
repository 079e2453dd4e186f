//! Gemini implementation of the question and image providers.

use std::{
    fmt,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use kqa_quiz::{Category, Image, QuestionDraft};

use crate::{
    ImageProvider, QuestionProvider,
    error::ProviderError,
    models::{GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig},
    prompt,
};

/// Default public endpoint of the Gemini API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_QUESTION_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Longest error body kept in a [`ProviderError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub question_model: String,
    pub image_model: String,
    /// Upper bound for one generation call, connection included.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            question_model: DEFAULT_QUESTION_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("question_model", &self.question_model)
            .field("image_model", &self.image_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("kidquiz-adventure/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let started = Instant::now();

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generateContent call finished"
        );

        if !status.is_success() {
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl QuestionProvider for GeminiClient {
    async fn generate_questions(
        &self,
        category: Category,
    ) -> Result<Vec<QuestionDraft>, ProviderError> {
        let request = GenerateContentRequest::from_text(prompt::question_prompt(category))
            .with_config(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(prompt::question_response_schema()),
                ..Default::default()
            });

        let response = self.generate(&self.config.question_model, &request).await?;
        parse_questions(&response)
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    async fn generate_image(&self, description: &str) -> Result<Option<Image>, ProviderError> {
        let request = GenerateContentRequest::from_text(prompt::image_prompt(description))
            .with_config(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: "1:1".to_string(),
                }),
                ..Default::default()
            });

        let response = self.generate(&self.config.image_model, &request).await?;
        parse_image(&response)
    }
}

/// Extract the question array from a model response.
///
/// The model is asked for bare JSON, but a fenced ```json block is accepted too.
pub fn parse_questions(
    response: &GenerateContentResponse,
) -> Result<Vec<QuestionDraft>, ProviderError> {
    let text = response.first_text().ok_or(ProviderError::EmptyResponse)?;
    Ok(serde_json::from_str(strip_code_fence(&text))?)
}

/// Decode the first inline image of a model response.
pub fn parse_image(response: &GenerateContentResponse) -> Result<Option<Image>, ProviderError> {
    let Some(inline) = response.first_inline_data() else {
        return Ok(None);
    };

    let data = STANDARD.decode(inline.data.trim())?;
    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(Image {
        mime_type: inline.mime_type.clone(),
        data,
    }))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") up to the end of the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
