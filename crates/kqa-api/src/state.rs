use std::sync::Arc;

use axum::extract::FromRef;
use kqa_genai::{GeminiClient, ImageProvider, QuestionProvider};

use crate::{ApiConfig, config::Environment, session::SessionStore};

#[derive(Clone)]
pub struct ApiState {
    pub questions: Arc<dyn QuestionProvider>,
    pub images: Arc<dyn ImageProvider>,
    pub sessions: SessionStore,
    pub environment: Environment,
}

impl ApiState {
    /// State backed by the Gemini client for both providers.
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = Arc::new(GeminiClient::new(config.gemini_config())?);
        tracing::debug!(
            question_model = %config.question_model,
            image_model = %config.image_model,
            "Gemini client configured"
        );

        Ok(Self::with_providers(client.clone(), client, config.env))
    }

    pub fn with_providers(
        questions: Arc<dyn QuestionProvider>,
        images: Arc<dyn ImageProvider>,
        environment: Environment,
    ) -> Self {
        Self {
            questions,
            images,
            sessions: SessionStore::new(),
            environment,
        }
    }
}

impl FromRef<ApiState> for SessionStore {
    fn from_ref(state: &ApiState) -> Self {
        state.sessions.clone()
    }
}
