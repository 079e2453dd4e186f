//! Generative AI client for KidQuiz Adventure
//!
//! Questions and illustrations come from an external generation service. This
//! crate defines the two capabilities the quiz consumes, [`QuestionProvider`]
//! and [`ImageProvider`], and implements both on top of the Gemini
//! `generateContent` REST endpoint.

pub mod error;
pub mod gemini;
pub mod models;
pub mod prompt;

use async_trait::async_trait;
use kqa_quiz::{Category, Image, QuestionDraft};

pub use error::ProviderError;
pub use gemini::{GeminiClient, GeminiConfig};

/// Generates a batch of quiz questions for a category.
///
/// Records are returned as untrusted drafts; callers validate them with
/// [`kqa_quiz::BatchReport::from_drafts`] before use.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    async fn generate_questions(
        &self,
        category: Category,
    ) -> Result<Vec<QuestionDraft>, ProviderError>;
}

/// Draws an illustration from a free text description.
///
/// `Ok(None)` means the service answered without an image.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(&self, description: &str) -> Result<Option<Image>, ProviderError>;
}
