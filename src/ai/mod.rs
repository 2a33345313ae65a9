mod rewriter;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::RewriteStyle;

pub use rewriter::SimulatedAi;

pub struct RewriteRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub style: RewriteStyle,
    pub directive: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutput {
    pub title: String,
    pub content: String,
}

/// Text rewriting and image generation.
#[async_trait]
pub trait AiService: Send + Sync {
    async fn rewrite(&self, request: RewriteRequest<'_>) -> Result<RewriteOutput, ServiceError>;

    /// Returns a reference to the generated image.
    async fn generate_image(&self, prompt: &str) -> Result<String, ServiceError>;

    async fn regenerate_image(&self, prompt: &str) -> Result<String, ServiceError> {
        self.generate_image(prompt).await
    }
}
