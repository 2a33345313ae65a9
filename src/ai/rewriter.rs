use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::{AiService, RewriteOutput, RewriteRequest};
use crate::error::ServiceError;
use crate::models::RewriteStyle;

const REWRITE_DELAY: Duration = Duration::from_secs(3);
const IMAGE_DELAY: Duration = Duration::from_secs(4);
const REGENERATE_DELAY: Duration = Duration::from_secs(3);

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=400&width=600";

/// Stand-in for the rewrite/image model. Always succeeds after a fixed delay.
pub struct SimulatedAi {
    model: String,
}

impl SimulatedAi {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    fn image_url(prompt: &str) -> String {
        format!(
            "{}&query={}",
            PLACEHOLDER_IMAGE,
            urlencoding::encode(prompt)
        )
    }
}

fn rewritten_title(title: &str, style: RewriteStyle) -> String {
    format!("{} ({} rewrite)", title, style.name())
}

fn rewritten_content(content: &str, style: RewriteStyle) -> String {
    format!(
        "{}\n\n[AI rewrite]\nRewritten in the {} style. The core points of the original are kept while wording and structure are tuned.\n\nKey changes:\n- Core information unchanged\n- Clearer language and logical flow\n- Adapted to the target readers\n- More engaging and readable",
        content,
        style.name()
    )
}

#[async_trait]
impl AiService for SimulatedAi {
    async fn rewrite(&self, request: RewriteRequest<'_>) -> Result<RewriteOutput, ServiceError> {
        tracing::debug!(
            "Rewriting '{}' with {} ({})",
            request.title,
            self.model,
            request.directive
        );
        tokio::time::sleep(REWRITE_DELAY).await;

        Ok(RewriteOutput {
            title: rewritten_title(request.title, request.style),
            content: rewritten_content(request.content, request.style),
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, ServiceError> {
        tokio::time::sleep(IMAGE_DELAY).await;
        Ok(Self::image_url(prompt))
    }

    async fn regenerate_image(&self, prompt: &str) -> Result<String, ServiceError> {
        tokio::time::sleep(REGENERATE_DELAY).await;
        Ok(format!(
            "{}&v={}",
            Self::image_url(prompt),
            Utc::now().timestamp_millis()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn rewrite_substitutes_style_into_template() {
        let ai = SimulatedAi::new("gpt-4");
        let output = ai
            .rewrite(RewriteRequest {
                title: "Title",
                content: "Body",
                style: RewriteStyle::Friendly,
                directive: "plain words",
            })
            .await
            .unwrap();

        assert_eq!(output.title, "Title (Friendly rewrite)");
        assert!(output.content.starts_with("Body\n\n[AI rewrite]"));
        assert!(output.content.contains("Friendly style"));
    }

    #[tokio::test(start_paused = true)]
    async fn image_url_encodes_prompt() {
        let ai = SimulatedAi::new("gpt-4");
        let url = ai.generate_image("a cat & a dog").await.unwrap();

        assert_eq!(
            url,
            "/placeholder.svg?height=400&width=600&query=a%20cat%20%26%20a%20dog"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn regenerated_url_is_versioned() {
        let ai = SimulatedAi::new("gpt-4");
        let url = ai.regenerate_image("cat").await.unwrap();

        assert!(url.starts_with("/placeholder.svg?height=400&width=600&query=cat&v="));
    }

    #[tokio::test(start_paused = true)]
    async fn generation_waits_for_the_fixed_delay() {
        let ai = SimulatedAi::new("gpt-4");
        let start = tokio::time::Instant::now();

        ai.generate_image("x").await.unwrap();

        assert!(start.elapsed() >= IMAGE_DELAY);
    }
}
