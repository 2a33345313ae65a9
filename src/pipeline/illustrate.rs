use chrono::Utc;
use futures::future::join_all;
use regex::Regex;

use super::{Outcome, Pipeline, Precondition};
use crate::models::{random_id, GeneratedImage, ImageStatus, ImageUpdate};

const KEYWORD_SEPARATORS: &str = r"[，。！？；：\s]+";
const KEYWORD_COUNT: usize = 5;

/// Illustration prompt derived from the first few words of a paragraph.
pub fn image_prompt(paragraph: &str, title: &str) -> String {
    let keywords: Vec<&str> = match Regex::new(KEYWORD_SEPARATORS) {
        Ok(re) => re
            .split(paragraph)
            .filter(|w| !w.is_empty())
            .take(KEYWORD_COUNT)
            .collect(),
        Err(_) => paragraph.split_whitespace().take(KEYWORD_COUNT).collect(),
    };

    format!(
        "Create a professional illustration for the article \"{}\", keywords: {}, style: modern and minimal, suitable for an official account post",
        title,
        keywords.join(" ")
    )
}

impl Pipeline {
    /// Generate an image for a whole article, or for one of its paragraphs.
    ///
    /// A `generating` placeholder is stored before the image service is called
    /// and is updated in place once it answers.
    pub async fn illustrate(
        &self,
        article_id: Option<&str>,
        paragraph: Option<usize>,
        custom_prompt: Option<&str>,
    ) -> Outcome<GeneratedImage> {
        let Some(article_id) = article_id else {
            return Outcome::Skipped(Precondition::NoArticle);
        };
        let Some(article) = self.store.snapshot().article(article_id).cloned() else {
            return Outcome::Skipped(Precondition::ArticleNotFound(article_id.to_string()));
        };

        let target = match paragraph {
            Some(index) => match article.paragraphs().get(index) {
                Some(text) => text.to_string(),
                None => return Outcome::Skipped(Precondition::ParagraphOutOfRange(index)),
            },
            None => article.content.clone(),
        };
        let prompt = match custom_prompt.map(str::trim) {
            Some(custom) if !custom.is_empty() => custom.to_string(),
            _ => image_prompt(&target, &article.title),
        };

        let _loading = self.loading();

        let placeholder = GeneratedImage {
            id: random_id("img"),
            article_id: article.id.clone(),
            url: String::new(),
            prompt: prompt.clone(),
            associated_paragraph: paragraph,
            created_at: Utc::now(),
            status: ImageStatus::Generating,
        };
        let image_id = placeholder.id.clone();
        self.store.add_generated_image(placeholder);
        tracing::info!("Generating image {} for article {}", image_id, article.id);

        match self.ai.generate_image(&prompt).await {
            Ok(url) => {
                self.store
                    .update_generated_image(&image_id, ImageUpdate::completed(url));
                self.settled_image(&image_id)
            }
            Err(e) => {
                tracing::warn!("Image {} failed: {}", image_id, e);
                self.store
                    .update_generated_image(&image_id, ImageUpdate::failed());
                Outcome::failed(e, Some(image_id))
            }
        }
    }

    /// Illustrate several paragraphs at once. Results come back in the order
    /// requested; the store sees them in whatever order they settle.
    pub async fn illustrate_paragraphs(
        &self,
        article_id: &str,
        paragraphs: &[usize],
    ) -> Vec<Outcome<GeneratedImage>> {
        join_all(
            paragraphs
                .iter()
                .map(|&index| self.illustrate(Some(article_id), Some(index), None)),
        )
        .await
    }

    /// Generate a new image for an existing record, reusing its prompt.
    pub async fn regenerate_image(&self, image_id: &str) -> Outcome<GeneratedImage> {
        let Some(image) = self.store.snapshot().image(image_id).cloned() else {
            return Outcome::Skipped(Precondition::ImageNotFound(image_id.to_string()));
        };

        self.store
            .update_generated_image(&image.id, ImageUpdate::generating());

        match self.ai.regenerate_image(&image.prompt).await {
            Ok(url) => {
                self.store
                    .update_generated_image(&image.id, ImageUpdate::completed(url));
                self.settled_image(&image.id)
            }
            Err(e) => {
                tracing::warn!("Regenerating image {} failed: {}", image.id, e);
                self.store
                    .update_generated_image(&image.id, ImageUpdate::failed());
                Outcome::failed(e, Some(image.id))
            }
        }
    }

    pub fn delete_image(&self, image_id: &str) {
        self.store.delete_generated_image(image_id);
    }

    fn settled_image(&self, image_id: &str) -> Outcome<GeneratedImage> {
        match self.store.snapshot().image(image_id) {
            Some(image) => Outcome::Completed(image.clone()),
            // Deleted while generating
            None => Outcome::Skipped(Precondition::ImageNotFound(image_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_test::{assert_pending, assert_ready};

    use super::*;
    use crate::error::ServiceError;
    use crate::pipeline::testing::*;

    #[test]
    fn prompt_uses_first_five_words() {
        let prompt = image_prompt("One two\tThree  four\nfive six seven", "Title");

        assert!(prompt.contains("\"Title\""));
        assert!(prompt.contains("keywords: One two Three four five,"));
        assert!(!prompt.contains("six"));
    }

    #[test]
    fn ascii_punctuation_stays_inside_words() {
        let prompt = image_prompt("v1.2 is out, hello", "T");
        assert!(prompt.contains("keywords: v1.2 is out, hello, style"));

        let prompt = image_prompt("See https://example.com/a?b=1 now", "T");
        assert!(prompt.contains("keywords: See https://example.com/a?b=1 now,"));
    }

    #[test]
    fn prompt_splits_on_full_width_punctuation() {
        let prompt = image_prompt("人工智能，内容创作。科技！", "T");
        assert!(prompt.contains("keywords: 人工智能 内容创作 科技,"));
    }

    #[tokio::test(start_paused = true)]
    async fn placeholder_is_visible_before_the_delay() {
        let store = store();
        let pipeline = simulated(&store);

        let mut task = tokio_test::task::spawn(pipeline.illustrate(Some("a"), None, None));
        assert_pending!(task.poll());

        let state = store.snapshot();
        assert_eq!(state.generated_images.len(), 1);
        let placeholder = state.generated_images[0].clone();
        assert_eq!(placeholder.status, ImageStatus::Generating);
        assert!(placeholder.url.is_empty());
        assert!(state.is_loading);

        tokio::time::advance(Duration::from_secs(5)).await;
        let image = match assert_ready!(task.poll()) {
            Outcome::Completed(image) => image,
            other => panic!("unexpected outcome {:?}", other),
        };

        assert_eq!(image.id, placeholder.id);
        let state = store.snapshot();
        assert_eq!(state.generated_images.len(), 1);
        let settled = state.image(&placeholder.id).unwrap();
        assert_eq!(settled.status, ImageStatus::Completed);
        assert!(!settled.url.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn paragraph_images_keep_their_index() {
        let store = store();
        let pipeline = simulated(&store);

        let outcomes = pipeline.illustrate_paragraphs("a", &[1, 0]).await;

        assert!(outcomes.iter().all(Outcome::is_completed));
        let state = store.snapshot();
        let mut indices: Vec<Option<usize>> = state
            .images_for("a")
            .iter()
            .map(|i| i.associated_paragraph)
            .collect();
        indices.sort();
        assert_eq!(indices, vec![Some(0), Some(1)]);
        assert!(state.images_for("a")[0].prompt.contains("keywords:"));
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_paragraph_is_skipped() {
        let store = store();
        let pipeline = simulated(&store);

        let outcome = pipeline.illustrate(Some("a"), Some(9), None).await;

        assert_eq!(outcome, Outcome::Skipped(Precondition::ParagraphOutOfRange(9)));
        assert!(store.snapshot().generated_images.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn custom_prompt_overrides_derived_one() {
        let store = store();
        let pipeline = simulated(&store);

        let image = pipeline
            .illustrate(Some("a"), None, Some("a red crab"))
            .await
            .completed()
            .unwrap();

        assert_eq!(image.prompt, "a red crab");
        assert!(image.url.ends_with("query=a%20red%20crab"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_marks_placeholder_failed() {
        let store = store();
        let pipeline = failing(&store);

        let outcome = pipeline.illustrate(Some("a"), Some(0), None).await;

        let Outcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert!(matches!(
            failure.reason,
            ServiceError::ContentPolicyRejected(_)
        ));
        let state = store.snapshot();
        let image = state.image(failure.record_id.as_deref().unwrap()).unwrap();
        assert_eq!(image.status, ImageStatus::Failed);
        assert!(image.url.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn regenerate_updates_in_place() {
        let store = store();
        let pipeline = simulated(&store);
        let first = pipeline
            .illustrate(Some("a"), None, None)
            .await
            .completed()
            .unwrap();

        let second = pipeline
            .regenerate_image(&first.id)
            .await
            .completed()
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.prompt, first.prompt);
        assert!(second.url.contains("&v="));
        assert_eq!(store.snapshot().generated_images.len(), 1);

        pipeline.delete_image(&first.id);
        assert_eq!(
            pipeline.regenerate_image(&first.id).await,
            Outcome::Skipped(Precondition::ImageNotFound(first.id.clone()))
        );
    }
}
