use chrono::Utc;

use super::{Outcome, Pipeline, Precondition};
use crate::ai::RewriteRequest;
use crate::models::{timestamp_id, ArticleStatus, ArticleUpdate, RewriteRecord, RewriteStyle};

impl Pipeline {
    /// Rewrite an article in the given style. On success the record is appended
    /// to the history and the article is marked rewritten; its text is only
    /// replaced by [`Pipeline::apply_rewrite`].
    pub async fn rewrite(
        &self,
        article_id: Option<&str>,
        style: RewriteStyle,
        custom_prompt: Option<&str>,
    ) -> Outcome<RewriteRecord> {
        let Some(article_id) = article_id else {
            return Outcome::Skipped(Precondition::NoArticle);
        };
        let Some(article) = self.store.snapshot().article(article_id).cloned() else {
            return Outcome::Skipped(Precondition::ArticleNotFound(article_id.to_string()));
        };
        if article.status == ArticleStatus::Published {
            return Outcome::Skipped(Precondition::ArticleNotRewritable(article.id));
        }

        let _loading = self.loading();
        let directive = style.directive(custom_prompt);
        tracing::info!("Rewriting article {} ({})", article.id, style.name());

        let request = RewriteRequest {
            title: &article.title,
            content: &article.content,
            style,
            directive: &directive,
        };
        let output = match self.ai.rewrite(request).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Rewrite of article {} failed: {}", article.id, e);
                return Outcome::failed(e, None);
            }
        };

        let record = RewriteRecord {
            id: timestamp_id("rewrite"),
            article_id: article.id.clone(),
            original_title: article.title,
            rewritten_title: output.title,
            original_content: article.content,
            rewritten_content: output.content,
            style,
            custom_prompt: match style {
                RewriteStyle::Custom => custom_prompt.map(str::to_string),
                _ => None,
            },
            created_at: Utc::now(),
        };

        self.store.add_rewrite(record.clone());
        self.store
            .update_article(&article.id, ArticleUpdate::status(ArticleStatus::Rewritten));

        Outcome::Completed(record)
    }

    /// Replace the article's title and content with a rewrite result.
    pub fn apply_rewrite(&self, record: &RewriteRecord) -> Outcome<()> {
        match self.store.snapshot().article(&record.article_id) {
            None => {
                return Outcome::Skipped(Precondition::ArticleNotFound(record.article_id.clone()))
            }
            Some(article) if article.status == ArticleStatus::Published => {
                return Outcome::Skipped(Precondition::ArticleNotRewritable(article.id.clone()))
            }
            Some(_) => {}
        }

        self.store.update_article(
            &record.article_id,
            ArticleUpdate {
                title: Some(record.rewritten_title.clone()),
                content: Some(record.rewritten_content.clone()),
                status: Some(ArticleStatus::Rewritten),
                ..ArticleUpdate::default()
            },
        );
        Outcome::Completed(())
    }
}
