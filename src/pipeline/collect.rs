use chrono::Utc;

use super::{Outcome, Pipeline, Precondition};
use crate::models::{timestamp_id, Article, ArticleStatus, Platform};
use crate::services::SourceItem;

impl Pipeline {
    /// Search a platform. Results are returned to the caller, not stored;
    /// hand them to [`Pipeline::import`] to keep them.
    pub async fn collect(&self, platform: Option<Platform>, keyword: &str) -> Outcome<Vec<Article>> {
        let Some(platform) = platform else {
            return Outcome::Skipped(Precondition::NoPlatform);
        };

        let _loading = self.loading();
        tracing::info!("Collecting from {} (keyword '{}')", platform, keyword);

        match self.source.search(platform, keyword).await {
            Ok(items) => {
                let prefix = timestamp_id("collected");
                let articles: Vec<Article> = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| to_article(format!("{}-{}", prefix, i + 1), platform, item))
                    .collect();
                tracing::info!("Collected {} articles from {}", articles.len(), platform);
                Outcome::Completed(articles)
            }
            Err(e) => {
                tracing::warn!("Collection from {} failed: {}", platform, e);
                Outcome::failed(e, None)
            }
        }
    }

    /// Append collected articles to the store in the order given.
    pub fn import(&self, articles: Vec<Article>) -> Outcome<usize> {
        if articles.is_empty() {
            return Outcome::Skipped(Precondition::NothingToImport);
        }
        let count = articles.len();
        self.store.add_articles(articles);
        Outcome::Completed(count)
    }
}

fn to_article(id: String, platform: Platform, item: SourceItem) -> Article {
    Article {
        id,
        title: item.title,
        content: item.body,
        source: platform.label().to_string(),
        source_url: item.url,
        author: item.author,
        publish_time: item.publish_time,
        collect_time: Utc::now(),
        tags: item.tags,
        category: item.category,
        read_count: item.read_count,
        like_count: item.like_count,
        status: ArticleStatus::Pending,
    }
}
