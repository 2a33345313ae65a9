use serde::Serialize;

use crate::models::{
    AppConfig, Article, ArticleFilter, ArticleStatus, GeneratedImage, ImageStatus,
    PublicationRecord, PublicationStatus, RewriteRecord, WeChatAccount,
};

pub const DEFAULT_MODULE: &str = "dashboard";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub articles: Vec<Article>,
    pub rewrites: Vec<RewriteRecord>,
    pub publications: Vec<PublicationRecord>,
    pub accounts: Vec<WeChatAccount>,
    pub generated_images: Vec<GeneratedImage>,
    pub config: AppConfig,

    // UI State
    pub current_module: String,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_articles: usize,
    pub pending_articles: usize,
    pub rewritten_articles: usize,
    pub published_articles: usize,
    pub total_rewrites: usize,
    pub total_illustrations: usize,
    pub total_publications: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub pending: usize,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            articles: Vec::new(),
            rewrites: Vec::new(),
            publications: Vec::new(),
            accounts: Vec::new(),
            generated_images: Vec::new(),
            config,
            current_module: DEFAULT_MODULE.to_string(),
            is_loading: false,
        }
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn image(&self, id: &str) -> Option<&GeneratedImage> {
        self.generated_images.iter().find(|i| i.id == id)
    }

    pub fn account(&self, id: &str) -> Option<&WeChatAccount> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Articles that can still be rewritten (anything not yet published).
    pub fn rewritable_articles(&self) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|a| a.status != ArticleStatus::Published)
            .collect()
    }

    pub fn publishable_articles(&self) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|a| a.status == ArticleStatus::Rewritten)
            .collect()
    }

    pub fn connected_accounts(&self) -> Vec<&WeChatAccount> {
        self.accounts.iter().filter(|a| a.is_connected).collect()
    }

    pub fn images_for(&self, article_id: &str) -> Vec<&GeneratedImage> {
        self.generated_images
            .iter()
            .filter(|i| i.article_id == article_id)
            .collect()
    }

    pub fn completed_images_for(&self, article_id: &str) -> Vec<&GeneratedImage> {
        self.generated_images
            .iter()
            .filter(|i| i.article_id == article_id && i.status == ImageStatus::Completed)
            .collect()
    }

    /// Rewrite history for an article, newest first.
    pub fn rewrites_for(&self, article_id: &str) -> Vec<&RewriteRecord> {
        let mut rewrites: Vec<&RewriteRecord> = self
            .rewrites
            .iter()
            .filter(|r| r.article_id == article_id)
            .collect();
        rewrites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rewrites
    }

    pub fn filter_articles(&self, filter: &ArticleFilter) -> Vec<&Article> {
        self.articles.iter().filter(|a| filter.matches(a)).collect()
    }

    /// Distinct article sources in first-seen order.
    pub fn sources(&self) -> Vec<&str> {
        distinct(self.articles.iter().map(|a| a.source.as_str()))
    }

    pub fn categories(&self) -> Vec<&str> {
        distinct(self.articles.iter().map(|a| a.category.as_str()))
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        let count = |status: ArticleStatus| {
            self.articles
                .iter()
                .filter(|a| a.status == status)
                .count()
        };
        DashboardStats {
            total_articles: self.articles.len(),
            pending_articles: count(ArticleStatus::Pending),
            rewritten_articles: count(ArticleStatus::Rewritten),
            published_articles: count(ArticleStatus::Published),
            total_rewrites: self.rewrites.len(),
            total_illustrations: self.generated_images.len(),
            total_publications: self.publications.len(),
        }
    }

    pub fn publish_stats(&self) -> PublishStats {
        let count = |status: PublicationStatus| {
            self.publications
                .iter()
                .filter(|p| p.status == status)
                .count()
        };
        PublishStats {
            total: self.publications.len(),
            successful: count(PublicationStatus::Success),
            failed: count(PublicationStatus::Failed),
            pending: count(PublicationStatus::Pending),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;
    use chrono::{Duration, Utc};

    fn seeded() -> AppState {
        AppState {
            articles: seed::articles(),
            accounts: seed::accounts(),
            ..AppState::new(AppConfig::default())
        }
    }

    #[test]
    fn stats_count_by_status() {
        let stats = seeded().dashboard_stats();

        assert_eq!(stats.total_articles, 3);
        assert_eq!(stats.pending_articles, 1);
        assert_eq!(stats.rewritten_articles, 1);
        assert_eq!(stats.published_articles, 1);
        assert_eq!(stats.total_publications, 0);
    }

    #[test]
    fn workflow_views_filter_by_status() {
        let state = seeded();

        let rewritable: Vec<&str> = state
            .rewritable_articles()
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        let publishable: Vec<&str> = state
            .publishable_articles()
            .iter()
            .map(|a| a.id.as_str())
            .collect();

        assert_eq!(rewritable, vec!["1", "2"]);
        assert_eq!(publishable, vec!["2"]);
    }

    #[test]
    fn rewrite_history_is_newest_first() {
        let mut state = seeded();
        let now = Utc::now();
        for (id, age) in [("old", 10), ("new", 1), ("mid", 5)] {
            state.rewrites.push(RewriteRecord {
                id: id.to_string(),
                article_id: "1".to_string(),
                original_title: String::new(),
                rewritten_title: String::new(),
                original_content: String::new(),
                rewritten_content: String::new(),
                style: Default::default(),
                custom_prompt: None,
                created_at: now - Duration::minutes(age),
            });
        }

        let order: Vec<&str> = state
            .rewrites_for("1")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
        assert!(state.rewrites_for("2").is_empty());
    }

    #[test]
    fn distinct_sources_keep_first_seen_order() {
        let mut state = seeded();
        let mut duplicate = state.articles[0].clone();
        duplicate.id = "4".to_string();
        state.articles.push(duplicate);

        assert_eq!(state.sources().len(), 3);
        assert_eq!(state.sources()[0], state.articles[0].source);
        assert_eq!(state.categories().len(), 3);
    }
}
