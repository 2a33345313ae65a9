use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moves forward only: pending -> rewritten -> published. Nothing enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Pending,
    Rewritten,
    Published,
}

impl ArticleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ArticleStatus::Pending => "Pending",
            ArticleStatus::Rewritten => "Rewritten",
            ArticleStatus::Published => "Published",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ArticleStatus::Pending => ArticleStatus::Rewritten,
            ArticleStatus::Rewritten => ArticleStatus::Published,
            ArticleStatus::Published => ArticleStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub source: String,
    pub source_url: String,
    pub author: String,
    pub publish_time: DateTime<Utc>,
    pub collect_time: DateTime<Utc>,
    pub tags: Vec<String>,
    pub category: String,
    pub read_count: u64,
    pub like_count: u64,
    pub status: ArticleStatus,
}

impl Article {
    /// Non-blank lines of the content. Image paragraph indices point into this list.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content
            .split('\n')
            .filter(|p| !p.trim().is_empty())
            .collect()
    }
}

/// Shallow field overwrite for an [`Article`]; `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub read_count: Option<u64>,
    pub like_count: Option<u64>,
    pub status: Option<ArticleStatus>,
}

impl ArticleUpdate {
    pub fn status(status: ArticleStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply(self, article: &mut Article) {
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(content) = self.content {
            article.content = content;
        }
        if let Some(source) = self.source {
            article.source = source;
        }
        if let Some(source_url) = self.source_url {
            article.source_url = source_url;
        }
        if let Some(author) = self.author {
            article.author = author;
        }
        if let Some(tags) = self.tags {
            article.tags = tags;
        }
        if let Some(category) = self.category {
            article.category = category;
        }
        if let Some(read_count) = self.read_count {
            article.read_count = read_count;
        }
        if let Some(like_count) = self.like_count {
            article.like_count = like_count;
        }
        if let Some(status) = self.status {
            article.status = status;
        }
    }
}

/// Materials view filter. Empty/`None` criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub search: String,
    pub source: Option<String>,
    pub status: Option<ArticleStatus>,
    pub category: Option<String>,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        let matches_search = article
            .title
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let matches_source = self.source.as_ref().map_or(true, |s| &article.source == s);
        let matches_status = self.status.map_or(true, |s| article.status == s);
        let matches_category = self
            .category
            .as_ref()
            .map_or(true, |c| &article.category == c);

        matches_search && matches_source && matches_status && matches_category
    }

    /// Cycle the status criterion: all -> pending -> rewritten -> published -> all
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(ArticleStatus::Pending),
            Some(ArticleStatus::Pending) => Some(ArticleStatus::Rewritten),
            Some(ArticleStatus::Rewritten) => Some(ArticleStatus::Published),
            Some(ArticleStatus::Published) => None,
        };
    }

    pub fn label(&self) -> &'static str {
        self.status.map(|s| s.label()).unwrap_or("All")
    }
}
