use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

use super::{ContentSource, SourceItem};
use crate::error::ServiceError;
use crate::models::Platform;

const COLLECT_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_KEYWORD: &str = "Trending";

/// Synthesizes two articles per search after a fixed delay.
#[derive(Debug, Default)]
pub struct SimulatedContentSource;

impl SimulatedContentSource {
    pub fn new() -> Self {
        Self
    }

    fn synthesize(keyword: &str) -> Vec<SourceItem> {
        let keyword = if keyword.trim().is_empty() {
            DEFAULT_KEYWORD
        } else {
            keyword.trim()
        };
        let mut rng = rand::rng();
        let now = Utc::now();

        vec![
            SourceItem {
                title: format!("{} - Latest Industry Developments", keyword),
                body: "Fresh content collected for this keyword...".to_string(),
                author: "Industry Expert".to_string(),
                url: "https://example.com/collected1".to_string(),
                publish_time: now,
                read_count: rng.random_range(0..10_000),
                like_count: rng.random_range(0..1_000),
                tags: vec![
                    keyword.to_string(),
                    "Industry".to_string(),
                    "Updates".to_string(),
                ],
                category: "Industry News".to_string(),
            },
            SourceItem {
                title: format!("In Depth: Where {} Is Heading", keyword),
                body: "A close look at current market trends and where they lead...".to_string(),
                author: "Senior Analyst".to_string(),
                url: "https://example.com/collected2".to_string(),
                publish_time: now,
                read_count: rng.random_range(0..10_000),
                like_count: rng.random_range(0..1_000),
                tags: vec![
                    keyword.to_string(),
                    "Trends".to_string(),
                    "Analysis".to_string(),
                ],
                category: "Deep Analysis".to_string(),
            },
        ]
    }
}

#[async_trait]
impl ContentSource for SimulatedContentSource {
    async fn search(
        &self,
        platform: Platform,
        keyword: &str,
    ) -> Result<Vec<SourceItem>, ServiceError> {
        tracing::debug!("Searching {} for '{}'", platform, keyword);
        tokio::time::sleep(COLLECT_DELAY).await;
        Ok(Self::synthesize(keyword))
    }
}
