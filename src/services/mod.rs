mod publisher;
mod source;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ServiceError;
use crate::models::{Platform, WeChatAccount};

pub use publisher::SimulatedPublisher;
pub use source::SimulatedContentSource;

/// One search hit from a content platform.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceItem {
    pub title: String,
    pub body: String,
    pub author: String,
    pub url: String,
    pub publish_time: DateTime<Utc>,
    pub read_count: u64,
    pub like_count: u64,
    pub tags: Vec<String>,
    pub category: String,
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn search(
        &self,
        platform: Platform,
        keyword: &str,
    ) -> Result<Vec<SourceItem>, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub remote_id: String,
    pub view_count: u64,
    pub like_count: u64,
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        account: &WeChatAccount,
        title: &str,
        body: &str,
        images: &[String],
    ) -> Result<PublishReceipt, ServiceError>;

    /// Connectivity check for an account.
    async fn probe(&self, account: &WeChatAccount) -> Result<(), ServiceError>;
}
