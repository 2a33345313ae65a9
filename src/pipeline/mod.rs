//! Pipeline simulators: collect, rewrite, illustrate, publish.
//!
//! Each operation checks its preconditions, raises the store's loading flag,
//! optionally inserts a placeholder record, awaits the collaborator and then
//! settles the store. Collaborator errors end up as record state and a
//! [`Outcome::Failed`]; nothing here returns `Err`.

mod accounts;
mod collect;
mod illustrate;
mod publish;
mod rewrite;

use std::sync::Arc;

use thiserror::Error;

use crate::ai::{AiService, SimulatedAi};
use crate::error::ServiceError;
use crate::services::{ContentSource, Publisher, SimulatedContentSource, SimulatedPublisher};
use crate::store::Store;


/// Why an operation did not start. The store is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    #[error("No platform selected")]
    NoPlatform,

    #[error("No article selected")]
    NoArticle,

    #[error("Article {0} not found")]
    ArticleNotFound(String),

    #[error("Article {0} is already published")]
    ArticleNotRewritable(String),

    #[error("Article {0} has not been rewritten yet")]
    ArticleNotPublishable(String),

    #[error("No account selected")]
    NoAccount,

    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("Account {0} is not connected")]
    AccountNotConnected(String),

    #[error("Account name and app id are required")]
    IncompleteAccount,

    #[error("Image {0} not found")]
    ImageNotFound(String),

    #[error("Paragraph {0} does not exist")]
    ParagraphOutOfRange(usize),

    #[error("Nothing to import")]
    NothingToImport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub reason: ServiceError,
    /// Record left in the failed state, if the operation created one.
    pub record_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Skipped(Precondition),
    Completed(T),
    Failed(Failure),
}

impl<T> Outcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    fn failed(reason: ServiceError, record_id: Option<String>) -> Self {
        Outcome::Failed(Failure { reason, record_id })
    }
}

/// Raises the loading flag for its lifetime.
struct Loading<'a> {
    store: &'a Store,
}

impl<'a> Loading<'a> {
    fn start(store: &'a Store) -> Self {
        store.set_is_loading(true);
        Self { store }
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.store.set_is_loading(false);
    }
}

#[derive(Clone)]
pub struct Pipeline {
    store: Store,
    source: Arc<dyn ContentSource>,
    ai: Arc<dyn AiService>,
    publisher: Arc<dyn Publisher>,
}

impl Pipeline {
    pub fn new(
        store: Store,
        source: Arc<dyn ContentSource>,
        ai: Arc<dyn AiService>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            store,
            source,
            ai,
            publisher,
        }
    }

    /// Pipeline backed by the timer-driven stand-ins.
    pub fn simulated(store: Store) -> Self {
        let model = store.snapshot().config.ai_model.clone();
        Self::new(
            store,
            Arc::new(SimulatedContentSource::new()),
            Arc::new(SimulatedAi::new(model)),
            Arc::new(SimulatedPublisher::new()),
        )
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn loading(&self) -> Loading<'_> {
        Loading::start(&self.store)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::Pipeline;
    use crate::ai::{AiService, RewriteOutput, RewriteRequest, SimulatedAi};
    use crate::error::ServiceError;
    use crate::models::{
        AppConfig, Article, ArticleStatus, ArticleUpdate, Platform, WeChatAccount,
    };
    use crate::services::{
        ContentSource, PublishReceipt, Publisher, SimulatedContentSource, SimulatedPublisher,
        SourceItem,
    };
    use crate::store::Store;

    pub struct FailingSource;

    #[async_trait]
    impl ContentSource for FailingSource {
        async fn search(&self, _: Platform, _: &str) -> Result<Vec<SourceItem>, ServiceError> {
            Err(ServiceError::RateLimited)
        }
    }

    pub struct FailingAi;

    #[async_trait]
    impl AiService for FailingAi {
        async fn rewrite(&self, _: RewriteRequest<'_>) -> Result<RewriteOutput, ServiceError> {
            Err(ServiceError::QuotaExceeded)
        }

        async fn generate_image(&self, _: &str) -> Result<String, ServiceError> {
            Err(ServiceError::ContentPolicyRejected("prompt".to_string()))
        }
    }

    /// Publisher with a fixed result.
    pub struct FixedPublisher(pub Result<PublishReceipt, ServiceError>);

    #[async_trait]
    impl Publisher for FixedPublisher {
        async fn publish(
            &self,
            _: &WeChatAccount,
            _: &str,
            _: &str,
            _: &[String],
        ) -> Result<PublishReceipt, ServiceError> {
            self.0.clone()
        }

        async fn probe(&self, _: &WeChatAccount) -> Result<(), ServiceError> {
            self.0.clone().map(|_| ())
        }
    }

    pub fn article(id: &str, status: ArticleStatus) -> Article {
        Article {
            id: id.to_string(),
            title: "Rust in Production".to_string(),
            content: "Teams adopt Rust for safety. Tooling matured fast.\n\nCompile times remain a concern.".to_string(),
            source: "Zhihu".to_string(),
            source_url: "https://example.com/rust".to_string(),
            author: "Analyst".to_string(),
            publish_time: Utc::now(),
            collect_time: Utc::now(),
            tags: vec!["Rust".to_string()],
            category: "Tech".to_string(),
            read_count: 0,
            like_count: 0,
            status,
        }
    }

    pub fn account(id: &str, connected: bool) -> WeChatAccount {
        WeChatAccount {
            id: id.to_string(),
            name: format!("Account {}", id),
            app_id: format!("wx{}", id),
            is_connected: connected,
            last_sync_at: None,
        }
    }

    /// Empty store with one pending article "a" and a connected account "acc".
    pub fn store() -> Store {
        let store = Store::empty(AppConfig::default());
        store.add_articles(vec![article("a", ArticleStatus::Pending)]);
        store.add_account(account("acc", true));
        store
    }

    /// Like [`store`], with article "a" already rewritten.
    pub fn publishable_store() -> Store {
        let store = store();
        store.update_article("a", ArticleUpdate::status(ArticleStatus::Rewritten));
        store
    }

    pub fn simulated(store: &Store) -> Pipeline {
        Pipeline::new(
            store.clone(),
            Arc::new(SimulatedContentSource::new()),
            Arc::new(SimulatedAi::new("gpt-4")),
            Arc::new(SimulatedPublisher::with_seed(42)),
        )
    }

    pub fn failing(store: &Store) -> Pipeline {
        Pipeline::new(
            store.clone(),
            Arc::new(FailingSource),
            Arc::new(FailingAi),
            Arc::new(FixedPublisher(Err(ServiceError::AuthExpired))),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_test::{assert_pending, assert_ready};

    use super::testing::*;
    use super::*;
    use crate::models::{ArticleStatus, ImageStatus, PublicationStatus, RewriteStyle};

    #[tokio::test(start_paused = true)]
    async fn first_settled_operation_clears_shared_loading_flag() {
        let store = store();
        let pipeline = simulated(&store);

        // rewrite settles after 3s, the image after 4s
        let mut image = tokio_test::task::spawn(pipeline.illustrate(Some("a"), None, None));
        let mut rewrite =
            tokio_test::task::spawn(pipeline.rewrite(Some("a"), RewriteStyle::General, None));
        assert_pending!(image.poll());
        assert_pending!(rewrite.poll());
        assert!(store.snapshot().is_loading);

        tokio::time::advance(Duration::from_millis(3_500)).await;
        assert!(assert_ready!(rewrite.poll()).is_completed());
        assert_pending!(image.poll());

        // The flag is advisory: the image is still generating
        let state = store.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.generated_images[0].status, ImageStatus::Generating);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(assert_ready!(image.poll()).is_completed());
        let state = store.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.generated_images[0].status, ImageStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn full_lifecycle() {
        let store = store();
        let pipeline = simulated(&store);

        let rewrite = pipeline
            .rewrite(Some("a"), RewriteStyle::General, None)
            .await;
        assert!(rewrite.is_completed());
        let state = store.snapshot();
        assert_eq!(state.article("a").unwrap().status, ArticleStatus::Rewritten);
        assert_eq!(state.rewrites.len(), 1);

        let outcome = pipeline.publish(Some("a"), Some("acc")).await;

        let state = store.snapshot();
        assert_eq!(state.publications.len(), 1);
        let publication = &state.publications[0];
        match publication.status {
            PublicationStatus::Success => {
                assert!(outcome.is_completed());
                assert!(publication.view_count.is_some());
                assert_eq!(state.article("a").unwrap().status, ArticleStatus::Published);
            }
            PublicationStatus::Failed => {
                assert!(matches!(outcome, Outcome::Failed(_)));
                assert!(publication.view_count.is_none());
                assert_eq!(state.article("a").unwrap().status, ArticleStatus::Rewritten);
            }
            PublicationStatus::Pending => panic!("publication left pending"),
        }
        assert!(!state.is_loading);
    }
}
