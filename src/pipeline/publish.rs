use chrono::Utc;

use super::{Outcome, Pipeline, Precondition};
use crate::models::{
    random_id, ArticleStatus, ArticleUpdate, PublicationRecord, PublicationStatus,
    PublicationUpdate,
};

impl Pipeline {
    /// Publish an article to a connected account.
    ///
    /// One publication record is created as `pending` and settled in place to
    /// `success` or `failed`. The article is marked published only on success.
    pub async fn publish(
        &self,
        article_id: Option<&str>,
        account_id: Option<&str>,
    ) -> Outcome<PublicationRecord> {
        let (Some(article_id), Some(account_id)) = (article_id, account_id) else {
            return Outcome::Skipped(if article_id.is_none() {
                Precondition::NoArticle
            } else {
                Precondition::NoAccount
            });
        };

        let (article, account, images) = {
            let state = self.store.snapshot();
            let Some(article) = state.article(article_id).cloned() else {
                return Outcome::Skipped(Precondition::ArticleNotFound(article_id.to_string()));
            };
            if article.status != ArticleStatus::Rewritten {
                return Outcome::Skipped(Precondition::ArticleNotPublishable(article.id));
            }
            let Some(account) = state.account(account_id).cloned() else {
                return Outcome::Skipped(Precondition::AccountNotFound(account_id.to_string()));
            };
            if !account.is_connected {
                return Outcome::Skipped(Precondition::AccountNotConnected(account.id));
            }
            let images: Vec<String> = state
                .completed_images_for(&article.id)
                .iter()
                .map(|i| i.url.clone())
                .collect();
            (article, account, images)
        };

        let _loading = self.loading();

        let pending = PublicationRecord {
            id: random_id("pub"),
            article_id: article.id.clone(),
            account_id: account.id.clone(),
            title: article.title.clone(),
            published_at: Utc::now(),
            status: PublicationStatus::Pending,
            view_count: None,
            like_count: None,
        };
        let mut record = pending.clone();
        self.store.add_publication(pending);
        tracing::info!("Publishing article {} to {}", article.id, account.name);

        let result = self
            .publisher
            .publish(&account, &article.title, &article.content, &images)
            .await;

        match result {
            Ok(receipt) => {
                tracing::info!(
                    "Published article {} as {} ({} views)",
                    article.id,
                    receipt.remote_id,
                    receipt.view_count
                );
                let update = PublicationUpdate::success(receipt.view_count, receipt.like_count);
                self.store.update_publication(&record.id, update.clone());
                update.apply(&mut record);
                self.store
                    .update_article(&article.id, ArticleUpdate::status(ArticleStatus::Published));
                Outcome::Completed(record)
            }
            Err(e) => {
                tracing::warn!("Publishing article {} failed: {}", article.id, e);
                self.store
                    .update_publication(&record.id, PublicationUpdate::failed());
                Outcome::failed(e, Some(record.id))
            }
        }
    }
}
