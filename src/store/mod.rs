//! In-memory application store.
//!
//! [`Store`] is a cheap handle handed to every consumer at construction. It
//! publishes immutable [`AppState`] snapshots over a `watch` channel; each
//! mutation copies the state if a snapshot is still held elsewhere, applies
//! the change and publishes the result in one step.

mod seed;
mod state;

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{
    AccountUpdate, AppConfig, Article, ArticleStatus, ArticleUpdate, ConfigUpdate,
    GeneratedImage, ImageUpdate, PublicationRecord, PublicationUpdate, RewriteRecord,
    WeChatAccount,
};

pub use state::AppState;

#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<Arc<AppState>>>,
}

impl Store {
    /// Store seeded with the sample articles and accounts.
    pub fn new(config: AppConfig) -> Self {
        Self::from_state(AppState {
            articles: seed::articles(),
            accounts: seed::accounts(),
            ..AppState::new(config)
        })
    }

    pub fn empty(config: AppConfig) -> Self {
        Self::from_state(AppState::new(config))
    }

    pub fn from_state(state: AppState) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(state));
        Self { tx: Arc::new(tx) }
    }

    /// Current state. The returned snapshot never changes.
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.tx.borrow())
    }

    /// Receiver notified after every effective mutation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.tx.subscribe()
    }

    fn mutate(&self, f: impl FnOnce(&mut Arc<AppState>) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    // Articles

    pub fn add_articles(&self, batch: Vec<Article>) {
        if batch.is_empty() {
            return;
        }
        tracing::debug!("Adding {} articles", batch.len());
        self.mutate(|state| {
            Arc::make_mut(state).articles.extend(batch);
            true
        });
    }

    pub fn update_article(&self, id: &str, updates: ArticleUpdate) {
        self.mutate(|state| {
            let Some(index) = state.articles.iter().position(|a| a.id == id) else {
                return false;
            };
            updates.apply(&mut Arc::make_mut(state).articles[index]);
            true
        });
    }

    /// Removes the article only. Rewrites, publications and images that
    /// reference it stay in place.
    pub fn delete_article(&self, id: &str) {
        self.mutate(|state| {
            if !state.articles.iter().any(|a| a.id == id) {
                return false;
            }
            Arc::make_mut(state).articles.retain(|a| a.id != id);
            true
        });
    }

    pub fn delete_articles(&self, ids: &[String]) {
        self.mutate(|state| {
            if !state.articles.iter().any(|a| ids.contains(&a.id)) {
                return false;
            }
            Arc::make_mut(state)
                .articles
                .retain(|a| !ids.contains(&a.id));
            true
        });
    }

    pub fn set_articles_status(&self, ids: &[String], status: ArticleStatus) {
        self.mutate(|state| {
            if !state.articles.iter().any(|a| ids.contains(&a.id)) {
                return false;
            }
            for article in Arc::make_mut(state)
                .articles
                .iter_mut()
                .filter(|a| ids.contains(&a.id))
            {
                article.status = status;
            }
            true
        });
    }

    // Rewrites and publications

    pub fn add_rewrite(&self, record: RewriteRecord) {
        self.mutate(|state| {
            Arc::make_mut(state).rewrites.push(record);
            true
        });
    }

    pub fn add_publication(&self, record: PublicationRecord) {
        self.mutate(|state| {
            Arc::make_mut(state).publications.push(record);
            true
        });
    }

    pub fn update_publication(&self, id: &str, updates: PublicationUpdate) {
        self.mutate(|state| {
            let Some(index) = state.publications.iter().position(|p| p.id == id) else {
                return false;
            };
            updates.apply(&mut Arc::make_mut(state).publications[index]);
            true
        });
    }

    // Generated images

    pub fn add_generated_image(&self, image: GeneratedImage) {
        self.mutate(|state| {
            Arc::make_mut(state).generated_images.push(image);
            true
        });
    }

    pub fn update_generated_image(&self, id: &str, updates: ImageUpdate) {
        self.mutate(|state| {
            let Some(index) = state.generated_images.iter().position(|i| i.id == id) else {
                return false;
            };
            updates.apply(&mut Arc::make_mut(state).generated_images[index]);
            true
        });
    }

    pub fn delete_generated_image(&self, id: &str) {
        self.mutate(|state| {
            if !state.generated_images.iter().any(|i| i.id == id) {
                return false;
            }
            Arc::make_mut(state).generated_images.retain(|i| i.id != id);
            true
        });
    }

    // Accounts

    pub fn add_account(&self, account: WeChatAccount) {
        self.mutate(|state| {
            Arc::make_mut(state).accounts.push(account);
            true
        });
    }

    pub fn update_account(&self, id: &str, updates: AccountUpdate) {
        self.mutate(|state| {
            let Some(index) = state.accounts.iter().position(|a| a.id == id) else {
                return false;
            };
            updates.apply(&mut Arc::make_mut(state).accounts[index]);
            true
        });
    }

    pub fn remove_account(&self, id: &str) {
        self.mutate(|state| {
            if !state.accounts.iter().any(|a| a.id == id) {
                return false;
            }
            Arc::make_mut(state).accounts.retain(|a| a.id != id);
            true
        });
    }

    // Config and UI state

    pub fn update_config(&self, updates: ConfigUpdate) {
        self.mutate(|state| {
            updates.apply(&mut Arc::make_mut(state).config);
            true
        });
    }

    /// Any name is accepted; views fall back to the dashboard for unknown ones.
    pub fn set_current_module(&self, name: impl Into<String>) {
        let name = name.into();
        self.mutate(|state| {
            if state.current_module == name {
                return false;
            }
            Arc::make_mut(state).current_module = name;
            true
        });
    }

    pub fn set_is_loading(&self, loading: bool) {
        self.mutate(|state| {
            if state.is_loading == loading {
                return false;
            }
            Arc::make_mut(state).is_loading = loading;
            true
        });
    }
}
