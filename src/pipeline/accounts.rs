use chrono::Utc;

use super::{Outcome, Pipeline, Precondition};
use crate::models::{random_id, AccountUpdate, NewAccount, WeChatAccount};

impl Pipeline {
    /// Register an account. It starts disconnected until a connection test passes.
    pub fn add_account(&self, new: NewAccount) -> Outcome<WeChatAccount> {
        let name = new.name.trim();
        let app_id = new.app_id.trim();
        if name.is_empty() || app_id.is_empty() {
            return Outcome::Skipped(Precondition::IncompleteAccount);
        }

        let account = WeChatAccount {
            id: random_id("account"),
            name: name.to_string(),
            app_id: app_id.to_string(),
            is_connected: false,
            last_sync_at: None,
        };
        tracing::info!("Adding account {} ({})", account.name, account.app_id);
        self.store.add_account(account.clone());
        Outcome::Completed(account)
    }

    pub fn remove_account(&self, account_id: &str) -> Outcome<()> {
        if self.store.snapshot().account(account_id).is_none() {
            return Outcome::Skipped(Precondition::AccountNotFound(account_id.to_string()));
        }
        tracing::info!("Removing account {}", account_id);
        self.store.remove_account(account_id);
        Outcome::Completed(())
    }

    /// Probe an account and record whether it is reachable.
    pub async fn test_connection(&self, account_id: &str) -> Outcome<WeChatAccount> {
        let Some(account) = self.store.snapshot().account(account_id).cloned() else {
            return Outcome::Skipped(Precondition::AccountNotFound(account_id.to_string()));
        };

        let _loading = self.loading();

        match self.publisher.probe(&account).await {
            Ok(()) => {
                let update = AccountUpdate {
                    is_connected: Some(true),
                    last_sync_at: Some(Utc::now()),
                    ..AccountUpdate::default()
                };
                self.store.update_account(&account.id, update.clone());
                let mut account = account;
                update.apply(&mut account);
                Outcome::Completed(account)
            }
            Err(e) => {
                tracing::warn!("Connection test for {} failed: {}", account.name, e);
                self.store.update_account(
                    &account.id,
                    AccountUpdate {
                        is_connected: Some(false),
                        ..AccountUpdate::default()
                    },
                );
                Outcome::failed(e, Some(account.id))
            }
        }
    }
}
