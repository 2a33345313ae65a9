use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

use super::{PublishReceipt, Publisher};
use crate::error::ServiceError;
use crate::models::{random_id, WeChatAccount};

const PUBLISH_DELAY: Duration = Duration::from_secs(3);
const PROBE_DELAY: Duration = Duration::from_secs(1);
const SUCCESS_RATE: f64 = 0.9;

/// Publishing stand-in: each attempt succeeds independently with probability 0.9.
pub struct SimulatedPublisher {
    rng: Mutex<StdRng>,
}

impl SimulatedPublisher {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Roll one attempt: `Some((views, likes))` on success.
    pub async fn roll(&self) -> Option<(u64, u64)> {
        let mut rng = self.rng.lock().await;
        if rng.random_bool(SUCCESS_RATE) {
            Some((rng.random_range(100..5_100), rng.random_range(10..510)))
        } else {
            None
        }
    }
}

impl Default for SimulatedPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for SimulatedPublisher {
    async fn publish(
        &self,
        account: &WeChatAccount,
        title: &str,
        _body: &str,
        images: &[String],
    ) -> Result<PublishReceipt, ServiceError> {
        tracing::debug!(
            "Publishing '{}' to {} with {} images",
            title,
            account.name,
            images.len()
        );
        tokio::time::sleep(PUBLISH_DELAY).await;

        match self.roll().await {
            Some((view_count, like_count)) => Ok(PublishReceipt {
                remote_id: random_id("remote"),
                view_count,
                like_count,
            }),
            None => Err(ServiceError::TransientNetwork),
        }
    }

    async fn probe(&self, account: &WeChatAccount) -> Result<(), ServiceError> {
        tokio::time::sleep(PROBE_DELAY).await;
        if account.app_id.trim().is_empty() {
            return Err(ServiceError::AuthExpired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_rate_is_near_ninety_percent() {
        let publisher = SimulatedPublisher::with_seed(7);
        let attempts = 1000;

        let mut successes = 0;
        for _ in 0..attempts {
            if let Some((views, likes)) = publisher.roll().await {
                assert!((100..5_100).contains(&views));
                assert!((10..510).contains(&likes));
                successes += 1;
            }
        }

        // mean 900, sd ~9.5; four sigma either side
        let fraction = successes as f64 / attempts as f64;
        assert!((0.862..=0.938).contains(&fraction), "fraction {}", fraction);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_rejects_blank_app_id() {
        let publisher = SimulatedPublisher::with_seed(1);
        let mut account = WeChatAccount {
            id: "1".to_string(),
            name: "Tech".to_string(),
            app_id: "wx1".to_string(),
            is_connected: false,
            last_sync_at: None,
        };

        assert!(publisher.probe(&account).await.is_ok());

        account.app_id = " ".to_string();
        assert_eq!(
            publisher.probe(&account).await,
            Err(ServiceError::AuthExpired)
        );
    }
}
