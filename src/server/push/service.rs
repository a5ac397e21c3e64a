//! Push-notification delivery: rate-limited, retried, queued webhook POSTs.
//!
//! Rate limiting uses a `governor` token bucket (hard-cap-at-refill via its
//! GCRA algorithm — no overshoot, resolving the open question of whether a
//! burst can exceed capacity). Delivery retries with exponential backoff.
//! A bounded queue decouples task-engine updates from webhook latency; a
//! fixed pool of workers drains it concurrently.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, warn};

use crate::config::PushConfig;
use crate::server::push::config_store::PushConfigStore;
use crate::server::task_engine::PushNotifier;
use crate::types::{Artifact, PushEventKind, PushNotificationPayload, Task, TaskStatus};

type GlobalRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

struct PushJob {
    payload: PushNotificationPayload,
    url: String,
    token: Option<String>,
    credentials: Option<String>,
}

/// Delivers push notifications for task lifecycle events: rate limited,
/// retried with exponential backoff, and queued through a worker pool.
pub struct PushService {
    config_store: Arc<PushConfigStore>,
    tx: mpsc::Sender<PushJob>,
}

impl PushService {
    /// Construct a push service and spawn its worker pool.
    ///
    /// Requires a `reqwest::Client` for outbound delivery — independent of
    /// the crate's `client` feature, which talks JSON-RPC rather than plain
    /// webhook POSTs.
    pub fn new(config_store: Arc<PushConfigStore>, config: PushConfig, http: reqwest::Client) -> Self {
        let (tx, rx) = mpsc::channel(config.queue.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit.refill_per_second.max(1)).expect("refill must be nonzero"),
        )
        .allow_burst(NonZeroU32::new(config.rate_limit.capacity.max(1)).expect("capacity must be nonzero"));
        let limiter: Arc<GlobalRateLimiter> = Arc::new(RateLimiter::direct(quota));

        for worker_id in 0..config.queue.worker_count {
            let rx = Arc::clone(&rx);
            let limiter = Arc::clone(&limiter);
            let retry = config.retry.clone();
            let http = http.clone();
            tokio::spawn(async move {
                loop {
                    let job = {
                        let mut rx = rx.lock().await;
                        rx.recv().await
                    };
                    let Some(job) = job else {
                        debug!(worker_id, "push worker shutting down, queue closed");
                        break;
                    };
                    limiter.until_ready().await;
                    Self::deliver_with_retry(&http, &job, &retry).await;
                }
            });
        }

        Self { config_store, tx }
    }

    async fn deliver_with_retry(http: &reqwest::Client, job: &PushJob, retry: &crate::config::RetryConfig) {
        for attempt in 0..retry.max_attempts {
            let mut request = http.post(&job.url).json(&job.payload);
            if let Some(token) = &job.token {
                request = request.bearer_auth(token);
            } else if let Some(credentials) = &job.credentials {
                request = request.header("Authorization", credentials);
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(url = %job.url, attempt, "push notification delivered");
                    return;
                }
                Ok(response) => {
                    warn!(url = %job.url, status = %response.status(), attempt, "push notification rejected");
                }
                Err(err) => {
                    warn!(url = %job.url, error = %err, attempt, "push notification delivery failed");
                }
            }

            if attempt + 1 < retry.max_attempts {
                tokio::time::sleep(retry.delay_for_attempt(attempt)).await;
            }
        }
        error!(url = %job.url, attempts = retry.max_attempts, "push notification delivery exhausted retries");
    }

    async fn enqueue(&self, task_id: &str, payload: PushNotificationPayload) {
        let Some(config) = self.config_store.get(task_id).await else {
            return;
        };
        let job = PushJob {
            payload,
            url: config.url,
            token: config.token,
            credentials: config.credentials,
        };
        if let Err(mpsc::error::TrySendError::Full(_)) = self.tx.try_send(job) {
            warn!(task_id, "push notification queue full, dropping notification");
        }
    }
}

#[async_trait]
impl PushNotifier for PushService {
    async fn notify(&self, task: &Task, event: PushEventKind, status: Option<&TaskStatus>, artifact: Option<&Artifact>) {
        let payload = PushNotificationPayload {
            task_id: task.id.clone(),
            event,
            task: status.map(|_| task.clone()),
            status: status.cloned(),
            artifact: artifact.cloned(),
            timestamp: chrono::Utc::now(),
        };
        self.enqueue(&task.id, payload).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskState;

    #[tokio::test]
    async fn notify_without_config_is_noop() {
        let store = Arc::new(PushConfigStore::new());
        let service = PushService::new(store, PushConfig::default(), reqwest::Client::new());
        let task = Task::new("t1", None, None);
        // No config registered for t1; should not panic or block.
        service
            .notify(&task, PushEventKind::TaskStatus, Some(&TaskStatus::new(TaskState::Working)), None)
            .await;
    }
}
