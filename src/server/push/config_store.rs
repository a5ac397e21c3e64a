//! Storage for per-task push notification configuration.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::PushNotificationConfig;

/// Stores the push notification configuration associated with each task.
pub struct PushConfigStore {
    configs: Arc<RwLock<HashMap<String, PushNotificationConfig>>>,
}

impl PushConfigStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            configs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Set (overwrite) the push notification config for a task.
    pub async fn set(&self, task_id: &str, config: PushNotificationConfig) {
        self.configs.write().await.insert(task_id.to_string(), config);
    }

    /// Retrieve a task's push notification config, if any.
    pub async fn get(&self, task_id: &str) -> Option<PushNotificationConfig> {
        self.configs.read().await.get(task_id).cloned()
    }

    /// Remove a task's push notification config.
    pub async fn delete(&self, task_id: &str) {
        self.configs.write().await.remove(task_id);
    }
}

impl Default for PushConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let store = PushConfigStore::new();
        let config = PushNotificationConfig {
            url: "https://example.com/hook".to_string(),
            token: Some("secret".to_string()),
            credentials: None,
        };
        store.set("t1", config.clone()).await;
        let fetched = store.get("t1").await.unwrap();
        assert_eq!(fetched.url, config.url);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = PushConfigStore::new();
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn delete_removes_config() {
        let store = PushConfigStore::new();
        store
            .set(
                "t1",
                PushNotificationConfig {
                    url: "https://example.com".to_string(),
                    token: None,
                    credentials: None,
                },
            )
            .await;
        store.delete("t1").await;
        assert!(store.get("t1").await.is_none());
    }
}
