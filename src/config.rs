//! Runtime configuration for the task engine, task store, and push-notification
//! subsystem.
//!
//! Every config type implements `Default` with the numeric defaults named in
//! the design doc, and exposes `with_*` builder setters for overriding them.

use std::time::Duration;

/// Configuration for the in-memory [`crate::server::TaskStore`].
#[derive(Debug, Clone)]
pub struct TaskStoreConfig {
    /// Maximum number of tasks retained before eviction kicks in.
    pub capacity: usize,
    /// How long a terminal task is retained before the TTL sweeper removes it.
    pub ttl: Duration,
    /// How often the TTL sweeper runs.
    pub sweep_interval: Duration,
}

impl Default for TaskStoreConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            ttl: Duration::from_secs(24 * 60 * 60),
            sweep_interval: Duration::from_secs(60 * 60),
        }
    }
}

impl TaskStoreConfig {
    /// Override the maximum retained task count.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Override the terminal-task retention TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override how often the TTL sweeper runs.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Configuration for the per-task subscriber channel used to fan out
/// [`crate::types::StreamEvent`]s to SSE subscribers.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Bounded channel capacity per subscriber.
    pub channel_capacity: usize,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self { channel_capacity: 64 }
    }
}

impl SubscriberConfig {
    /// Override the per-subscriber channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }
}

/// Token-bucket rate limit configuration for push-notification delivery.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum burst capacity of the token bucket.
    pub capacity: u32,
    /// Tokens replenished per second.
    pub refill_per_second: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            refill_per_second: 1,
        }
    }
}

impl RateLimitConfig {
    /// Override the burst capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Override the refill rate, in tokens per second.
    pub fn with_refill_per_second(mut self, refill: u32) -> Self {
        self.refill_per_second = refill;
        self
    }
}

/// Exponential backoff retry configuration for push-notification delivery.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of delivery attempts.
    pub max_attempts: u32,
    /// Base delay before the first retry.
    pub base_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt.
    pub multiplier: f64,
    /// Upper bound on the computed delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            multiplier: 2.0,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Compute the delay before the given attempt (0-indexed), capped at
    /// `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let scaled = self.base_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = scaled.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }
}

/// Configuration for the bounded push-notification delivery queue and its
/// worker pool.
#[derive(Debug, Clone)]
pub struct PushQueueConfig {
    /// Maximum number of pending deliveries before the queue rejects new work.
    pub queue_capacity: usize,
    /// Number of concurrent delivery workers draining the queue.
    pub worker_count: usize,
}

impl Default for PushQueueConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1000,
            worker_count: 10,
        }
    }
}

/// Aggregate configuration for the push-notification subsystem.
#[derive(Debug, Clone, Default)]
pub struct PushConfig {
    /// Rate limiting applied across all outbound deliveries.
    pub rate_limit: RateLimitConfig,
    /// Retry behavior for a single delivery.
    pub retry: RetryConfig,
    /// Queue and worker-pool sizing.
    pub queue: PushQueueConfig,
}

/// Top-level configuration for a running [`crate::server::TaskEngine`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Task store sizing/retention.
    pub task_store: TaskStoreConfig,
    /// Subscriber channel sizing.
    pub subscriber: SubscriberConfig,
    /// Push-notification subsystem configuration.
    pub push: PushConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.task_store.capacity, 10_000);
        assert_eq!(cfg.task_store.ttl, Duration::from_secs(86_400));
        assert_eq!(cfg.push.rate_limit.capacity, 100);
        assert_eq!(cfg.push.rate_limit.refill_per_second, 1);
        assert_eq!(cfg.push.retry.max_attempts, 3);
        assert_eq!(cfg.push.retry.base_delay, Duration::from_millis(100));
        assert_eq!(cfg.push.queue.queue_capacity, 1000);
        assert_eq!(cfg.push.queue.worker_count, 10);
    }

    #[test]
    fn retry_delay_backs_off_and_caps() {
        let retry = RetryConfig::default();
        assert_eq!(retry.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(400));
        // Far enough out, the multiplier would exceed max_delay; it caps at 5s.
        assert_eq!(retry.delay_for_attempt(20), Duration::from_secs(5));
    }

    #[test]
    fn builder_setters_override_defaults() {
        let cfg = TaskStoreConfig::default().with_capacity(500).with_ttl(Duration::from_secs(60));
        assert_eq!(cfg.capacity, 500);
        assert_eq!(cfg.ttl, Duration::from_secs(60));
    }
}
