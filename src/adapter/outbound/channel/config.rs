//! Broadcast configuration provider with latest-value replay.

use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::domain::ConfigData;
use crate::port::outbound::config::ConfigProvider;

/// Fans parsed configuration values out to every subscriber.
///
/// New subscribers first receive the most recently published value, then
/// every later one.
pub struct ConfigBroadcast {
    latest: RwLock<Option<Arc<ConfigData>>>,
    tx: broadcast::Sender<Arc<ConfigData>>,
}

impl ConfigBroadcast {
    /// Create a provider buffering up to `capacity` values per slow subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            latest: RwLock::new(None),
            tx,
        }
    }

    /// Publish a new configuration value.
    pub fn publish(&self, config: ConfigData) {
        let config = Arc::new(config);
        let mut latest = self.latest.write();
        *latest = Some(Arc::clone(&config));
        // No subscribers is fine; the value is still replayed to later ones.
        let _ = self.tx.send(config);
    }

    /// Most recently published value.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<ConfigData>> {
        self.latest.read().clone()
    }
}

impl ConfigProvider for ConfigBroadcast {
    fn current_config(&self) -> BoxStream<'static, Arc<ConfigData>> {
        let (replay, rx) = {
            let latest = self.latest.read();
            (latest.clone(), self.tx.subscribe())
        };

        let updates = stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(config) => return Some((config, rx)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Config subscriber lagged, continuing with newest values");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });

        stream::iter(replay).chain(updates).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_subscriber_gets_latest_then_updates() {
        let configs = ConfigBroadcast::new(4);
        configs.publish(ConfigData::new("A"));
        configs.publish(ConfigData::new("B"));

        let mut stream = configs.current_config();
        configs.publish(ConfigData::new("C"));

        assert_eq!(stream.next().await.unwrap().identifier, "B");
        assert_eq!(stream.next().await.unwrap().identifier, "C");
    }

    #[tokio::test]
    async fn empty_provider_replays_nothing() {
        let configs = ConfigBroadcast::new(4);
        let mut stream = configs.current_config();
        configs.publish(ConfigData::new("A"));

        assert_eq!(stream.next().await.unwrap().identifier, "A");
        assert_eq!(configs.latest().unwrap().identifier, "A");
    }

    #[tokio::test]
    async fn lagged_subscriber_keeps_receiving() {
        let configs = ConfigBroadcast::new(1);
        let mut stream = configs.current_config();
        for id in ["A", "B", "C"] {
            configs.publish(ConfigData::new(id));
        }

        assert_eq!(stream.next().await.unwrap().identifier, "C");
    }

    #[tokio::test]
    async fn stream_ends_when_provider_is_dropped() {
        let configs = ConfigBroadcast::new(4);
        let mut stream = configs.current_config();
        drop(configs);

        assert!(stream.next().await.is_none());
    }
}
