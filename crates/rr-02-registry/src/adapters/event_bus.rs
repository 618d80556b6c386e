//! In-memory event bus on a tokio broadcast channel.

use crate::events::RegistryEvent;
use crate::ports::outbound::EventSink;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Default broadcast capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Broadcast-backed [`EventSink`].
///
/// Subscribers that fall more than `capacity` events behind lose the
/// oldest ones.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<RegistryEvent>,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Receive every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total events published, delivered or not.
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for InMemoryEventBus {
    async fn publish(&self, event: RegistryEvent) -> usize {
        let name = event.name();
        let network = event.network();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event = name, %network, receivers, "event published");
                receivers
            }
            Err(_) => {
                debug!(event = name, %network, "event dropped (no receivers)");
                0
            }
        }
    }
}
