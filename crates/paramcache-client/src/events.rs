//! Refresh notifications.
//!
//! Listeners can be registered as callbacks (`on_refresh`,
//! `on_refresh_error`) or consumed as a stream of [`RefreshEvent`]s through a
//! broadcast receiver.

use chrono::{DateTime, Utc};
use paramcache_core::ParamError;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Default capacity of the broadcast channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Notification emitted by a cached client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshEvent {
    /// The cache was reloaded successfully.
    Refreshed {
        /// Number of keys loaded.
        keys: usize,
        /// Wall-clock time of the load.
        loaded_at: DateTime<Utc>,
    },
    /// A reload failed and stale values were served instead.
    RefreshFailed {
        /// The underlying fetch or validation error.
        error: ParamError,
    },
}

/// Handle returned when registering a listener, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type RefreshListener = Arc<dyn Fn() + Send + Sync>;
type ErrorListener = Arc<dyn Fn(&ParamError) + Send + Sync>;

/// Listener registry plus broadcast sender.
pub(crate) struct RefreshEvents {
    next_id: AtomicU64,
    refresh: RwLock<Vec<(SubscriptionId, RefreshListener)>>,
    refresh_error: RwLock<Vec<(SubscriptionId, ErrorListener)>>,
    tx: broadcast::Sender<RefreshEvent>,
}

impl RefreshEvents {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self {
            next_id: AtomicU64::new(1),
            refresh: RwLock::new(Vec::new()),
            refresh_error: RwLock::new(Vec::new()),
            tx,
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn on_refresh(&self, listener: RefreshListener) -> SubscriptionId {
        let id = self.next_id();
        self.refresh.write().push((id, listener));
        id
    }

    pub(crate) fn on_refresh_error(&self, listener: ErrorListener) -> SubscriptionId {
        let id = self.next_id();
        self.refresh_error.write().push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut refresh = self.refresh.write();
        let before = refresh.len();
        refresh.retain(|(sid, _)| *sid != id);
        if refresh.len() != before {
            return true;
        }
        drop(refresh);

        let mut refresh_error = self.refresh_error.write();
        let before = refresh_error.len();
        refresh_error.retain(|(sid, _)| *sid != id);
        refresh_error.len() != before
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn emit_refresh(&self, keys: usize) {
        // Listeners run outside the lock so they may register or unsubscribe.
        let listeners: Vec<RefreshListener> = self.refresh.read().iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener();
        }

        self.broadcast(RefreshEvent::Refreshed {
            keys,
            loaded_at: Utc::now(),
        });
    }

    pub(crate) fn emit_refresh_error(&self, error: &ParamError) {
        let listeners: Vec<ErrorListener> = self
            .refresh_error
            .read()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(error);
        }

        self.broadcast(RefreshEvent::RefreshFailed { error: error.clone() });
    }

    fn broadcast(&self, event: RefreshEvent) {
        // No receivers is not an error.
        if let Err(e) = self.tx.send(event) {
            debug!("No refresh event receivers: {}", e);
        }
    }
}
