//! # Event Bus
//!
//! In-process publish/subscribe. Transport listeners, the command registry and responders talk
//! through it without holding references to each other.
//!
//! - Listeners are prepended: the most recently registered one is offered each event first.
//! - `notify` fans out to every accepting listener concurrently and resolves once all are done.
//! - `shutdown` turns every later `notify` into a no-op. It cannot be undone.

use crate::domain::events::{self, Payload};
use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A bus subscriber.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Pure predicate on the event tag.
    fn accept(&self, event_type: &str) -> bool;

    /// Handle an accepted event. May publish further events on `bus`.
    async fn notify(&self, payload: &Payload, bus: &EventBus) -> Result<()>;
}

/// Cheaply clonable handle to a single bus.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

struct Inner {
    listeners: RwLock<Vec<Arc<dyn Listener>>>,
    active: AtomicBool,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                listeners: RwLock::new(Vec::new()),
                active: AtomicBool::new(true),
            }),
        }
    }

    /// Register a listener. There is no removal; see [`EventBus::shutdown`].
    pub fn add_listener(&self, listener: Arc<dyn Listener>) {
        let mut listeners = self
            .inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.insert(0, listener);
        tracing::trace!(count = listeners.len(), "add listener");
    }

    pub fn listener_count(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Deliver an event and wait for every accepting listener to finish.
    ///
    /// A failing listener does not stop its siblings; each failure is logged and the first one is
    /// returned to the caller.
    pub async fn notify(&self, event_type: &str, payload: Payload) -> Result<()> {
        if event_type.is_empty() || !self.is_active() {
            return Ok(());
        }
        tracing::trace!(event = event_type, ?payload, "notify");

        let accepting: Vec<Arc<dyn Listener>> = self
            .snapshot()
            .into_iter()
            .filter(|listener| listener.accept(event_type))
            .collect();

        let results = join_all(
            accepting
                .iter()
                .map(|listener| listener.notify(&payload, self)),
        )
        .await;

        if event_type == events::SHUTDOWN {
            self.shutdown();
        }

        let mut first_failure = None;
        for result in results {
            if let Err(e) = result {
                tracing::error!(event = event_type, error = %e, "Listener failed");
                first_failure.get_or_insert(e);
            }
        }
        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Fire-and-forget publication for callers with no use for completion.
    ///
    /// Must be called from within a tokio runtime.
    pub fn publish(&self, event_type: &'static str, payload: Payload) {
        let bus = self.clone();
        tokio::spawn(async move {
            if let Err(e) = bus.notify(event_type, payload).await {
                tracing::warn!(event = event_type, error = %e, "Unobserved listener failure");
            }
        });
    }

    /// Stop processing further events. Idempotent; in-flight notifications still complete.
    pub fn shutdown(&self) {
        if self.inner.active.swap(false, Ordering::SeqCst) {
            tracing::debug!("shutdown");
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn Listener>> {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[cfg(test)]
    pub fn same_bus(&self, other: &EventBus) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
