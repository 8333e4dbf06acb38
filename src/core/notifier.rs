//! Scope-based change notifications.
//!
//! Notifications are level-triggered: an event only says "this collection
//! may have changed, re-read it". Slow subscribers that fall behind lose the
//! intermediate events and get a single resync event instead.

use crate::errors::AppResult;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::debug;

const DEFAULT_CAPACITY: usize = 256;

/// The entity collection a notification pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    Tasks,
    Timings,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Tasks => write!(f, "tasks"),
            Scope::Timings => write!(f, "timings"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub scope: Scope,
    /// Row that triggered the change, when a single row is known.
    pub id: Option<i64>,
}

impl ChangeEvent {
    pub fn new(scope: Scope, id: Option<i64>) -> Self {
        Self { scope, id }
    }

    /// Event handed out after missed notifications.
    pub fn resync(scope: Scope) -> Self {
        Self { scope, id: None }
    }
}

/// Non-blocking publisher of [`ChangeEvent`]s.
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
    published: AtomicU64,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            published: AtomicU64::new(0),
        }
    }

    /// Returns the number of subscriptions that will see the event.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self, scope: Scope) -> Subscription {
        Subscription {
            scope,
            rx: self.tx.subscribe(),
        }
    }

    /// Call `callback` on a dedicated thread for every event in `scope`.
    ///
    /// The thread ends when the listener is dropped (observed on the next
    /// event) or when the notifier goes away.
    pub fn on_change<F>(&self, scope: Scope, mut callback: F) -> AppResult<ChangeListener>
    where
        F: FnMut(ChangeEvent) + Send + 'static,
    {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stopped);
        let mut sub = self.subscribe(scope);

        let handle = thread::Builder::new()
            .name(format!("tasktimer-{scope}"))
            .spawn(move || {
                while let Some(event) = sub.recv() {
                    if flag.load(Ordering::Acquire) {
                        break;
                    }
                    callback(event);
                }
                debug!(%scope, "change listener finished");
            })?;

        Ok(ChangeListener {
            stopped,
            handle: Some(handle),
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

/// Receiving end for one scope.
pub struct Subscription {
    scope: Scope,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Next pending event for this scope, without blocking.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if event.scope == self.scope => return Some(event),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(_)) => return Some(ChangeEvent::resync(self.scope)),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Block until an event for this scope arrives. `None` once the
    /// notifier has been dropped.
    ///
    /// Must not be called from inside an async runtime.
    pub fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.blocking_recv() {
                Ok(event) if event.scope == self.scope => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => return Some(ChangeEvent::resync(self.scope)),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Consume every pending event and report how many concerned this scope.
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while self.try_recv().is_some() {
            n += 1;
        }
        n
    }
}

/// Handle returned by [`ChangeNotifier::on_change`].
///
/// Dropping it (or calling [`unsubscribe`](Self::unsubscribe)) stops further
/// callbacks. The listener thread is parked in a receive, so it only exits,
/// and releases its subscription, when the next event arrives or the
/// notifier is dropped. Until then it still counts in
/// [`ChangeNotifier::subscriber_count`].
pub struct ChangeListener {
    stopped: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ChangeListener {
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        // Detach: the thread may be parked until the next event.
        self.handle.take();
    }
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        self.stop();
    }
}
