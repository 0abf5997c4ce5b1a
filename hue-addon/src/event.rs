//! Change events for variable values
//!
//! A variable emits a [`ChangeEvent`] when a read observes a value that
//! differs from the one observed by the previous read. Listeners are plain
//! callbacks registered per variable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde_json::Value;

/// A change observed on a variable
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Unique id of the variable that changed
    pub variable_id: String,

    /// Value observed by the previous read
    pub previous: Value,

    /// Value observed by the read that detected the change
    pub current: Value,

    /// When the change was detected
    pub timestamp: Instant,
}

impl ChangeEvent {
    pub fn new(variable_id: impl Into<String>, previous: Value, current: Value) -> Self {
        Self {
            variable_id: variable_id.into(),
            previous,
            current,
            timestamp: Instant::now(),
        }
    }
}

impl PartialEq for ChangeEvent {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.variable_id == other.variable_id
            && self.previous == other.previous
            && self.current == other.current
    }
}

/// Callback invoked for every change event of a variable
pub type ChangeListener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Handle returned when registering a listener, used to remove it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registry owned by a single variable
#[derive(Default)]
pub struct ChangeListeners {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, ChangeListener)>>,
}

impl ChangeListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: ChangeListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        id
    }

    /// Returns whether a listener with this id was registered
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every listener, returning how many were called
    pub fn emit(&self, event: &ChangeEvent) -> usize {
        // Snapshot so listeners may add or remove listeners while being called
        let listeners: Vec<ChangeListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }
}

impl std::fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("listener_count", &self.len())
            .finish()
    }
}
