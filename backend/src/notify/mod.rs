//! Observer registry
//!
//! Listeners are plain closures registered against a [`SubscriptionId`].
//! They run synchronously on the thread that mutates the engine, in
//! registration order, and only ever see a shared reference to the update.

use std::fmt;

/// Handle returned by [`ObserverRegistry::subscribe`]
pub type SubscriptionId = u64;

/// Boxed listener callback
pub type Listener<T> = Box<dyn FnMut(&T) + Send>;

/// Ordered list of listeners for updates of type `T`
///
/// # Example
/// ```
/// use hospital_simulator_core_rs::notify::ObserverRegistry;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let mut registry = ObserverRegistry::new();
/// let id = registry.subscribe(move |value: &u32| sink.lock().unwrap().push(*value));
/// registry.notify(&7);
/// assert!(registry.unsubscribe(id));
/// registry.notify(&8);
///
/// assert_eq!(*seen.lock().unwrap(), vec![7]);
/// ```
pub struct ObserverRegistry<T> {
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: SubscriptionId,
}

impl<T> ObserverRegistry<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; `false` if the id is unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Invoke every listener, oldest subscription first
    pub fn notify(&mut self, update: &T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(update);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObserverRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
