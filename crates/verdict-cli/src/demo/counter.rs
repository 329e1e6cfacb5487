//! Observable counter exercised by the integration suite

use std::fmt;

type Listener = Box<dyn Fn(i64) + Send + Sync>;

/// Handle returned by [`Counter::add_listener`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// An integer that notifies listeners after every change.
#[derive(Default)]
pub struct Counter {
    value: i64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn increment(&mut self) -> i64 {
        self.set_value(self.value + 1)
    }

    pub fn decrement(&mut self) -> i64 {
        self.set_value(self.value - 1)
    }

    pub fn reset(&mut self) -> i64 {
        self.set_value(0)
    }

    pub fn set_value(&mut self, value: i64) -> i64 {
        self.value = value;
        for (_, listener) in &self.listeners {
            listener(self.value);
        }
        self.value
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(i64) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Counter")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
