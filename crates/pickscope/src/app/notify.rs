//! Minimal publish point for overlay lifecycle notifications.

use std::fmt;

type Listener = Box<dyn FnMut()>;

/// Ordered list of observers invoked synchronously on [`Notifier::notify`].
#[derive(Default)]
pub struct Notifier {
    listeners: Vec<Listener>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners run in registration order.
    pub fn attach<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn notify(&mut self) {
        for listener in self.listeners.iter_mut() {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
