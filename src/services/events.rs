//! Minimal event emitter
//!
//! Listeners are closures invoked synchronously from `fire`, or channel
//! subscriptions for consumers that poll. Cloning an `Emitter` shares its
//! listener list.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

pub struct Emitter<T> {
    listeners: Arc<Mutex<Vec<Listener<T>>>>,
}

impl<T> Emitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a listener called on every `fire`
    pub fn on(&self, listener: impl Fn(&T) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    /// Notify every listener
    pub fn fire(&self, event: &T) {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T: Clone + Send + 'static> Emitter<T> {
    /// Receive every following event on a channel
    ///
    /// Events sent after the receiver is dropped are discarded.
    pub fn subscribe(&self) -> mpsc::Receiver<T> {
        let (sender, receiver) = mpsc::channel();
        let sender = Mutex::new(sender);
        self.on(move |event: &T| {
            let _ = sender
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .send(event.clone());
        });
        receiver
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<T> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fire_calls_every_listener() {
        let emitter: Emitter<u32> = Emitter::new();
        let total = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let total = Arc::clone(&total);
            emitter.on(move |n| {
                total.fetch_add(*n as usize, Ordering::SeqCst);
            });
        }

        emitter.fire(&2);
        assert_eq!(total.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_subscribe_receives_events_in_order() {
        let emitter: Emitter<&'static str> = Emitter::new();
        let receiver = emitter.subscribe();

        emitter.fire(&"first");
        emitter.clone().fire(&"second");

        assert_eq!(receiver.try_recv(), Ok("first"));
        assert_eq!(receiver.try_recv(), Ok("second"));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let emitter: Emitter<u8> = Emitter::new();
        drop(emitter.subscribe());
        emitter.fire(&1);
        assert_eq!(emitter.listener_count(), 1);
    }
}
