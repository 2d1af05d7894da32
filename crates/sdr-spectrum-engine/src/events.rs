//! Change notifications for spectrum subscribers
//!
//! `EventBus` broadcasts `SpectrumEvent`s to every subscriber over its own
//! unbounded channel. Emitting never blocks; subscribers that hung up are
//! dropped on the next emit.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

/// Discrete events published by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumEvent {
    /// A new snapshot is ready; pull it with `get_spectrum`
    SpectrumUpdated,
    /// The ADC overload flag flipped to the carried value
    OverloadChanged(bool),
}

/// Broadcast mechanism for spectrum events
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<SpectrumEvent>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a new event bus with no subscribers
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to events. Returns a receiver that will get all future events.
    pub fn subscribe(&self) -> Receiver<SpectrumEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Emit an event to all subscribers. Removes disconnected subscribers.
    pub fn emit(&self, event: SpectrumEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event).is_ok());
    }

    /// Number of live subscribers as of the last emit
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
