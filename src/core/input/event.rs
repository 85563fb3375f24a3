//=========================================================================
// Input Events
//
// Raw key transitions forwarded to the simulation alongside the per-tick
// command. Menus, the automap, chat and cheat codes read these; movement
// does not.
//
// Event Flow:
// ```text
// Backend key event
//         ↓
//    KeyTranslator (native → Key)
//         ↓
//    EventForwarder ──bounded channel──► EventQueue
//                                            ↓ (drained at tick start)
//                                    Simulation::post_event()
// ```
//
// Both ends live on the engine thread; the channel bounds how much input
// a stalled tick loop can accumulate.
//
//=========================================================================

//=== External Crates =====================================================

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{trace, warn};

//=== Internal Modules ====================================================

use super::key::Key;

//=== InputEvent ==========================================================

/// A key transition, already translated to an engine key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
}

impl InputEvent {
    pub fn key(&self) -> Key {
        match *self {
            Self::KeyDown(key) | Self::KeyUp(key) => key,
        }
    }

    pub fn is_down(&self) -> bool {
        matches!(self, Self::KeyDown(_))
    }
}

//=== Channel Construction ================================================

/// Creates a forwarder/queue pair sharing a channel of `capacity` events.
pub fn event_channel(capacity: usize) -> (EventForwarder, EventQueue) {
    let (sender, receiver) = bounded(capacity);
    (EventForwarder { sender }, EventQueue { receiver })
}

//=== EventForwarder ======================================================

/// Producer half, owned by the backend host.
#[derive(Clone)]
pub struct EventForwarder {
    sender: Sender<InputEvent>,
}

impl EventForwarder {
    /// Queues `event` for the next tick.
    ///
    /// Never blocks. Returns `false` if the event was dropped because the
    /// queue is full or the consumer is gone.
    pub fn forward(&self, event: InputEvent) -> bool {
        if event.key() == Key::Unknown {
            trace!(target: "platform::input", "Unmapped key not forwarded");
            return false;
        }

        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(target: "platform::input", "Event queue full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(event)) => {
                warn!(target: "platform::input", "Event queue closed, dropping {:?}", event);
                false
            }
        }
    }
}

//=== EventQueue ==========================================================

/// Consumer half, drained by the engine once per tick.
pub struct EventQueue {
    receiver: Receiver<InputEvent>,
}

impl EventQueue {
    /// Delivers every pending event, in arrival order, to `sink`.
    /// Returns the number delivered.
    pub fn drain_into<F: FnMut(InputEvent)>(&self, mut sink: F) -> usize {
        let mut count = 0;
        for event in self.receiver.try_iter() {
            sink(event);
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &EventQueue) -> Vec<InputEvent> {
        let mut events = Vec::new();
        queue.drain_into(|e| events.push(e));
        events
    }

    #[test]
    fn events_arrive_in_order() {
        let (tx, rx) = event_channel(8);

        tx.forward(InputEvent::KeyDown(Key::Escape));
        tx.forward(InputEvent::KeyUp(Key::Escape));
        tx.forward(InputEvent::KeyDown(Key::Enter));

        assert_eq!(
            drain(&rx),
            vec![
                InputEvent::KeyDown(Key::Escape),
                InputEvent::KeyUp(Key::Escape),
                InputEvent::KeyDown(Key::Enter),
            ]
        );
        assert!(rx.is_empty());
    }

    #[test]
    fn full_queue_drops_newest() {
        let (tx, rx) = event_channel(2);

        assert!(tx.forward(InputEvent::KeyDown(Key::A)));
        assert!(tx.forward(InputEvent::KeyDown(Key::B)));
        assert!(!tx.forward(InputEvent::KeyDown(Key::C)));

        assert_eq!(rx.len(), 2);
        assert_eq!(drain(&rx)[1], InputEvent::KeyDown(Key::B));
    }

    #[test]
    fn unknown_keys_are_not_forwarded() {
        let (tx, rx) = event_channel(4);

        assert!(!tx.forward(InputEvent::KeyDown(Key::Unknown)));
        assert!(rx.is_empty());
    }

    #[test]
    fn disconnected_queue_does_not_panic() {
        let (tx, rx) = event_channel(4);
        drop(rx);

        assert!(!tx.forward(InputEvent::KeyUp(Key::Space)));
    }

    #[test]
    fn event_accessors() {
        let down = InputEvent::KeyDown(Key::F1);
        assert_eq!(down.key(), Key::F1);
        assert!(down.is_down());
        assert!(!InputEvent::KeyUp(Key::F1).is_down());
    }
}
