//=========================================================================
// Event Bus
//=========================================================================
//
// Thread-safe publish/subscribe gateway for semantic events.
//
// Architecture:
//   Dispatcher / Forwarder → publish(event) → HashMap<Channel, Vec<Listener>>
//                                                   ↓
//                                   snapshot (read lock released)
//                                                   ↓
//                                   listeners, in subscription order
//
// Listeners may subscribe or unsubscribe from inside a callback: delivery
// works on a snapshot, so the lock is never held while user code runs.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::trace;
use parking_lot::RwLock;

//=== Internal Dependencies ===============================================

use crate::core::event::{Channel, Event};

//=== Public API ==========================================================

/// Callback invoked for every event published on a subscribed channel.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Token returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

//=========================================================================

/// Channel-routed event bus shared by the runtime, plugins and the
/// application.
///
/// Cloning is cheap; all clones share the same subscriptions.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    channels: RwLock<HashMap<Channel, Vec<(ListenerId, Listener)>>>,
}

impl EventBus {
    /// Creates a new bus with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Subscriptions ----------------------------------------------------

    /// Registers `listener` on `channel`.
    pub fn subscribe<F>(&self, channel: Channel, listener: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .channels
            .write()
            .entry(channel)
            .or_default()
            .push((id, Arc::new(listener)));

        trace!(target: "runtime::bus", "Listener {:?} subscribed to {:?}", id, channel);
        id
    }

    /// Removes a listener. Returns false if it was not subscribed to
    /// `channel`.
    pub fn unsubscribe(&self, channel: Channel, id: ListenerId) -> bool {
        let mut channels = self.inner.channels.write();
        let Some(listeners) = channels.get_mut(&channel) else {
            return false;
        };

        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        let removed = listeners.len() != before;

        if removed {
            trace!(target: "runtime::bus", "Listener {:?} unsubscribed from {:?}", id, channel);
        }
        removed
    }

    //--- Publishing -------------------------------------------------------

    /// Delivers `event` synchronously to every listener of its channel.
    ///
    /// Returns the number of listeners invoked.
    pub fn publish(&self, event: impl Into<Event>) -> usize {
        let event = event.into();
        let channel = event.channel();

        let snapshot: Vec<Listener> = match self.inner.channels.read().get(&channel) {
            Some(listeners) => listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            None => return 0,
        };

        for listener in &snapshot {
            listener(&event);
        }
        snapshot.len()
    }

    //--- Query API --------------------------------------------------------

    /// Returns the number of listeners on `channel`.
    pub fn listener_count(&self, channel: Channel) -> usize {
        self.inner
            .channels
            .read()
            .get(&channel)
            .map_or(0, Vec::len)
    }

    /// Drops every subscription on every channel.
    pub fn clear(&self) {
        self.inner.channels.write().clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = self.inner.channels.read();
        let counts: HashMap<&Channel, usize> = channels.iter().map(|(c, l)| (c, l.len())).collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{ButtonId, MouseEvent, MouseEventKind, ResizeEvent};
    use parking_lot::Mutex;

    fn mouse(x: i32) -> MouseEvent {
        MouseEvent {
            x,
            y: 0,
            kind: MouseEventKind::Move,
            button: ButtonId::First,
        }
    }

    fn recorder(bus: &EventBus, channel: Channel) -> (ListenerId, Arc<Mutex<Vec<Event>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = bus.subscribe(channel, move |e| sink.lock().push(*e));
        (id, seen)
    }

    #[test]
    fn new_bus_has_no_listeners() {
        let bus = EventBus::new();
        assert_eq!(bus.listener_count(Channel::Mouse), 0);
        assert_eq!(bus.publish(mouse(1)), 0);
    }

    #[test]
    fn delivers_in_publish_order() {
        let bus = EventBus::new();
        let (_, seen) = recorder(&bus, Channel::Mouse);

        for x in 0..5 {
            bus.publish(mouse(x));
        }

        let xs: Vec<i32> = seen
            .lock()
            .iter()
            .map(|e| match e {
                Event::Mouse(m) => m.x,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(xs, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn channels_are_isolated() {
        let bus = EventBus::new();
        let (_, mice) = recorder(&bus, Channel::Mouse);
        let (_, sizes) = recorder(&bus, Channel::Resize);

        bus.publish(ResizeEvent { width: 800, height: 600 });

        assert!(mice.lock().is_empty());
        assert_eq!(
            sizes.lock().as_slice(),
            &[Event::Resize(ResizeEvent { width: 800, height: 600 })]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let (id, seen) = recorder(&bus, Channel::Mouse);

        assert!(bus.unsubscribe(Channel::Mouse, id));
        assert!(!bus.unsubscribe(Channel::Mouse, id), "second unsubscribe is a no-op");
        bus.publish(mouse(1));

        assert!(seen.lock().is_empty());
    }

    #[test]
    fn unsubscribe_on_wrong_channel_is_rejected() {
        let bus = EventBus::new();
        let (id, _) = recorder(&bus, Channel::Mouse);
        assert!(!bus.unsubscribe(Channel::Resize, id));
        assert_eq!(bus.listener_count(Channel::Mouse), 1);
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_delivery() {
        let bus = EventBus::new();
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(Mutex::new(0));

        let inner_bus = bus.clone();
        let inner_slot = Arc::clone(&slot);
        let inner_calls = Arc::clone(&calls);
        let id = bus.subscribe(Channel::Mouse, move |_| {
            *inner_calls.lock() += 1;
            if let Some(id) = *inner_slot.lock() {
                inner_bus.unsubscribe(Channel::Mouse, id);
            }
        });
        *slot.lock() = Some(id);

        bus.publish(mouse(1));
        bus.publish(mouse(2));

        assert_eq!(*calls.lock(), 1);
        assert_eq!(bus.listener_count(Channel::Mouse), 0);
    }

    #[test]
    fn unsubscribing_one_listener_keeps_others() {
        let bus = EventBus::new();
        let (first, first_seen) = recorder(&bus, Channel::Mouse);
        let (_, second_seen) = recorder(&bus, Channel::Mouse);

        bus.unsubscribe(Channel::Mouse, first);
        assert_eq!(bus.publish(mouse(3)), 1);

        assert!(first_seen.lock().is_empty());
        assert_eq!(second_seen.lock().len(), 1);
    }

    #[test]
    fn concurrent_subscribe_does_not_disturb_delivery() {
        let bus = EventBus::new();
        let (_, seen) = recorder(&bus, Channel::Mouse);

        let churn_bus = bus.clone();
        let churn = std::thread::spawn(move || {
            for _ in 0..200 {
                let id = churn_bus.subscribe(Channel::Mouse, |_| {});
                churn_bus.unsubscribe(Channel::Mouse, id);
            }
        });

        for x in 0..200 {
            bus.publish(mouse(x));
        }
        churn.join().unwrap();

        assert_eq!(seen.lock().len(), 200);
    }

    #[test]
    fn clear_drops_all_subscriptions() {
        let bus = EventBus::new();
        recorder(&bus, Channel::Mouse);
        recorder(&bus, Channel::Resize);

        bus.clear();

        assert_eq!(bus.listener_count(Channel::Mouse), 0);
        assert_eq!(bus.listener_count(Channel::Resize), 0);
    }
}
