//=========================================================================
// Motion Event Queue
//=========================================================================
//
// Bounded, order-preserving buffer between the touch handler and the
// event bus.
//
// Architecture:
// ```text
//   Dispatcher ──push()──► bounded(capacity) ──► Forwarder thread ──► EventBus
//                 (blocks when full)               (blocks when empty)
// ```
//
// One queue per focus period: opened at focus, closed at background and
// never reused. Closing drops the only sender, which disconnects the
// channel: the forwarder delivers what was already accepted, then its
// receive fails and the thread exits.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::error::QueueError;
use super::event::MouseEvent;
use super::message_bus::EventBus;
use super::worker::{Worker, WorkerExit};

//=== MotionQueue =========================================================

/// Producer side of a motion queue plus its forwarder thread.
pub(crate) struct MotionQueue {
    sender: Option<Sender<MouseEvent>>,
    forwarder: Option<Worker>,
    capacity: usize,
}

impl MotionQueue {
    /// Creates an empty queue and starts its forwarder.
    pub(crate) fn open(capacity: usize, bus: EventBus) -> io::Result<Self> {
        let (sender, receiver) = bounded(capacity);
        let forwarder = Worker::spawn("aetheric-motion", move || forward(receiver, bus))?;

        debug!(target: "runtime::queue", "Motion queue opened (capacity: {})", capacity);
        Ok(Self {
            sender: Some(sender),
            forwarder: Some(forwarder),
            capacity,
        })
    }

    /// Enqueues `event`, blocking while the queue is full.
    pub(crate) fn push(&self, event: MouseEvent) -> Result<(), QueueError> {
        let sender = self.sender.as_ref().ok_or(QueueError::Closed)?;
        sender.send(event).map_err(|_| QueueError::Disconnected)
    }

    /// Closes the queue and waits up to `timeout` for the forwarder to
    /// drain and exit. Closing twice is a no-op.
    pub(crate) fn close(&mut self, timeout: Duration) -> Option<WorkerExit> {
        if self.is_closed() {
            return None;
        }

        let pending = self.len();
        self.sender = None;

        let exit = self.forwarder.take()?.join(timeout);
        debug!(
            target: "runtime::queue",
            "Motion queue closed ({}/{} pending at close, forwarder {:?})",
            pending,
            self.capacity(),
            exit
        );
        Some(exit)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.sender.is_none()
    }

    /// Events accepted but not yet picked up by the forwarder.
    pub(crate) fn len(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Drop for MotionQueue {
    fn drop(&mut self) {
        // Never leave a forwarder blocked on a queue nobody can close.
        self.sender = None;
    }
}

//=== Forwarder ===========================================================

fn forward(receiver: Receiver<MouseEvent>, bus: EventBus) {
    let mut forwarded: u64 = 0;

    for event in receiver.iter() {
        trace!(target: "runtime::queue", "Forwarding {:?}", event);
        bus.publish(event);
        forwarded += 1;
    }

    debug!(target: "runtime::queue", "Forwarder exiting after {} events", forwarded);
}

//=========================================================================
// Unit Tests
//=========================================================================
