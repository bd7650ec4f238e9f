//=========================================================================
// Lifecycle State Machine
//=========================================================================
//
// Tracks whether the runtime is created, started, resumed, paused,
// stopped or disposed.
//
// Transitions:
// ```text
//   Created ──► Started ──► Resumed ⇄ Paused ──► Stopped ──► Disposed
//                  ▲                                │
//                  └────────── (re-focus) ──────────┘
//   (any state) ──► Disposed
// ```
//
// The state lives in an atomic cell so the tick loop and render path
// can read it from other threads. The dispatcher is the only writer.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU8, Ordering};

use log::debug;

//=== Internal Dependencies ===============================================

use super::error::LifecycleError;

//=== LifecycleState ======================================================

/// Discrete runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LifecycleState {
    /// `on_create` ran; no host surface acquired yet.
    Created = 0,

    /// `on_start` ran and the tick loop exists, but `on_resume` has not.
    Started = 1,

    /// Running: ticks and renders are forwarded.
    Resumed = 2,

    /// Focus lost; `on_pause` is running or has run.
    Paused = 3,

    /// Backgrounded: no tick loop, no queue, no render context.
    Stopped = 4,

    /// Teardown completed.
    Disposed = 5,
}

impl LifecycleState {
    /// Ticks and renders are suppressed in every state except `Resumed`.
    pub fn is_paused(self) -> bool {
        !matches!(self, Self::Resumed)
    }

    /// No focus period is active.
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Created | Self::Stopped | Self::Disposed)
    }

    /// Returns true if `self → to` is a legal transition.
    pub fn can_transition_to(self, to: Self) -> bool {
        use LifecycleState::*;
        matches!(
            (self, to),
            (Created | Stopped, Started)
                | (Started | Paused, Resumed)
                | (Started | Resumed, Paused)
                | (Paused, Stopped)
                | (_, Disposed)
        ) && self != Disposed
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Created,
            1 => Self::Started,
            2 => Self::Resumed,
            3 => Self::Paused,
            4 => Self::Stopped,
            _ => Self::Disposed,
        }
    }
}

//=== SharedLifecycle =====================================================

/// Lock-free lifecycle cell shared between the dispatcher and workers.
#[derive(Debug)]
pub struct SharedLifecycle {
    state: AtomicU8,
}

impl SharedLifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Created as u8),
        }
    }

    pub fn get(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_paused(&self) -> bool {
        self.get().is_paused()
    }

    pub fn is_stopped(&self) -> bool {
        self.get().is_stopped()
    }

    /// Moves to `to`, rejecting illegal transitions without touching the
    /// current state.
    pub(crate) fn transition(&self, to: LifecycleState) -> Result<LifecycleState, LifecycleError> {
        let from = self.get();
        if !from.can_transition_to(to) {
            return Err(LifecycleError::InvalidTransition { from, to });
        }
        self.state.store(to as u8, Ordering::Release);
        debug!(target: "runtime", "Lifecycle {:?} -> {:?}", from, to);
        Ok(from)
    }
}

impl Default for SharedLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
