//=========================================================================
// Application Contract
//=========================================================================
//
// Capability interface every embedding application implements.
//
// Callback order for one process:
// ```text
//   on_create ─┬─► on_start ─► on_resume ─► (on_tick ∥ on_render)* ─► on_pause ─► on_stop ─┐
//              │      ▲                                                                   │
//              │      └────────────────────────── next focus ─────────────────────────────┘
//              └─► on_dispose (once, at teardown)
// ```
//
// `on_tick` runs on the tick thread while `on_render` runs on the host
// thread. The runtime never locks around either; applications serialize
// shared state through the `SyncHandle` passed to both.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

//=== Internal Dependencies ===============================================

use super::platform_bridge::Host;
use super::runtime::Runtime;
use super::settings::Settings;

//=== App Trait ===========================================================

/// Lifecycle callbacks driven by the runtime.
///
/// Only `on_start`, `on_tick` and `on_render` are required; the remaining
/// hooks default to no-ops.
///
/// ```rust
/// # use std::time::Duration;
/// # use aetheric_mobile::prelude::*;
/// struct Game;
///
/// impl<H: Host> App<H> for Game {
///     fn on_start(&self, runtime: &Runtime<H>) -> anyhow::Result<()> {
///         runtime.subscribe(Channel::Mouse, |event| println!("{:?}", event));
///         Ok(())
///     }
///
///     fn on_tick(&self, _elapsed: Duration, sync: &SyncHandle) {
///         let _guard = sync.lock();
///     }
///
///     fn on_render(&self, _elapsed: Duration, sync: &SyncHandle) {
///         let _guard = sync.lock();
///     }
/// }
/// ```
pub trait App<H: Host>: Send + Sync + 'static {
    /// Called once before the host is acquired. May adjust settings.
    ///
    /// An error aborts the runtime.
    fn on_create(&self, _settings: &mut Settings) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called on every focus transition with the runtime handle.
    ///
    /// An error aborts the runtime.
    fn on_start(&self, runtime: &Runtime<H>) -> anyhow::Result<()>;

    /// Called after `on_start`, right before ticks and renders flow.
    fn on_resume(&self) {}

    /// Logic step. `elapsed` is the wall time since the previous tick.
    fn on_tick(&self, elapsed: Duration, sync: &SyncHandle);

    /// Frame step. `elapsed` is the wall time since the previous render.
    fn on_render(&self, elapsed: Duration, sync: &SyncHandle);

    /// Called when focus is lost, before `on_stop`.
    fn on_pause(&self) {}

    /// Called after `on_pause` once the tick loop and motion queue are
    /// shut down.
    fn on_stop(&self) {}

    /// Called exactly once at teardown. Errors are logged.
    fn on_dispose(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

//=== SyncHandle ==========================================================

/// Mutex shared by `on_tick` and `on_render`.
///
/// Cloning is cheap; all clones guard the same lock.
#[derive(Debug, Clone, Default)]
pub struct SyncHandle {
    lock: Arc<Mutex<()>>,
}

impl SyncHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the handle is acquired.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Acquires the handle if it is free.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, ()>> {
        self.lock.try_lock()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
