//=========================================================================
// Aetheric Mobile Engine
//
// Main entry point and coordinator for the lifecycle runtime.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──start()──>  Session
//         │                          │                     │
//         ├─ with_settings()         └─ run()              ├─ dispatch()
//         ├─ with_event_mask()          drains a host      └─ finish()
//         ├─ with_motion_queue_capacity()  event channel      (on_dispose)
//         ├─ with_assets()
//         └─ with_plugin()
// ```
//
//=========================================================================

mod dispatcher;

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::app::App;
use crate::core::assets::{AssetSource, FsAssets};
use crate::core::error::RuntimeError;
use crate::core::lifecycle::LifecycleState;
use crate::core::message_bus::EventBus;
use crate::core::platform_bridge::{Host, HostEvent};
use crate::core::plugin::{Plugin, PluginRegistry};
use crate::core::runtime::Runtime;
use crate::core::settings::{EventMask, Settings};
use dispatcher::Dispatcher;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Settings**: [`Settings::default()`]
/// - **Assets**: [`FsAssets`] rooted at `assets/`
/// - **Plugins**: none
///
/// # Examples
///
/// ```no_run
/// # use aetheric_mobile::prelude::*;
/// # fn demo<H: Host>() -> Engine<H> {
/// EngineBuilder::<H>::new()
///     .with_event_mask(EventMask::MOUSE_BUTTON | EventMask::MOUSE_MOTION)
///     .with_motion_queue_capacity(256)
///     .build()
/// # }
/// ```
pub struct EngineBuilder<H: Host> {
    settings: Settings,
    assets: Arc<dyn AssetSource>,
    plugins: PluginRegistry<H>,
}

impl<H: Host> EngineBuilder<H> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            assets: Arc::new(FsAssets::default()),
            plugins: PluginRegistry::new(),
        }
    }

    /// Replaces all settings, e.g. with ones loaded from TOML.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Selects the touch classes forwarded to the event bus.
    ///
    /// Default: empty
    pub fn with_event_mask(mut self, mask: EventMask) -> Self {
        self.settings.event_mask = mask;
        self
    }

    /// Sets the capacity of the per-focus motion queue.
    ///
    /// Default: 100
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_motion_queue_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Motion queue capacity must be positive");
        self.settings.motion_queue_capacity = capacity;
        self
    }

    /// Bounds the wait for worker threads on a background transition.
    ///
    /// Default: 1s
    ///
    /// # Panics
    ///
    /// Panics if `timeout` is zero.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        assert!(!timeout.is_zero(), "Shutdown timeout must be positive");
        self.settings.shutdown_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the store behind [`Runtime::asset`].
    pub fn with_assets(mut self, assets: impl AssetSource) -> Self {
        self.assets = Arc::new(assets);
        self
    }

    /// Registers a plugin, initialized at every focus in registration
    /// order.
    pub fn with_plugin(mut self, plugin: impl Plugin<H>) -> Self {
        self.plugins.register(Box::new(plugin));
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine<H> {
        info!(
            target: "runtime",
            "Building engine (queue: {}, mask: {:?}, plugins: {})",
            self.settings.motion_queue_capacity,
            self.settings.event_mask,
            self.plugins.len()
        );

        Engine {
            settings: self.settings,
            assets: self.assets,
            plugins: self.plugins,
        }
    }
}

impl<H: Host> Default for EngineBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Lifecycle runtime, ready to be bound to an application and a host.
///
/// # Architecture
///
/// ```text
/// Engine (host thread)
///   ├─► Dispatcher (consumes HostEvents in arrival order)
///   │     ├─► Tick Loop thread     (on_tick, per focus period)
///   │     └─► Forwarder thread     (motion queue → EventBus, per focus period)
///   │
///   └─► Host (present / request_paint)
/// ```
pub struct Engine<H: Host> {
    settings: Settings,
    assets: Arc<dyn AssetSource>,
    plugins: PluginRegistry<H>,
}

impl<H: Host> Engine<H> {
    //--- Initialization ---------------------------------------------------

    /// Runs `on_create` and binds the application to `host`.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Create`] if `on_create` fails, in which case
    /// `on_dispose` is never called. [`RuntimeError::Config`] if the
    /// settings it leaves behind are invalid; the application was created,
    /// so `on_dispose` runs before returning.
    pub fn start<A: App<H>>(self, app: A, host: Arc<H>) -> Result<Session<H, A>, RuntimeError> {
        let mut settings = self.settings;

        if let Err(e) = app.on_create(&mut settings) {
            error!(target: "runtime", "on_create failed: {:#}", e);
            return Err(RuntimeError::Create(e));
        }

        if let Err(e) = settings.validate() {
            error!(target: "runtime", "Settings rejected after on_create: {}", e);
            dispose::<H, A>(&app);
            return Err(e.into());
        }

        info!(target: "runtime", "Application '{}' created", settings.name);

        let runtime = Runtime::new(host, Arc::new(settings), EventBus::new(), self.assets);
        let app = Arc::new(app);

        Ok(Session {
            dispatcher: Dispatcher::new(Arc::clone(&app), runtime, self.plugins),
            app,
            disposed: false,
        })
    }

    //--- Execution --------------------------------------------------------

    /// Drives the runtime from `events` until the host closes the channel.
    ///
    /// # Lifecycle
    ///
    /// 1. `on_create`
    /// 2. One dispatch per host event, in arrival order
    /// 3. Channel disconnected: active focus period stopped, `on_dispose`
    ///
    /// # Errors
    ///
    /// Fatal setup errors are logged and returned; teardown still runs.
    pub fn run<A: App<H>>(
        self,
        app: A,
        host: Arc<H>,
        events: Receiver<HostEvent<H::Context>>,
    ) -> Result<(), RuntimeError> {
        let mut session = self.start(app, host)?;
        info!(target: "runtime", "Runtime started, waiting for host events");

        let mut outcome = Ok(());
        for event in events.iter() {
            if let Err(e) = session.dispatch(event) {
                error!(target: "runtime", "Fatal: {}", e);
                outcome = Err(e);
                break;
            }
        }

        session.finish();
        info!(target: "runtime", "Runtime shutdown complete");
        outcome
    }
}

impl<H: Host> fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("settings", &self.settings)
            .field("plugins", &self.plugins.len())
            .finish_non_exhaustive()
    }
}

//=== Session =============================================================

/// A created application bound to its host.
///
/// Hosts that own their event loop push events through [`Session::dispatch`]
/// directly. Dropping the session performs teardown.
pub struct Session<H: Host, A: App<H>> {
    dispatcher: Dispatcher<H, A>,
    app: Arc<A>,
    disposed: bool,
}

impl<H: Host, A: App<H>> Session<H, A> {
    /// Handles one host event.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Start`] when the application fails to start. The
    /// session should be finished afterwards.
    pub fn dispatch(&mut self, event: HostEvent<H::Context>) -> Result<(), RuntimeError> {
        self.dispatcher.dispatch(event)
    }

    pub fn state(&self) -> LifecycleState {
        self.dispatcher.state()
    }

    pub fn runtime(&self) -> &Runtime<H> {
        self.dispatcher.runtime()
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    /// Number of focus periods started so far.
    pub fn focus_periods(&self) -> u64 {
        self.dispatcher.focus_periods()
    }

    /// Events accepted by the current motion queue but not yet forwarded.
    pub fn pending_motion_events(&self) -> Option<usize> {
        self.dispatcher.pending_motion_events()
    }

    /// Stops any active focus period, releases plugins and calls
    /// `on_dispose`.
    pub fn finish(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.dispatcher.shutdown();
        dispose::<H, A>(self.app.as_ref());
    }
}

impl<H: Host, A: App<H>> Drop for Session<H, A> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Final `on_dispose` call; a failure is only logged.
fn dispose<H: Host, A: App<H>>(app: &A) {
    if let Err(e) = app.on_dispose() {
        error!(target: "runtime", "on_dispose failed: {:#}", e);
    }
    info!(target: "runtime", "Application disposed");
}

//=========================================================================
// Unit Tests
//=========================================================================
