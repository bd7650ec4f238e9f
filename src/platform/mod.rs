//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the runtime's dispatcher.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────────────┐
//  │  Winit Event Loop                                │
//  │   ├─ resumed()     → HostEvent::Lifecycle(Focused)
//  │   ├─ suspended()   → HostEvent::Lifecycle(Background)
//  │   └─ window_event()                              │
//  │        ├─ Resized / Touch / RedrawRequested      │
//  │        │    ↓ event_mapper                       │
//  │        │  Session::dispatch()                    │
//  │        └─ CloseRequested → exit                  │
//  └──────────────────────────────────────────────────┘
//        ↑ present() / request_paint()
//     WinitHost (pre_present_notify / request_redraw)
// ```
//
// Key Design Decisions:
// - **Window = render context**: created in `resumed()` and dropped in
//   `suspended()`, matching the mobile surface lifetime
// - **Fatal errors stop the loop**: a failing `on_start` or window
//   creation is stored and returned once the event loop exits
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `run_winit()`
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== External Crates =====================================================

use std::sync::Arc;

use log::*;
use parking_lot::RwLock;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::app::App;
use crate::core::error::{PlatformError, RuntimeError};
use crate::core::platform_bridge::{Host, HostEvent, LifecycleStage};
use crate::core::settings::Settings;
use crate::engine::{Engine, Session};
use event_mapper::{map_window_event, TouchSlots};

//=== WinitHost ===========================================================

/// Host capability backed by a Winit window.
///
/// The window doubles as the render context: applications get it from
/// [`crate::Runtime::renderer`] and build their surface on top of it.
#[derive(Debug, Default)]
pub struct WinitHost {
    window: RwLock<Option<Arc<Window>>>,
}

impl WinitHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn attach(&self, window: Arc<Window>) {
        *self.window.write() = Some(window);
    }

    fn detach(&self) -> Option<Arc<Window>> {
        self.window.write().take()
    }
}

impl Host for WinitHost {
    type Context = Arc<Window>;

    fn present(&self) {
        if let Some(window) = self.window.read().as_ref() {
            window.pre_present_notify();
        }
    }

    fn request_paint(&self) {
        if let Some(window) = self.window.read().as_ref() {
            window.request_redraw();
        }
    }
}

//=== Window Attributes ===================================================

fn window_attributes(settings: &Settings) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(settings.name.clone())
        .with_inner_size(LogicalSize::new(settings.width, settings.height));

    if settings.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

//=== WinitPlatform =======================================================

/// Winit application handler feeding a [`Session`].
///
/// # Lifecycle
///
/// 1. **Construction**: `WinitPlatform::new(session, host)`
/// 2. **Execution**: `event_loop.run_app(&mut platform)`
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: close requested or fatal error → loop exits →
///    `finish()` tears the session down
///
/// # Thread Safety
///
/// Must remain on the main thread. Only the tick loop and forwarder run
/// elsewhere, owned by the session.
struct WinitPlatform<A: App<WinitHost>> {
    session: Session<WinitHost, A>,
    host: Arc<WinitHost>,
    touches: TouchSlots,
    failure: Option<RuntimeError>,
}

impl<A: App<WinitHost>> WinitPlatform<A> {
    //--- Construction -----------------------------------------------------

    fn new(session: Session<WinitHost, A>, host: Arc<WinitHost>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            session,
            host,
            touches: TouchSlots::default(),
            failure: None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Forwards one event to the session, stopping the loop on a fatal
    /// error. Events after a failure are dropped.
    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: HostEvent<Arc<Window>>) {
        if self.failure.is_some() {
            return;
        }

        if let Err(e) = self.session.dispatch(event) {
            error!(target: "platform", "Fatal runtime error: {}", e);
            self.fail(event_loop, e);
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RuntimeError) {
        self.failure = Some(error);
        event_loop.exit();
    }

    /// Tears the session down and reports the first fatal error, if any.
    fn finish(self) -> Result<(), RuntimeError> {
        self.session.finish();
        self.host.detach();

        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

//=== Winit Integration ===================================================

impl<A: App<WinitHost>> ApplicationHandler for WinitPlatform<A> {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates a fresh window for every focus period.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.window.read().is_some() {
            debug!(target: "platform", "Window already exists, resume ignored");
            return;
        }

        let attrs = window_attributes(self.session.runtime().settings());

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                let window = Arc::new(window);
                self.host.attach(Arc::clone(&window));
                self.dispatch(event_loop, HostEvent::focused(Arc::clone(&window)));
                window.request_redraw();
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.fail(event_loop, PlatformError::WindowCreation(e.to_string()).into());
            }
        }
    }

    /// Called when the app is backgrounded (mobile only).
    ///
    /// The window's surface is invalid from here on, so it is dropped
    /// once the stop sequence has run.
    fn suspended(&mut self, event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Suspended, releasing window");
        self.dispatch(event_loop, HostEvent::Lifecycle(LifecycleStage::Background));
        self.host.detach();
        self.touches.clear();
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            info!(target: "platform", "Window close requested");
            event_loop.exit();
            return;
        }

        match map_window_event(&event, &mut self.touches) {
            Some(host_event) => {
                trace!(target: "platform::input", "{:?} → {:?}", event, host_event);
                self.dispatch(event_loop, host_event);
            }
            None => {
                // Ignore: Focused, keyboard, cursor, etc.
            }
        }
    }
}

//=== Entry Point =========================================================

/// Runs `app` on a Winit event loop until the window closes.
///
/// Blocks the calling thread, which must be the main thread on macOS and
/// iOS.
///
/// # Errors
///
/// Returns [`RuntimeError`] if `on_create` or `on_start` fails, or if the
/// event loop or window cannot be created. Teardown (`on_dispose`) runs in
/// every case except a failed `on_create`.
///
/// # Examples
///
/// ```no_run
/// # use std::time::Duration;
/// # use aetheric_mobile::prelude::*;
/// # struct Game;
/// # impl App<WinitHost> for Game {
/// #     fn on_start(&self, _: &Runtime<WinitHost>) -> anyhow::Result<()> { Ok(()) }
/// #     fn on_tick(&self, _: Duration, _: &SyncHandle) {}
/// #     fn on_render(&self, _: Duration, _: &SyncHandle) {}
/// # }
/// let engine = EngineBuilder::new()
///     .with_event_mask(EventMask::all())
///     .build();
///
/// run_winit(engine, Game)?;
/// # Ok::<(), RuntimeError>(())
/// ```
pub fn run_winit<A: App<WinitHost>>(engine: Engine<WinitHost>, app: A) -> Result<(), RuntimeError> {
    let host = Arc::new(WinitHost::new());
    let session = engine.start(app, Arc::clone(&host))?;

    debug!(target: "platform", "Starting Winit event loop");
    let event_loop = EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

    let mut platform = WinitPlatform::new(session, host);
    let outcome = event_loop
        .run_app(&mut platform)
        .map_err(|e| PlatformError::EventLoopExecution(e.to_string()));

    info!(target: "platform", "Platform event loop exited");
    let result = platform.finish();
    outcome?;
    result
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::Size;

    //=====================================================================
    // WinitHost Tests
    //=====================================================================

    #[test]
    fn host_without_window_is_inert() {
        let host = WinitHost::new();
        host.present();
        host.request_paint();
        assert!(host.detach().is_none());
    }

    //=====================================================================
    // Window Attribute Tests
    //=====================================================================

    #[test]
    fn window_follows_settings() {
        let settings = Settings {
            name: "Demo".into(),
            width: 320,
            height: 480,
            ..Settings::default()
        };

        let attrs = window_attributes(&settings);

        assert_eq!(attrs.title, "Demo");
        assert_eq!(attrs.inner_size, Some(Size::Logical(LogicalSize::new(320.0, 480.0))));
        assert!(attrs.fullscreen.is_none());
    }

    #[test]
    fn fullscreen_setting_requests_borderless() {
        let settings = Settings {
            fullscreen: true,
            ..Settings::default()
        };

        let attrs = window_attributes(&settings);

        assert_eq!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
    }
}
