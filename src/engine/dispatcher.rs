//=========================================================================
// Host Event Dispatcher
//=========================================================================
//
// Single-threaded consumer of the host event stream.
//
// Classification:
// ```text
//   HostEvent::Lifecycle(Focused)    → start sequence  (plugins, on_start,
//                                      tick loop, on_resume, motion queue)
//   HostEvent::Lifecycle(Background) → stop sequence   (on_pause, tick loop,
//                                      motion queue, on_stop, plugins)
//   HostEvent::Paint                 → on_render + present, request next paint
//   HostEvent::Resize                → ResizeEvent published immediately
//   HostEvent::Touch                 → MouseEvent enqueued (event mask gated)
// ```
//
// The dispatcher is the only writer of the lifecycle state and the only
// producer on the motion queue.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::app::{App, SyncHandle};
use crate::core::error::RuntimeError;
use crate::core::event::{ButtonId, MouseEvent, MouseEventKind, ResizeEvent};
use crate::core::lifecycle::{LifecycleState, SharedLifecycle};
use crate::core::motion_queue::MotionQueue;
use crate::core::platform_bridge::{Host, HostEvent, LifecycleStage, TouchPhase};
use crate::core::plugin::PluginRegistry;
use crate::core::runtime::Runtime;
use crate::core::tick::TickLoop;

//=== Dispatcher ==========================================================

pub(crate) struct Dispatcher<H: Host, A: App<H>> {
    app: Arc<A>,
    runtime: Runtime<H>,
    lifecycle: Arc<SharedLifecycle>,
    plugins: PluginRegistry<H>,
    sync: SyncHandle,
    tick_loop: Option<TickLoop>,
    motion_queue: Option<MotionQueue>,
    last_render: Option<Instant>,
    focus_periods: u64,
}

impl<H: Host, A: App<H>> Dispatcher<H, A> {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(app: Arc<A>, runtime: Runtime<H>, plugins: PluginRegistry<H>) -> Self {
        Self {
            app,
            runtime,
            lifecycle: Arc::new(SharedLifecycle::new()),
            plugins,
            sync: SyncHandle::new(),
            tick_loop: None,
            motion_queue: None,
            last_render: None,
            focus_periods: 0,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub(crate) fn state(&self) -> LifecycleState {
        self.lifecycle.get()
    }

    pub(crate) fn runtime(&self) -> &Runtime<H> {
        &self.runtime
    }

    pub(crate) fn focus_periods(&self) -> u64 {
        self.focus_periods
    }

    /// Events waiting in the current motion queue, `None` outside a focus
    /// period.
    pub(crate) fn pending_motion_events(&self) -> Option<usize> {
        self.motion_queue.as_ref().map(MotionQueue::len)
    }

    //--- Dispatch ---------------------------------------------------------

    /// Classifies and handles one host event.
    ///
    /// # Errors
    ///
    /// Only a failing `on_start` (or a tick/forwarder thread that cannot
    /// be spawned) is an error; every other mismatch is logged and ignored.
    pub(crate) fn dispatch(&mut self, event: HostEvent<H::Context>) -> Result<(), RuntimeError> {
        match event {
            HostEvent::Lifecycle(LifecycleStage::Focused { context }) => self.on_focused(context)?,
            HostEvent::Lifecycle(LifecycleStage::Background) => self.on_background(),
            HostEvent::Paint { external } => self.on_paint(external),
            HostEvent::Resize { width, height } => self.on_resize(width, height),
            HostEvent::Touch {
                sequence,
                phase,
                x,
                y,
            } => self.on_touch(sequence, phase, x, y),
        }
        Ok(())
    }

    //--- Lifecycle --------------------------------------------------------

    fn on_focused(&mut self, context: Option<H::Context>) -> Result<(), RuntimeError> {
        let state = self.lifecycle.get();
        if !state.can_transition_to(LifecycleState::Started) {
            warn!(target: "runtime::dispatch", "Focus received while {:?}, ignoring", state);
            return Ok(());
        }

        if context.is_none() {
            warn!(
                target: "runtime::dispatch",
                "Focused without a usable render context, paint events will be skipped"
            );
        }
        self.runtime.replace_renderer(context);

        self.plugins.init_all(&self.runtime);
        self.app.on_start(&self.runtime).map_err(RuntimeError::Start)?;
        self.transition(LifecycleState::Started);

        let app = Arc::clone(&self.app);
        let tick_loop = TickLoop::start(Arc::clone(&self.lifecycle), self.sync.clone(), move |elapsed, sync| {
            app.on_tick(elapsed, sync)
        })
        .context("spawning tick loop")
        .map_err(RuntimeError::Start)?;
        self.tick_loop = Some(tick_loop);

        self.app.on_resume();
        self.transition(LifecycleState::Resumed);

        let capacity = self.runtime.settings().motion_queue_capacity;
        let queue = MotionQueue::open(capacity, self.runtime.bus().clone())
            .context("spawning motion forwarder")
            .map_err(RuntimeError::Start)?;
        self.motion_queue = Some(queue);

        self.last_render = None;
        self.focus_periods += 1;
        info!(target: "runtime", "Focus period {} started", self.focus_periods);
        Ok(())
    }

    fn on_background(&mut self) {
        let state = self.lifecycle.get();
        if !state.can_transition_to(LifecycleState::Paused) {
            warn!(target: "runtime::dispatch", "Background received while {:?}, ignoring", state);
            return;
        }
        self.stop_focus_period();
    }

    /// Runs the stop sequence for the active focus period.
    fn stop_focus_period(&mut self) {
        let timeout = self.runtime.settings().shutdown_timeout();

        self.transition(LifecycleState::Paused);
        self.app.on_pause();
        self.transition(LifecycleState::Stopped);

        if let Some(tick_loop) = self.tick_loop.take() {
            tick_loop.stop(timeout);
        }
        if let Some(mut queue) = self.motion_queue.take() {
            queue.close(timeout);
        }

        self.app.on_stop();
        self.runtime.replace_renderer(None);
        self.plugins.dispose_all();

        info!(target: "runtime", "Focus period {} stopped", self.focus_periods);
    }

    /// Quiesces everything before teardown.
    ///
    /// An active focus period is stopped first so workers never outlive
    /// the dispatcher. Resources left behind by a failed start (render
    /// context, initialized plugins) are released as well.
    pub(crate) fn shutdown(&mut self) {
        let state = self.lifecycle.get();
        if state == LifecycleState::Disposed {
            return;
        }

        if !state.is_stopped() {
            debug!(target: "runtime", "Teardown while {:?}, stopping focus period", state);
            self.stop_focus_period();
        }

        self.runtime.replace_renderer(None);
        self.plugins.dispose_all();
        self.transition(LifecycleState::Disposed);
    }

    fn transition(&self, to: LifecycleState) {
        if let Err(e) = self.lifecycle.transition(to) {
            warn!(target: "runtime::dispatch", "{}", e);
        }
    }

    //--- Paint ------------------------------------------------------------

    fn on_paint(&mut self, external: bool) {
        if self.lifecycle.is_paused() {
            trace!(target: "runtime::dispatch", "Paint while paused, skipped");
            return;
        }

        if self.runtime.has_renderer() && !external {
            let now = Instant::now();
            let elapsed = self.last_render.map_or(Duration::ZERO, |t| now - t);
            self.last_render = Some(now);

            self.app.on_render(elapsed, &self.sync);
            self.runtime.host().present();
        }

        self.runtime.host().request_paint();
    }

    //--- Resize -----------------------------------------------------------

    fn on_resize(&self, width: i32, height: i32) {
        trace!(target: "runtime::dispatch", "Resize {}x{}", width, height);
        self.runtime.publish(ResizeEvent { width, height });
    }

    //--- Touch ------------------------------------------------------------

    fn on_touch(&self, sequence: u64, phase: TouchPhase, x: f32, y: f32) {
        let Some(kind) = MouseEventKind::from_touch_phase(phase) else {
            trace!(target: "runtime::dispatch", "Touch phase {:?} ignored", phase);
            return;
        };

        if !self.runtime.settings().forwards(kind.class()) {
            return;
        }

        let event = MouseEvent {
            x: x as i32,
            y: y as i32,
            kind,
            button: ButtonId::from_touch_sequence(sequence),
        };

        match &self.motion_queue {
            Some(queue) => {
                if let Err(e) = queue.push(event) {
                    warn!(target: "runtime::dispatch", "Dropping {:?}: {}", event, e);
                }
            }
            None => {
                debug!(target: "runtime::dispatch", "Touch outside a focus period dropped: {:?}", event);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
