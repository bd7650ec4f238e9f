//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Host-to-core interface types (capabilities and events).
//
// Defines the contract between a host shell (winit, a native activity,
// a test harness) and the dispatcher. Hosts are resolved at compile
// time through the `Host` trait; no runtime type assertions.
//
//=========================================================================

//=== Host ================================================================

/// Host-control capability.
///
/// Implemented once per platform surface. The associated `Context` is the
/// draw-context handle delivered with a focus transition.
pub trait Host: Send + Sync + 'static {
    /// Render context valid for one focus period.
    type Context: RenderContext;

    /// Signals that the frame rendered into the current context is done.
    fn present(&self);

    /// Asks the host to deliver another paint event.
    fn request_paint(&self);
}

/// Render-context capability.
///
/// Contexts are cheap handles (typically an `Arc`) shared with the
/// application through [`crate::Runtime::renderer`].
pub trait RenderContext: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> RenderContext for T {}

//=== LifecycleStage ======================================================

/// Host lifecycle stage the application is moving to.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleStage<C> {
    /// Application is visible and has input focus.
    ///
    /// `context` is `None` when the host could not provide a draw
    /// context of the expected kind.
    Focused { context: Option<C> },

    /// Application is alive but backgrounded (focus lost, surface gone).
    Background,
}

//=== TouchPhase ==========================================================

/// Host touch phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Begin,
    Move,
    End,
    /// Gesture aborted by the system; has no pointer equivalent.
    Cancel,
}

//=== HostEvent ===========================================================

/// Events delivered by the host, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent<C> {
    Lifecycle(LifecycleStage<C>),

    /// Frame-ready notification. `external` paints were not requested by
    /// the runtime and are never rendered.
    Paint { external: bool },

    /// Surface size in physical pixels.
    Resize { width: i32, height: i32 },

    /// Touch input; `sequence` identifies the finger.
    Touch {
        sequence: u64,
        phase: TouchPhase,
        x: f32,
        y: f32,
    },
}

impl<C> HostEvent<C> {
    pub fn focused(context: C) -> Self {
        Self::Lifecycle(LifecycleStage::Focused { context: Some(context) })
    }

    pub fn background() -> Self {
        Self::Lifecycle(LifecycleStage::Background)
    }

    pub fn paint() -> Self {
        Self::Paint { external: false }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
