//=========================================================================
// Core Runtime
//
// Platform-independent half of the lifecycle runtime.
//
// Responsibilities:
// - Define the application and host contracts (`App`, `Host`)
// - Model the lifecycle as an atomic state machine
// - Run the per-focus worker threads (tick loop, motion forwarder)
// - Route resize and pointer events through the event bus
//
// Notes:
// Nothing here depends on a windowing library. Hosts reach the core
// through `platform_bridge::HostEvent` and the `Host` capability trait.
//
//=========================================================================

//=== Public Modules ======================================================

pub mod app;
pub mod assets;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod message_bus;
pub mod platform_bridge;
pub mod plugin;
pub mod runtime;
pub mod settings;

//=== Internal Modules ====================================================

pub(crate) mod motion_queue;
pub(crate) mod tick;
pub(crate) mod worker;

//=== Re-exports ==========================================================

pub use app::{App, SyncHandle};
pub use assets::{AssetSource, FsAssets};
pub use error::{AssetError, ConfigError, LifecycleError, PlatformError, PluginError, QueueError, RuntimeError};
pub use event::{ButtonId, Channel, Event, MouseEvent, MouseEventKind, ResizeEvent};
pub use lifecycle::LifecycleState;
pub use message_bus::{EventBus, ListenerId};
pub use platform_bridge::{Host, HostEvent, LifecycleStage, RenderContext, TouchPhase};
pub use plugin::Plugin;
pub use runtime::Runtime;
pub use settings::{EventMask, Settings};
