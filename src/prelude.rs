//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_mobile::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, Session};

// Application and host contracts
pub use crate::core::app::{App, SyncHandle};
pub use crate::core::platform_bridge::{Host, HostEvent, LifecycleStage, TouchPhase};
pub use crate::core::plugin::Plugin;
pub use crate::core::runtime::Runtime;

// Events and bus
pub use crate::core::event::{ButtonId, Channel, Event, MouseEvent, MouseEventKind, ResizeEvent};
pub use crate::core::message_bus::{EventBus, ListenerId};

// Configuration, assets, errors
pub use crate::core::assets::{AssetSource, FsAssets};
pub use crate::core::error::{AssetError, RuntimeError};
pub use crate::core::lifecycle::LifecycleState;
pub use crate::core::settings::{EventMask, Settings};

// Winit host
#[cfg(feature = "winit")]
pub use crate::platform::{run_winit, WinitHost};
