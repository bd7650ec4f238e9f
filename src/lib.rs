//=========================================================================
// Aetheric Mobile Library Root
//
// This crate defines the public API surface of the lifecycle runtime.
//
// Responsibilities:
// - Expose the runtime entry points (`EngineBuilder`, `Engine`, `Session`)
// - Keep internal modules (like `platform`) hidden from end users
// - Provide clean separation between the platform-independent core
//   and the Winit host adapter
//
// Typical usage:
// ```no_run
// use aetheric_mobile::prelude::*;
//
// fn main() -> Result<(), RuntimeError> {
//     run_winit(EngineBuilder::new().build(), MyApp)
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the platform-independent runtime (lifecycle, workers,
// event bus, contracts). It is exposed publicly so custom hosts can drive
// the runtime, but most applications only need the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit host adapter and is kept private, apart
// from `WinitHost` and `run_winit`.
//
// `engine` defines the builder, the engine and the dispatcher.
//
mod engine;
#[cfg(feature = "winit")]
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::runtime::Runtime;
pub use engine::{Engine, EngineBuilder, Session};
#[cfg(feature = "winit")]
pub use platform::{run_winit, WinitHost};
