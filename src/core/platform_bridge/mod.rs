//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges host shells (winit, native activities, test drivers) with the
// lifecycle core.
//
// This module defines the contract between host implementations and the
// dispatcher, so hosts can be swapped without changing core code.
//
//=========================================================================

//=== Module Declarations =================================================

mod interface;

//=== Public API ==========================================================

pub use interface::{Host, HostEvent, LifecycleStage, RenderContext, TouchPhase};
