//=========================================================================
// Message Bus
//=========================================================================
//
// Publish/subscribe gateway used to fan lifecycle-derived events out to
// plugins and the application.
//
// Components:
// - `event_bus`: channel-routed listener registry
//
//=========================================================================

//=== Module Declarations =================================================

mod event_bus;

//=== Public API ==========================================================

pub use event_bus::{EventBus, Listener, ListenerId};
