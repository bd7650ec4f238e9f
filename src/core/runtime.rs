//=========================================================================
// Runtime Handle
//=========================================================================
//
// Handle given to the application in `on_start`.
//
// Exposes asset loading, the host and renderer capabilities, the frozen
// settings and the event bus. Every field is shared, so the handle is
// cheap to clone and safe to keep across callbacks; the engine owns the
// underlying resources for the whole process.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

//=== Internal Dependencies ===============================================

use super::assets::AssetSource;
use super::error::AssetError;
use super::event::{Channel, Event};
use super::message_bus::{EventBus, ListenerId};
use super::platform_bridge::Host;
use super::settings::Settings;

//=== Runtime =============================================================

/// Application-facing runtime handle.
pub struct Runtime<H: Host> {
    host: Arc<H>,
    context: Arc<RwLock<Option<H::Context>>>,
    settings: Arc<Settings>,
    bus: EventBus,
    assets: Arc<dyn AssetSource>,
}

impl<H: Host> Runtime<H> {
    pub(crate) fn new(
        host: Arc<H>,
        settings: Arc<Settings>,
        bus: EventBus,
        assets: Arc<dyn AssetSource>,
    ) -> Self {
        Self {
            host,
            context: Arc::new(RwLock::new(None)),
            settings,
            bus,
            assets,
        }
    }

    //--- Assets -----------------------------------------------------------

    /// Reads the raw bytes of the asset at `path`.
    pub fn asset(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, AssetError> {
        self.assets.read(path.as_ref())
    }

    //--- Capabilities -----------------------------------------------------

    /// Host-control capability.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Render context of the current focus period, if any.
    pub fn renderer(&self) -> Option<H::Context> {
        self.context.read().clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn has_renderer(&self) -> bool {
        self.context.read().is_some()
    }

    /// Installs (or clears) the render context, returning the previous one.
    pub(crate) fn replace_renderer(&self, context: Option<H::Context>) -> Option<H::Context> {
        std::mem::replace(&mut *self.context.write(), context)
    }

    //--- Event Bus --------------------------------------------------------

    pub fn subscribe<F>(&self, channel: Channel, listener: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bus.subscribe(channel, listener)
    }

    pub fn unsubscribe(&self, channel: Channel, id: ListenerId) -> bool {
        self.bus.unsubscribe(channel, id)
    }

    pub fn publish(&self, event: impl Into<Event>) -> usize {
        self.bus.publish(event)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

impl<H: Host> Clone for Runtime<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            context: Arc::clone(&self.context),
            settings: Arc::clone(&self.settings),
            bus: self.bus.clone(),
            assets: Arc::clone(&self.assets),
        }
    }
}

impl<H: Host> fmt::Debug for Runtime<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("settings", &self.settings)
            .field("has_renderer", &self.has_renderer())
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
