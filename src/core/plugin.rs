//=========================================================================
// Plugins
//=========================================================================
//
// Extension points bound to the focus lifecycle.
//
// Every registered plugin is initialized at each focus transition, before
// `on_start`, and released at each background transition and at
// teardown. Plugins typically subscribe to the event bus in `init` and
// drop their subscriptions in `dispose`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error};

//=== Internal Dependencies ===============================================

use super::error::PluginError;
use super::platform_bridge::Host;
use super::runtime::Runtime;

//=== Plugin Trait ========================================================

pub trait Plugin<H: Host>: Send + Sync + 'static {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Called at each focus transition.
    fn init(&self, runtime: &Runtime<H>) -> anyhow::Result<()>;

    /// Called when the focus period ends, only if `init` succeeded.
    fn dispose(&self) {}
}

//=== PluginRegistry ======================================================

struct Entry<H: Host> {
    plugin: Box<dyn Plugin<H>>,
    active: bool,
}

/// Ordered set of plugins owned by the engine.
pub(crate) struct PluginRegistry<H: Host> {
    entries: Vec<Entry<H>>,
}

impl<H: Host> PluginRegistry<H> {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub(crate) fn register(&mut self, plugin: Box<dyn Plugin<H>>) {
        debug!(target: "runtime::plugins", "Registered plugin '{}'", plugin.name());
        self.entries.push(Entry {
            plugin,
            active: false,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Initializes every inactive plugin in registration order.
    ///
    /// A failing plugin is logged and stays inactive; the others still run.
    pub(crate) fn init_all(&mut self, runtime: &Runtime<H>) -> Vec<PluginError> {
        let mut failures = Vec::new();

        for entry in self.entries.iter_mut().filter(|e| !e.active) {
            match entry.plugin.init(runtime) {
                Ok(()) => {
                    entry.active = true;
                    debug!(target: "runtime::plugins", "Plugin '{}' initialized", entry.plugin.name());
                }
                Err(source) => {
                    let failure = PluginError {
                        name: entry.plugin.name().to_string(),
                        source,
                    };
                    error!(target: "runtime::plugins", "{}", failure);
                    failures.push(failure);
                }
            }
        }

        failures
    }

    /// Releases active plugins in reverse registration order.
    ///
    /// Returns the number of plugins disposed.
    pub(crate) fn dispose_all(&mut self) -> usize {
        let mut disposed = 0;

        for entry in self.entries.iter_mut().rev().filter(|e| e.active) {
            entry.plugin.dispose();
            entry.active = false;
            disposed += 1;
            debug!(target: "runtime::plugins", "Plugin '{}' released", entry.plugin.name());
        }

        disposed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
