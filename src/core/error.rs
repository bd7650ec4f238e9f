//=========================================================================
// Runtime Errors
//=========================================================================
//
// Typed failures surfaced by the runtime.
//
// Taxonomy:
// - Fatal setup errors (`on_create` / `on_start`) → RuntimeError
// - Recoverable asset I/O → AssetError
// - Recoverable classification / state mismatches → QueueError,
//   LifecycleError (logged by the dispatcher, never a crash)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::lifecycle::LifecycleState;

//=== RuntimeError ========================================================

/// Unrecoverable errors that terminate [`crate::Engine::run`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The application rejected its settings in `on_create`.
    #[error("application create failed: {0:#}")]
    Create(#[source] anyhow::Error),

    /// The application failed to start on a focus transition.
    #[error("application start failed: {0:#}")]
    Start(#[source] anyhow::Error),

    /// Settings left invalid after `on_create`.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The host platform could not be driven.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

//=== PlatformError =======================================================

/// Host platform initialization and execution errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// The host window could not be created.
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(String),
}

//=== AssetError ==========================================================

/// Asset lookup failures, recoverable by the application.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("asset {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//=== QueueError ==========================================================

/// Motion queue send failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue was closed by a background transition.
    #[error("motion queue is closed")]
    Closed,

    /// The forwarder is gone (it panicked or was detached).
    #[error("motion queue has no consumer")]
    Disconnected,
}

//=== LifecycleError ======================================================

/// Rejected lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("illegal lifecycle transition {from:?} -> {to:?}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}

//=== PluginError =========================================================

/// A plugin failed to initialize.
#[derive(Debug, Error)]
#[error("plugin '{name}' failed to initialize: {source:#}")]
pub struct PluginError {
    pub name: String,
    #[source]
    pub source: anyhow::Error,
}

//=== ConfigError =========================================================

/// Settings loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings parse error in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

//=========================================================================
// Unit Tests
//=========================================================================
