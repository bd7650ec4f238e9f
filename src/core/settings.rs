//=========================================================================
// Settings
//=========================================================================
//
// Configuration snapshot produced once at creation time.
//
// Sources, in order of precedence:
//   EngineBuilder::with_*()  →  App::on_create(&mut Settings)
//
// Settings can also be loaded from TOML before being handed to the
// builder. After `on_create` returns, the snapshot is frozen and shared.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;
use std::time::Duration;

use bitflags::bitflags;
use log::debug;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::error::ConfigError;

//=== EventMask ===========================================================

bitflags! {
    /// Semantic event classes forwarded from touch input.
    ///
    /// Any class not set here is never enqueued or published.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct EventMask: u32 {
        /// Down / Up pointer transitions.
        const MOUSE_BUTTON = 1 << 0;
        /// Pointer motion.
        const MOUSE_MOTION = 1 << 1;
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::empty()
    }
}

//=== Settings ============================================================

/// Runtime configuration.
///
/// # Default Values
///
/// - **event_mask**: empty (touch input is opt-in)
/// - **motion_queue_capacity**: 100 events
/// - **shutdown_timeout_ms**: 1000
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Application name, used as window title by desktop hosts.
    pub name: String,

    /// Preferred surface size. Mobile hosts ignore it.
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,

    /// Event classes forwarded to the bus.
    pub event_mask: EventMask,

    /// Capacity of the per-focus motion queue.
    pub motion_queue_capacity: usize,

    /// Upper bound on waiting for worker threads during a background
    /// transition.
    pub shutdown_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "Aetheric".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            event_mask: EventMask::empty(),
            motion_queue_capacity: 100,
            shutdown_timeout_ms: 1000,
        }
    }
}

impl Settings {
    //--- Loading ----------------------------------------------------------

    /// Parses settings from TOML. Missing fields keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Self::parse(source, "<inline>")
    }

    /// Loads settings from a TOML file, falling back to defaults when the
    /// file is missing or unreadable. A file that exists but does not
    /// parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(source) => Self::parse(&source, &path.display().to_string()),
            Err(e) => {
                debug!(target: "runtime", "No settings at {} ({}), using defaults", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    fn parse(source: &str, origin: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    //--- Validation -------------------------------------------------------

    /// Rejects values the runtime cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motion_queue_capacity == 0 {
            return Err(ConfigError::Invalid("motion_queue_capacity must be positive".into()));
        }
        if self.shutdown_timeout_ms == 0 {
            return Err(ConfigError::Invalid("shutdown_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    //--- Accessors --------------------------------------------------------

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Returns true if events of `class` are forwarded.
    pub fn forwards(&self, class: EventMask) -> bool {
        self.event_mask.intersects(class)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.motion_queue_capacity, 100);
        assert_eq!(settings.shutdown_timeout(), Duration::from_secs(1));
        assert!(settings.event_mask.is_empty());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn mask_gates_classes_independently() {
        let mut settings = Settings::default();
        settings.event_mask = EventMask::MOUSE_BUTTON;
        assert!(settings.forwards(EventMask::MOUSE_BUTTON));
        assert!(!settings.forwards(EventMask::MOUSE_MOTION));

        settings.event_mask = EventMask::MOUSE_MOTION;
        assert!(!settings.forwards(EventMask::MOUSE_BUTTON));
        assert!(settings.forwards(EventMask::MOUSE_MOTION));
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let settings = Settings::from_toml_str(
            r#"
            name = "demo"
            event_mask = "MOUSE_BUTTON | MOUSE_MOTION"
            motion_queue_capacity = 16
            "#,
        )
        .unwrap();

        assert_eq!(settings.name, "demo");
        assert_eq!(settings.event_mask, EventMask::all());
        assert_eq!(settings.motion_queue_capacity, 16);
        assert_eq!(settings.width, 800);
        assert_eq!(settings.shutdown_timeout_ms, 1000);
    }

    #[test]
    fn toml_rejects_zero_capacity() {
        let err = Settings::from_toml_str("motion_queue_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn toml_rejects_zero_timeout() {
        let err = Settings::from_toml_str("shutdown_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("shutdown_timeout_ms")));
    }

    #[test]
    fn toml_reports_parse_errors() {
        let err = Settings::from_toml_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fullscreen = true").unwrap();
        let settings = Settings::load_or_default(file.path()).unwrap();
        assert!(settings.fullscreen);
    }
}
