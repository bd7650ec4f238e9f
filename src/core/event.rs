//=========================================================================
// Semantic Event Types
//=========================================================================
//
// Closed set of events published to plugins and applications.
//
// This module abstracts platform-specific encodings (Android/iOS touch
// sequences, winit touch ids) into a small, portable event model that
// the bus can route by channel.
//
// Event Flow:
// ```text
// Host Layer (touch / size)
//         ↓
//    Dispatcher (classification + event mask)
//         ↓
//    Event (this module)
//         ↓
//    EventBus → listeners
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::platform_bridge::TouchPhase;
use super::settings::EventMask;

//=== ButtonId ============================================================

/// Logical pointer identity.
///
/// Touch hosts report a per-finger sequence index. The first three
/// fingers are promoted to logical buttons; any further finger is
/// reported with `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonId {
    #[default]
    None,
    First,
    Second,
    Third,
}

impl ButtonId {
    /// Maps a host touch sequence index to a logical button.
    pub fn from_touch_sequence(sequence: u64) -> Self {
        match sequence {
            0 => Self::First,
            1 => Self::Second,
            2 => Self::Third,
            _ => Self::None,
        }
    }
}

//=== MouseEventKind ======================================================

/// Pointer transition carried by a [`MouseEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down,
    Move,
    Up,
}

impl MouseEventKind {
    /// Maps a host touch phase; phases with no pointer equivalent
    /// (cancellation) yield `None`.
    pub fn from_touch_phase(phase: TouchPhase) -> Option<Self> {
        match phase {
            TouchPhase::Begin => Some(Self::Down),
            TouchPhase::Move => Some(Self::Move),
            TouchPhase::End => Some(Self::Up),
            TouchPhase::Cancel => None,
        }
    }

    /// Event-mask class this kind belongs to.
    pub fn class(self) -> EventMask {
        match self {
            Self::Down | Self::Up => EventMask::MOUSE_BUTTON,
            Self::Move => EventMask::MOUSE_MOTION,
        }
    }
}

//=== Event Payloads ======================================================

/// Render surface size change, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeEvent {
    pub width: i32,
    pub height: i32,
}

/// Pointer event derived from touch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub x: i32,
    pub y: i32,
    pub kind: MouseEventKind,
    pub button: ButtonId,
}

//=== Channel =============================================================

/// Bus channel an event is routed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Resize,
    Mouse,
}

//=== Event ===============================================================

/// Any event that can travel on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Resize(ResizeEvent),
    Mouse(MouseEvent),
}

impl Event {
    /// Channel subscribers must listen on to receive this event.
    pub fn channel(&self) -> Channel {
        match self {
            Self::Resize(_) => Channel::Resize,
            Self::Mouse(_) => Channel::Mouse,
        }
    }
}

impl From<ResizeEvent> for Event {
    fn from(event: ResizeEvent) -> Self {
        Self::Resize(event)
    }
}

impl From<MouseEvent> for Event {
    fn from(event: MouseEvent) -> Self {
        Self::Mouse(event)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
