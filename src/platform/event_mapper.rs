//=========================================================================
// Platform Event Mapper
//
// Converts Winit window events to runtime-level `HostEvent` types.
// Provides a clean separation between OS-specific input and the
// runtime's host event representation.
//
// Responsibilities:
// - Translate resize, touch and redraw events
// - Ignore unsupported or irrelevant Winit events
//
//=========================================================================

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{TouchPhase as WinitTouchPhase, WindowEvent};

use crate::core::platform_bridge::{HostEvent, TouchPhase};

//=== Touch Conversion ====================================================

impl From<WinitTouchPhase> for TouchPhase {
    fn from(phase: WinitTouchPhase) -> Self {
        match phase {
            WinitTouchPhase::Started => TouchPhase::Begin,
            WinitTouchPhase::Moved => TouchPhase::Move,
            WinitTouchPhase::Ended => TouchPhase::End,
            WinitTouchPhase::Cancelled => TouchPhase::Cancel,
        }
    }
}

//--- Finger Slots --------------------------------------------------------
//
// Winit finger ids are opaque (pointer-derived on iOS), while the runtime
// maps sequence 0/1/2 to the first three buttons. Each active finger gets
// the lowest free slot, released when the finger lifts.
//

#[derive(Debug, Default)]
pub(crate) struct TouchSlots {
    fingers: Vec<Option<u64>>,
}

impl TouchSlots {
    pub(crate) fn slot(&mut self, id: u64, phase: WinitTouchPhase) -> u64 {
        let slot = match self.fingers.iter().position(|f| *f == Some(id)) {
            Some(slot) => slot,
            None => self.claim(id),
        };

        if matches!(phase, WinitTouchPhase::Ended | WinitTouchPhase::Cancelled) {
            self.fingers[slot] = None;
        }
        slot as u64
    }

    /// Forgets every finger, e.g. when the surface goes away.
    pub(crate) fn clear(&mut self) {
        self.fingers.clear();
    }

    fn claim(&mut self, id: u64) -> usize {
        match self.fingers.iter().position(Option::is_none) {
            Some(free) => {
                self.fingers[free] = Some(id);
                free
            }
            None => {
                self.fingers.push(Some(id));
                self.fingers.len() - 1
            }
        }
    }
}

fn touch<C>(sequence: u64, phase: WinitTouchPhase, location: PhysicalPosition<f64>) -> HostEvent<C> {
    HostEvent::Touch {
        sequence,
        phase: phase.into(),
        x: location.x as f32,
        y: location.y as f32,
    }
}

//=== Resize Conversion ===================================================
//
// Surface sizes are carried as i32; sizes beyond that range saturate.
//

fn resize<C>(size: PhysicalSize<u32>) -> HostEvent<C> {
    HostEvent::Resize {
        width: i32::try_from(size.width).unwrap_or(i32::MAX),
        height: i32::try_from(size.height).unwrap_or(i32::MAX),
    }
}

//=== Full Event Conversion ===============================================
//
// Returns `None` for events the runtime does not consume. Lifecycle
// (resumed/suspended) and close requests arrive through other
// `ApplicationHandler` callbacks and are handled by the platform.
//

pub(crate) fn map_window_event<C>(event: &WindowEvent, slots: &mut TouchSlots) -> Option<HostEvent<C>> {
    match event {
        WindowEvent::Resized(size) => Some(resize(*size)),
        WindowEvent::Touch(t) => Some(touch(slots.slot(t.id, t.phase), t.phase, t.location)),
        WindowEvent::RedrawRequested => Some(HostEvent::paint()),
        _ => None,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
