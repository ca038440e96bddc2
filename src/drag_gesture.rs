/*
 * Title-bar pointer gestures. A press on a Normal window goes straight to the
 * native move loop. A press on a pseudo-maximized window only arms the tracker:
 * the native move loop cannot be entered while the window is simulating the
 * maximized state, so the tracker waits for a genuine drag, restores the window
 * under the pointer and then hands the still-running drag to the OS.
 */

use crate::geometry;
use crate::platform::{PlatformGeometryProvider, WindowHost};
use crate::pseudo_maximize::PseudoMaximizeController;
use crate::types::{DpiScale, EventOutcome, ScreenPoint};

/// Armed state of one press. At most one drag-to-restore fires per press.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Armed {
        start_point: ScreenPoint,
    },
}

impl DragSession {
    pub fn is_armed(&self) -> bool {
        matches!(self, DragSession::Armed { .. })
    }
}

#[derive(Debug, Default)]
pub struct DragGestureTracker {
    session: DragSession,
}

impl DragGestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> DragSession {
        self.session
    }

    pub fn on_press(
        &mut self,
        point: ScreenPoint,
        click_count: u32,
        maximize: &mut PseudoMaximizeController,
        host: &mut dyn WindowHost,
        geometry: &dyn PlatformGeometryProvider,
    ) -> EventOutcome {
        match click_count {
            0 => EventOutcome::Unhandled,
            1 if maximize.is_pseudo_maximized() => {
                log::trace!("DragGesture: Armed at {point:?}");
                self.session = DragSession::Armed { start_point: point };
                host.capture_pointer();
                EventOutcome::Handled
            }
            1 => {
                self.session = DragSession::Idle;
                host.begin_native_move();
                EventOutcome::Handled
            }
            _ => {
                log::debug!("DragGesture: Double click on title bar; toggling maximize.");
                self.disarm(host);
                maximize.toggle(host, geometry);
                EventOutcome::Handled
            }
        }
    }

    pub fn on_move(
        &mut self,
        point: ScreenPoint,
        primary_down: bool,
        maximize: &mut PseudoMaximizeController,
        host: &mut dyn WindowHost,
        geometry: &dyn PlatformGeometryProvider,
    ) -> EventOutcome {
        let DragSession::Armed { start_point } = self.session else {
            return EventOutcome::Unhandled;
        };
        if !primary_down
            || !geometry::exceeds_drag_threshold(start_point, point, geometry.drag_threshold())
        {
            return EventOutcome::Handled;
        }

        self.session = DragSession::Idle;
        let Some(restore_bounds) = maximize.leave_for_drag(host) else {
            // Restored by some other path while the button was held.
            host.release_pointer_capture();
            return EventOutcome::Handled;
        };

        let scale = scale_under_pointer(point, host, geometry);
        let bounds = geometry::drag_restore_bounds(
            point,
            scale,
            restore_bounds.width,
            restore_bounds.height,
        );
        log::debug!(
            "DragGesture: Drag-to-restore at {point:?} (scale {scale:?}); placed at {bounds:?}"
        );
        host.set_bounds_at_scale(bounds, scale);
        host.release_pointer_capture();
        host.continue_drag_as_native_move();
        EventOutcome::Handled
    }

    pub fn on_release(&mut self, host: &mut dyn WindowHost) -> EventOutcome {
        if self.session.is_armed() {
            log::trace!("DragGesture: Released without dragging.");
            self.disarm(host);
            EventOutcome::Handled
        } else {
            EventOutcome::Unhandled
        }
    }

    /// Drops an armed press because the geometry state changed underneath it.
    pub fn cancel(&mut self, host: &mut dyn WindowHost) {
        if self.session.is_armed() {
            log::debug!("DragGesture: Armed press cancelled by a maximize state change.");
        }
        self.disarm(host);
    }

    fn disarm(&mut self, host: &mut dyn WindowHost) {
        if self.session.is_armed() {
            self.session = DragSession::Idle;
            host.release_pointer_capture();
        }
    }
}

fn scale_under_pointer(
    point: ScreenPoint,
    host: &dyn WindowHost,
    geometry: &dyn PlatformGeometryProvider,
) -> DpiScale {
    geometry
        .scale_at_point(point)
        .filter(DpiScale::is_usable)
        .or_else(|| {
            geometry
                .monitor_metrics(host.handle())
                .map(|monitor| monitor.scale)
                .filter(DpiScale::is_usable)
        })
        .unwrap_or_else(|| {
            log::warn!("DragGesture: No DPI scale at {point:?}; assuming 1.0.");
            DpiScale::IDENTITY
        })
}
