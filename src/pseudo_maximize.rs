/*
 * State machine for simulated ("pseudo") maximization.
 *
 * The window never enters the native maximized state. Maximizing snapshots the
 * current bounds, resizes the window over the monitor work area (plus border
 * compensation) and takes over the frame; restoring writes the snapshot back
 * untouched, so a maximize/restore pair reproduces the original bounds exactly.
 * Minimizing is a window-manager concern and leaves this state alone.
 */

use crate::geometry;
use crate::platform::{PlatformGeometryProvider, WindowHost};
use crate::types::{FrameThickness, MaximizeGlyph, Rect};

/// Resize-border and glass-frame thickness used while the window is Normal.
pub const STANDARD_FRAME_THICKNESS: FrameThickness = FrameThickness {
    resize_border: 8.0,
    glass_frame: 1.0,
};

/// Geometry state owned by one top-level window. The restore bounds exist only
/// while pseudo-maximized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WindowGeometryState {
    #[default]
    Normal,
    PseudoMaximized {
        restore_bounds: Rect,
    },
}

impl WindowGeometryState {
    pub fn is_pseudo_maximized(&self) -> bool {
        matches!(self, WindowGeometryState::PseudoMaximized { .. })
    }
}

#[derive(Debug, Default)]
pub struct PseudoMaximizeController {
    state: WindowGeometryState,
}

impl PseudoMaximizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WindowGeometryState {
        self.state
    }

    pub fn is_pseudo_maximized(&self) -> bool {
        self.state.is_pseudo_maximized()
    }

    /*
     * Flips between Normal and PseudoMaximized. Returns whether a transition
     * happened; a maximize with no resolvable surface or monitor is abandoned
     * and leaves the state unchanged.
     */
    pub fn toggle(
        &mut self,
        host: &mut dyn WindowHost,
        geometry: &dyn PlatformGeometryProvider,
    ) -> bool {
        match self.state {
            WindowGeometryState::Normal => self.maximize(host, geometry),
            WindowGeometryState::PseudoMaximized { restore_bounds } => {
                log::debug!(
                    "PseudoMaximize: Restoring window {:?} to {restore_bounds:?}",
                    host.handle()
                );
                self.state = WindowGeometryState::Normal;
                host.set_bounds(restore_bounds);
                apply_normal_chrome(host);
                true
            }
        }
    }

    fn maximize(
        &mut self,
        host: &mut dyn WindowHost,
        geometry: &dyn PlatformGeometryProvider,
    ) -> bool {
        let window = host.handle();
        let Some(current_bounds) = host.bounds() else {
            log::warn!("PseudoMaximize: No surface for window {window:?}; maximize abandoned.");
            return false;
        };
        let monitor = match geometry.monitor_metrics(window) {
            Some(monitor) if monitor.scale.is_usable() => monitor,
            Some(monitor) => {
                log::warn!(
                    "PseudoMaximize: Unusable DPI scale {:?} for {window:?}; maximize abandoned.",
                    monitor.scale
                );
                return false;
            }
            None => {
                log::warn!("PseudoMaximize: No monitor under {window:?}; maximize abandoned.");
                return false;
            }
        };

        let layout = geometry::pseudo_maximized_layout(monitor, geometry.frame_metrics());
        log::debug!(
            "PseudoMaximize: Maximizing {window:?} from {current_bounds:?} to {:?} (inset {})",
            layout.bounds,
            layout.content_inset
        );

        self.state = WindowGeometryState::PseudoMaximized {
            restore_bounds: current_bounds,
        };
        host.set_bounds(layout.bounds);
        host.set_content_inset(layout.content_inset);
        host.set_frame_thickness(FrameThickness::NONE);
        host.set_maximize_glyph(MaximizeGlyph::Restore);
        true
    }

    /*
     * Leaves PseudoMaximized for a drag-to-restore: frame overrides and the
     * content inset are removed, but the window is not moved. Returns the
     * snapshot so the caller can position the restored size under the pointer.
     */
    pub(crate) fn leave_for_drag(&mut self, host: &mut dyn WindowHost) -> Option<Rect> {
        let WindowGeometryState::PseudoMaximized { restore_bounds } = self.state else {
            return None;
        };
        self.state = WindowGeometryState::Normal;
        apply_normal_chrome(host);
        Some(restore_bounds)
    }
}

fn apply_normal_chrome(host: &mut dyn WindowHost) {
    host.set_content_inset(0.0);
    host.set_frame_thickness(STANDARD_FRAME_THICKNESS);
    host.set_maximize_glyph(MaximizeGlyph::Maximize);
}
