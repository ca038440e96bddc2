/*
 * Capability traits the host windowing environment implements. The chrome
 * controllers only ever talk to the OS through these seams, so the portable
 * logic can be exercised with in-memory fakes and the Win32 backend in
 * `window_common` stays a thin translation layer.
 *
 * All methods are called on the UI thread from inside a single event dispatch.
 */

use crate::theme::{ChromeAppearance, Theme};
use crate::types::{
    DpiScale, DragThreshold, FrameMetrics, FrameThickness, MaximizeGlyph, MenuHandle,
    MonitorMetrics, Rect, ScreenPoint, SystemMenuEntry, WindowHandle,
};

/// Monitor and DPI queries. Leaf utility with no state of its own.
pub trait PlatformGeometryProvider {
    /// Work area and DPI scale of the monitor under `window`, or `None` when no
    /// monitor or rendering surface can be resolved right now.
    fn monitor_metrics(&self, window: WindowHandle) -> Option<MonitorMetrics>;

    /// DPI scale of the monitor under a screen point (device pixels).
    fn scale_at_point(&self, point: ScreenPoint) -> Option<DpiScale>;

    /// Native frame border and padded border sizes, in device pixels.
    fn frame_metrics(&self) -> FrameMetrics;

    /// Minimum pointer displacement the OS uses to tell a click from a drag.
    fn drag_threshold(&self) -> DragThreshold;
}

/// The OS-wide light/dark preference. `None` means the preference cannot be read.
pub trait SystemThemeProvider {
    fn current_preference(&self) -> Option<Theme>;
}

/// Enable/disable entries on a window's native system menu.
pub trait SystemMenu {
    fn set_entry_enabled(&mut self, menu: MenuHandle, entry: SystemMenuEntry, enabled: bool);
}

/*
 * Geometry and window-manager operations on one top-level window. Bounds are
 * in DIPs; the backend converts to device pixels with the window's own scale.
 */
pub trait WindowHost: SystemMenu {
    fn handle(&self) -> WindowHandle;

    /// Current outer bounds, or `None` while the window has no surface.
    fn bounds(&self) -> Option<Rect>;
    fn set_bounds(&mut self, bounds: Rect);
    /// Places the window with DIPs converted at `scale` instead of the window's
    /// current scale; used when the bounds were derived on another monitor.
    fn set_bounds_at_scale(&mut self, bounds: Rect, scale: DpiScale) {
        let _ = scale;
        self.set_bounds(bounds);
    }

    fn set_frame_thickness(&mut self, thickness: FrameThickness);
    /// Uniform inset applied to the content root on all four edges.
    fn set_content_inset(&mut self, inset: f64);
    fn set_maximize_glyph(&mut self, glyph: MaximizeGlyph);

    fn is_minimized(&self) -> bool;
    fn minimize(&mut self);
    /// Restores a minimized window to the window manager's Normal state. Does not
    /// touch pseudo-maximization.
    fn restore_from_minimized(&mut self);
    fn bring_to_front_and_focus(&mut self);
    fn close(&mut self);

    fn capture_pointer(&mut self);
    fn release_pointer_capture(&mut self);
    /// Performs a native interactive window move from a fresh press.
    fn begin_native_move(&mut self);
    /// Hands an in-progress pointer drag to the native move loop.
    fn continue_drag_as_native_move(&mut self);

    /// Queues `ChromeEvent::DeferredLayoutPass` at low priority, after layout.
    fn schedule_deferred_layout_pass(&mut self);
    /// Width by which the content exceeds its viewport (0 when it fits).
    fn content_scrollable_width(&self) -> f64;
    fn set_scroll_buttons_visible(&mut self, visible: bool);
}

/// Shared "themeable chrome" capability of the main window and the dialog.
pub trait ThemeableChrome {
    fn apply_theme(&mut self, appearance: &ChromeAppearance);
}

/// Pushes a theme-changed notification to a top-level window; the window's own
/// hook then receives `ChromeEvent::SystemSettingsOrThemeChanged`.
pub trait ThemeChangeNotifier {
    fn notify_theme_changed(&self, window: WindowHandle);
}
