/*
 * In-memory fakes of the host traits, shared by the unit tests.
 */

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::error::{PlatformError, Result};
use crate::platform::{
    PlatformGeometryProvider, SystemMenu, ThemeChangeNotifier, ThemeableChrome, WindowHost,
};
use crate::pseudo_maximize::STANDARD_FRAME_THICKNESS;
use crate::settings::ConfigStore;
use crate::theme::ChromeAppearance;
use crate::types::{
    DpiScale, DragThreshold, FrameMetrics, FrameThickness, MaximizeGlyph, MenuHandle,
    MonitorMetrics, Rect, ScreenPoint, SystemMenuEntry, WindowHandle,
};

/// Mutating calls made on a `FakeHost`, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCall {
    SetBounds(Rect),
    SetFrame(FrameThickness),
    SetInset(f64),
    SetGlyph(MaximizeGlyph),
    Minimize,
    RestoreFromMinimized,
    BringToFront,
    Close,
    Capture,
    ReleaseCapture,
    BeginNativeMove,
    ContinueDragAsNativeMove,
    ScheduleDeferred,
    ScrollButtons(bool),
    MenuEntry(SystemMenuEntry, bool),
}

#[derive(Debug)]
pub struct FakeHost {
    pub handle: WindowHandle,
    pub bounds: Option<Rect>,
    /// Scale passed with the last `set_bounds_at_scale`.
    pub placement_scale: Option<DpiScale>,
    pub content_inset: f64,
    pub frame_thickness: FrameThickness,
    pub glyph: MaximizeGlyph,
    pub minimized: bool,
    pub captured: bool,
    pub closed: bool,
    pub scrollable_width: f64,
    pub scroll_buttons_visible: bool,
    pub menu_entries: HashMap<SystemMenuEntry, bool>,
    pub calls: Vec<HostCall>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            handle: WindowHandle(1),
            bounds: Some(Rect::new(0.0, 0.0, 640.0, 480.0)),
            placement_scale: None,
            content_inset: 0.0,
            frame_thickness: STANDARD_FRAME_THICKNESS,
            glyph: MaximizeGlyph::Maximize,
            minimized: false,
            captured: false,
            closed: false,
            scrollable_width: 0.0,
            scroll_buttons_visible: false,
            menu_entries: HashMap::new(),
            calls: Vec::new(),
        }
    }
}

impl FakeHost {
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    pub fn without_surface() -> Self {
        Self {
            bounds: None,
            ..Self::default()
        }
    }
}

impl SystemMenu for FakeHost {
    fn set_entry_enabled(&mut self, _menu: MenuHandle, entry: SystemMenuEntry, enabled: bool) {
        self.menu_entries.insert(entry, enabled);
        self.calls.push(HostCall::MenuEntry(entry, enabled));
    }
}

impl WindowHost for FakeHost {
    fn handle(&self) -> WindowHandle {
        self.handle
    }

    fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
        self.calls.push(HostCall::SetBounds(bounds));
    }

    fn set_bounds_at_scale(&mut self, bounds: Rect, scale: DpiScale) {
        self.placement_scale = Some(scale);
        self.set_bounds(bounds);
    }

    fn set_frame_thickness(&mut self, thickness: FrameThickness) {
        self.frame_thickness = thickness;
        self.calls.push(HostCall::SetFrame(thickness));
    }

    fn set_content_inset(&mut self, inset: f64) {
        self.content_inset = inset;
        self.calls.push(HostCall::SetInset(inset));
    }

    fn set_maximize_glyph(&mut self, glyph: MaximizeGlyph) {
        self.glyph = glyph;
        self.calls.push(HostCall::SetGlyph(glyph));
    }

    fn is_minimized(&self) -> bool {
        self.minimized
    }

    fn minimize(&mut self) {
        self.minimized = true;
        self.calls.push(HostCall::Minimize);
    }

    fn restore_from_minimized(&mut self) {
        self.minimized = false;
        self.calls.push(HostCall::RestoreFromMinimized);
    }

    fn bring_to_front_and_focus(&mut self) {
        self.calls.push(HostCall::BringToFront);
    }

    fn close(&mut self) {
        self.closed = true;
        self.calls.push(HostCall::Close);
    }

    fn capture_pointer(&mut self) {
        self.captured = true;
        self.calls.push(HostCall::Capture);
    }

    fn release_pointer_capture(&mut self) {
        self.captured = false;
        self.calls.push(HostCall::ReleaseCapture);
    }

    fn begin_native_move(&mut self) {
        self.calls.push(HostCall::BeginNativeMove);
    }

    fn continue_drag_as_native_move(&mut self) {
        self.calls.push(HostCall::ContinueDragAsNativeMove);
    }

    fn schedule_deferred_layout_pass(&mut self) {
        self.calls.push(HostCall::ScheduleDeferred);
    }

    fn content_scrollable_width(&self) -> f64 {
        self.scrollable_width
    }

    fn set_scroll_buttons_visible(&mut self, visible: bool) {
        self.scroll_buttons_visible = visible;
        self.calls.push(HostCall::ScrollButtons(visible));
    }
}

#[derive(Debug, Clone)]
pub struct FakeGeometry {
    pub window_monitor: Option<MonitorMetrics>,
    pub point_scale: Option<DpiScale>,
    pub frame: FrameMetrics,
    pub threshold: DragThreshold,
}

impl Default for FakeGeometry {
    fn default() -> Self {
        Self::single_monitor(Rect::new(0.0, 0.0, 1920.0, 1080.0), DpiScale::IDENTITY)
    }
}

impl FakeGeometry {
    pub fn single_monitor(work_area: Rect, scale: DpiScale) -> Self {
        Self {
            window_monitor: Some(MonitorMetrics { work_area, scale }),
            point_scale: Some(scale),
            frame: FrameMetrics {
                frame_border_px: 4,
                padded_border_px: 4,
            },
            threshold: DragThreshold::default(),
        }
    }

    pub fn without_monitor() -> Self {
        Self {
            window_monitor: None,
            point_scale: None,
            ..Self::default()
        }
    }
}

impl PlatformGeometryProvider for FakeGeometry {
    fn monitor_metrics(&self, _window: WindowHandle) -> Option<MonitorMetrics> {
        self.window_monitor
    }

    fn scale_at_point(&self, _point: ScreenPoint) -> Option<DpiScale> {
        self.point_scale
    }

    fn frame_metrics(&self) -> FrameMetrics {
        self.frame
    }

    fn drag_threshold(&self) -> DragThreshold {
        self.threshold
    }
}

#[derive(Debug, Default)]
pub struct RecordingChrome {
    pub applied: Vec<ChromeAppearance>,
    pub last: Option<ChromeAppearance>,
}

impl ThemeableChrome for RecordingChrome {
    fn apply_theme(&mut self, appearance: &ChromeAppearance) {
        self.applied.push(*appearance);
        self.last = Some(*appearance);
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notified: RefCell<Vec<WindowHandle>>,
}

impl ThemeChangeNotifier for RecordingNotifier {
    fn notify_theme_changed(&self, window: WindowHandle) {
        self.notified.borrow_mut().push(window);
    }
}

/// `ConfigStore` over a shared map, so tests can inspect it after handing it off.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: Rc<RefCell<BTreeMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryConfigStore {
    pub fn with_values(values: &[(&str, &str)]) -> Self {
        let store = Self::default();
        store.values.borrow_mut().extend(
            values
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        store
    }

    pub fn shared(&self) -> Rc<RefCell<BTreeMap<String, String>>> {
        Rc::clone(&self.values)
    }

    pub fn failing_writes(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.fail_writes)
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read(&self, key: &str) -> String {
        self.values.borrow().get(key).cloned().unwrap_or_default()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(PlatformError::OperationFailed(format!("write of '{key}' refused")));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn exists(&self) -> bool {
        !self.values.borrow().is_empty()
    }

    fn erase(&mut self) -> Result<()> {
        self.values.borrow_mut().clear();
        Ok(())
    }
}
