/*
 * Minimal in-memory host shared by the integration tests. Uses only the public
 * API, the same surface an embedding application sees.
 */
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use micachrome::{
    AppContext, ChromeAppearance, ChromeEnvironment, ChromeEvent, ConfigStore, DpiScale,
    DragThreshold, EventOutcome, FixedThemeProvider, FrameMetrics, FrameThickness, MaximizeGlyph,
    MenuHandle, MonitorMetrics, PlatformGeometryProvider, PlatformResult, Rect, ScreenPoint,
    SystemMenu, SystemMenuEntry, Theme, ThemeChangeNotifier, ThemeableChrome, WindowHandle,
    WindowHost, WindowKind, WindowMessageHook,
};

#[derive(Debug)]
pub struct TestHost {
    pub handle: WindowHandle,
    pub bounds: Option<Rect>,
    pub content_inset: f64,
    pub frame: Option<FrameThickness>,
    pub glyph: MaximizeGlyph,
    pub minimized: bool,
    pub native_moves: usize,
    pub menu: HashMap<SystemMenuEntry, bool>,
}

impl TestHost {
    pub fn new(handle: isize, bounds: Rect) -> Self {
        Self {
            handle: WindowHandle(handle),
            bounds: Some(bounds),
            content_inset: 0.0,
            frame: None,
            glyph: MaximizeGlyph::Maximize,
            minimized: false,
            native_moves: 0,
            menu: HashMap::new(),
        }
    }
}

impl SystemMenu for TestHost {
    fn set_entry_enabled(&mut self, _menu: MenuHandle, entry: SystemMenuEntry, enabled: bool) {
        self.menu.insert(entry, enabled);
    }
}

impl WindowHost for TestHost {
    fn handle(&self) -> WindowHandle {
        self.handle
    }
    fn bounds(&self) -> Option<Rect> {
        self.bounds
    }
    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }
    fn set_frame_thickness(&mut self, thickness: FrameThickness) {
        self.frame = Some(thickness);
    }
    fn set_content_inset(&mut self, inset: f64) {
        self.content_inset = inset;
    }
    fn set_maximize_glyph(&mut self, glyph: MaximizeGlyph) {
        self.glyph = glyph;
    }
    fn is_minimized(&self) -> bool {
        self.minimized
    }
    fn minimize(&mut self) {
        self.minimized = true;
    }
    fn restore_from_minimized(&mut self) {
        self.minimized = false;
    }
    fn bring_to_front_and_focus(&mut self) {}
    fn close(&mut self) {}
    fn capture_pointer(&mut self) {}
    fn release_pointer_capture(&mut self) {}
    fn begin_native_move(&mut self) {
        self.native_moves += 1;
    }
    fn continue_drag_as_native_move(&mut self) {
        self.native_moves += 1;
    }
    fn schedule_deferred_layout_pass(&mut self) {}
    fn content_scrollable_width(&self) -> f64 {
        0.0
    }
    fn set_scroll_buttons_visible(&mut self, _visible: bool) {}
}

pub struct TestGeometry {
    pub work_area: Rect,
    pub scale: DpiScale,
}

impl PlatformGeometryProvider for TestGeometry {
    fn monitor_metrics(&self, _window: WindowHandle) -> Option<MonitorMetrics> {
        Some(MonitorMetrics {
            work_area: self.work_area,
            scale: self.scale,
        })
    }
    fn scale_at_point(&self, _point: ScreenPoint) -> Option<DpiScale> {
        Some(self.scale)
    }
    fn frame_metrics(&self) -> FrameMetrics {
        FrameMetrics {
            frame_border_px: 4,
            padded_border_px: 4,
        }
    }
    fn drag_threshold(&self) -> DragThreshold {
        DragThreshold::default()
    }
}

#[derive(Default)]
pub struct TestChrome {
    pub last: Option<ChromeAppearance>,
}

impl ThemeableChrome for TestChrome {
    fn apply_theme(&mut self, appearance: &ChromeAppearance) {
        self.last = Some(*appearance);
    }
}

#[derive(Default)]
pub struct QueueNotifier {
    pub queued: RefCell<Vec<WindowHandle>>,
}

impl ThemeChangeNotifier for QueueNotifier {
    fn notify_theme_changed(&self, window: WindowHandle) {
        self.queued.borrow_mut().push(window);
    }
}

#[derive(Default)]
pub struct MapStore(pub BTreeMap<String, String>);

impl ConfigStore for MapStore {
    fn read(&self, key: &str) -> String {
        self.0.get(key).cloned().unwrap_or_default()
    }
    fn write(&mut self, key: &str, value: &str) -> PlatformResult<()> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }
    fn exists(&self) -> bool {
        !self.0.is_empty()
    }
    fn erase(&mut self) -> PlatformResult<()> {
        self.0.clear();
        Ok(())
    }
}

pub fn app_with_system_theme(theme: Theme) -> AppContext {
    AppContext::new(
        Box::new(MapStore::default()),
        Box::new(FixedThemeProvider(Some(theme))),
    )
}

/// One window: its hook plus the host-side state the hook drives.
pub struct TestWindow {
    pub hook: WindowMessageHook,
    pub host: TestHost,
    pub chrome: TestChrome,
}

impl TestWindow {
    pub fn new(kind: WindowKind, handle: isize, bounds: Rect) -> Self {
        Self {
            hook: WindowMessageHook::new(kind),
            host: TestHost::new(handle, bounds),
            chrome: TestChrome::default(),
        }
    }

    pub fn initialize(&mut self, app: &AppContext, geometry: &TestGeometry, start_maximized: bool) {
        let mut env = ChromeEnvironment {
            host: &mut self.host,
            geometry,
            app,
            chrome: &mut self.chrome,
        };
        self.hook.initialize(&mut env, start_maximized);
    }

    pub fn dispatch(
        &mut self,
        app: &AppContext,
        geometry: &TestGeometry,
        event: ChromeEvent,
    ) -> EventOutcome {
        let mut env = ChromeEnvironment {
            host: &mut self.host,
            geometry,
            app,
            chrome: &mut self.chrome,
        };
        self.hook.dispatch(event, &mut env)
    }
}
