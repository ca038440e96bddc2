/*
 * Win32 backend for the chrome controllers. This module registers the chrome
 * window class, owns the window procedure, and implements the host traits
 * (`WindowHost`, `PlatformGeometryProvider`, `ThemeableChrome`,
 * `ThemeChangeNotifier`) on top of the Win32 API.
 *
 * Native messages are translated into `ChromeEvent`s and handed to the window's
 * `WindowMessageHook`; the hook's outcome decides whether `DefWindowProcW` runs.
 * Geometry crosses this boundary in DIPs and is converted with the window's own
 * DPI, or the DPI of the monitor under a point for pointer positions.
 */
use crate::app_context::AppContext;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::geometry::rect_to_dips;
use crate::message_hook::{ChromeEnvironment, WindowMessageHook};
use crate::platform::{
    PlatformGeometryProvider, SystemMenu, ThemeChangeNotifier, ThemeableChrome, WindowHost,
};
use crate::pseudo_maximize::STANDARD_FRAME_THICKNESS;
use crate::styling_primitives::Color;
use crate::theme::ChromeAppearance;
use crate::types::{
    ChromeEvent, DpiScale, DragThreshold, EventOutcome, FrameMetrics, FrameThickness,
    MaximizeGlyph, MenuHandle, MonitorMetrics, Rect, ScreenPoint, SystemMenuEntry, WindowHandle,
    WindowKind,
};

use windows::core::w;
use windows::{
    Win32::{
        Foundation::{COLORREF, GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
        Graphics::Dwm::{
            DWMWA_BORDER_COLOR, DWMWA_USE_IMMERSIVE_DARK_MODE, DwmExtendFrameIntoClientArea,
            DwmSetWindowAttribute,
        },
        Graphics::Gdi::{
            ClientToScreen, CreateSolidBrush, DeleteObject, FillRect, GetMonitorInfoW, HBRUSH,
            HDC, InvalidateRect, MONITOR_DEFAULTTONEAREST, MONITOR_DEFAULTTONULL, MONITORINFO,
            MonitorFromPoint, MonitorFromWindow,
        },
        System::LibraryLoader::{GetModuleHandleW, GetProcAddress, LoadLibraryW},
        UI::Controls::MARGINS,
        UI::HiDpi::{GetDpiForMonitor, GetDpiForWindow, MDT_EFFECTIVE_DPI},
        UI::Input::KeyboardAndMouse::{GetCapture, ReleaseCapture, SetCapture, SetFocus},
        UI::WindowsAndMessaging::*,
    },
    core::{HSTRING, PCSTR, PCWSTR},
};

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ffi::c_void;
use std::rc::Rc;
use std::sync::OnceLock;

/// Posted by `schedule_deferred_layout_pass`; arrives after the pending layout work.
pub const WM_APP_DEFERRED_LAYOUT_PASS: u32 = WM_APP + 0x0101;

/// Height of the draggable caption strip, in DIPs.
pub const DEFAULT_CAPTION_HEIGHT: f64 = 32.0;

const SUCCESS_CODE: LRESULT = LRESULT(0);
const MK_LBUTTON_FLAG: usize = 0x0001;
const UXTHEME_ORD_SET_PREFERRED_APP_MODE: usize = 135;
const UXTHEME_ORD_FLUSH_MENU_THEMES: usize = 136;

/*
 * Set while this module itself sends WM_NCLBUTTONDOWN to enter the native move
 * loop. The re-entrant message must go straight to DefWindowProcW instead of
 * being translated into another press.
 */
thread_local! {
    static FORWARDING_NATIVE_MOVE: Cell<bool> = const { Cell::new(false) };
}

/*
 * RAII helper that marks the window procedure as forwarding a synthetic caption
 * press until dropped.
 */
struct NativeMoveGuard;

impl NativeMoveGuard {
    fn new() -> Self {
        FORWARDING_NATIVE_MOVE.with(|flag| flag.set(true));
        Self
    }
}

impl Drop for NativeMoveGuard {
    fn drop(&mut self) {
        FORWARDING_NATIVE_MOVE.with(|flag| flag.set(false));
    }
}

fn is_forwarding_native_move() -> bool {
    FORWARDING_NATIVE_MOVE.with(Cell::get)
}

pub(crate) fn hwnd_from_handle(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut c_void)
}

pub(crate) fn handle_from_hwnd(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as isize)
}

pub(crate) fn color_to_colorref(color: Color) -> COLORREF {
    COLORREF(color.r as u32 | (color.g as u32) << 8 | (color.b as u32) << 16)
}

fn rect_from_native(rc: &RECT) -> Rect {
    Rect::new(
        rc.left as f64,
        rc.top as f64,
        (rc.right - rc.left) as f64,
        (rc.bottom - rc.top) as f64,
    )
}

/// DIP bounds to `SetWindowPos` arguments at a given scale.
fn bounds_to_px(bounds: Rect, scale: DpiScale) -> (i32, i32, i32, i32) {
    (
        (bounds.left * scale.x).round() as i32,
        (bounds.top * scale.y).round() as i32,
        (bounds.width * scale.x).round() as i32,
        (bounds.height * scale.y).round() as i32,
    )
}

/*
 * Enters the native move loop with a synthetic caption press. Blocks until the
 * button is released; while the button is still down the loop picks up the
 * ongoing drag. Must not run while any window state is borrowed.
 */
fn enter_native_move_loop(hwnd: HWND) {
    unsafe {
        let _ = ReleaseCapture();
        let _guard = NativeMoveGuard::new();
        SendMessageW(
            hwnd,
            WM_NCLBUTTONDOWN,
            Some(WPARAM(HTCAPTION as usize)),
            Some(LPARAM(0)),
        );
    }
}

fn dpi_scale_for_window(hwnd: HWND) -> DpiScale {
    match unsafe { GetDpiForWindow(hwnd) } {
        0 => DpiScale::IDENTITY,
        dpi => DpiScale::from_dpi(dpi, dpi),
    }
}

/*
 * `WindowHost` for one top-level chrome window. Presentation state that the
 * OS has no notion of (content inset, glyph, scroll buttons) is kept here for
 * the application's painter and invalidates the window when it changes.
 */
#[derive(Debug)]
pub struct Win32WindowHost {
    hwnd: HWND,
    content_inset: f64,
    frame: FrameThickness,
    glyph: MaximizeGlyph,
    scrollable_width: f64,
    scroll_buttons_visible: bool,
    native_move_requested: bool,
}

impl Win32WindowHost {
    pub(crate) fn new(hwnd: HWND) -> Self {
        Self {
            hwnd,
            content_inset: 0.0,
            frame: STANDARD_FRAME_THICKNESS,
            glyph: MaximizeGlyph::Maximize,
            scrollable_width: 0.0,
            scroll_buttons_visible: false,
            native_move_requested: false,
        }
    }

    pub fn content_inset(&self) -> f64 {
        self.content_inset
    }

    pub fn maximize_glyph(&self) -> MaximizeGlyph {
        self.glyph
    }

    pub fn scroll_buttons_visible(&self) -> bool {
        self.scroll_buttons_visible
    }

    pub fn set_content_scrollable_width(&mut self, width: f64) {
        self.scrollable_width = width.max(0.0);
    }

    /// Clears and returns a pending native-move request.
    pub(crate) fn take_native_move_request(&mut self) -> bool {
        std::mem::take(&mut self.native_move_requested)
    }

    fn invalidate(&self) {
        unsafe {
            let _ = InvalidateRect(Some(self.hwnd), None, true);
        }
    }

    /// Non-client hit test for a screen point, in device pixels.
    fn hit_test(&self, point: ScreenPoint) -> u32 {
        let mut rc = RECT::default();
        if unsafe { GetWindowRect(self.hwnd, &mut rc) }.is_err() {
            return HTNOWHERE;
        }
        let scale = dpi_scale_for_window(self.hwnd);
        classify_hit(
            rect_from_native(&rc),
            point,
            self.frame.resize_border * scale.x,
            (self.content_inset + DEFAULT_CAPTION_HEIGHT) * scale.y,
        )
    }
}

impl SystemMenu for Win32WindowHost {
    fn set_entry_enabled(&mut self, menu: MenuHandle, entry: SystemMenuEntry, enabled: bool) {
        let command = match entry {
            SystemMenuEntry::Move => SC_MOVE,
            SystemMenuEntry::Size => SC_SIZE,
            SystemMenuEntry::Maximize => SC_MAXIMIZE,
            SystemMenuEntry::Restore => SC_RESTORE,
        };
        let flags = if enabled { MF_ENABLED } else { MF_GRAYED };
        unsafe {
            let _ = EnableMenuItem(HMENU(menu.0 as *mut c_void), command, MF_BYCOMMAND | flags);
        }
    }
}

impl WindowHost for Win32WindowHost {
    fn handle(&self) -> WindowHandle {
        handle_from_hwnd(self.hwnd)
    }

    fn bounds(&self) -> Option<Rect> {
        if self.hwnd.is_invalid() {
            return None;
        }
        let mut rc = RECT::default();
        match unsafe { GetWindowRect(self.hwnd, &mut rc) } {
            Ok(()) => Some(rect_to_dips(
                rect_from_native(&rc),
                dpi_scale_for_window(self.hwnd),
            )),
            Err(err) => {
                log::warn!("Win32Host: GetWindowRect failed for {:?}: {err:?}", self.hwnd);
                None
            }
        }
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.set_bounds_at_scale(bounds, dpi_scale_for_window(self.hwnd));
    }

    fn set_bounds_at_scale(&mut self, bounds: Rect, scale: DpiScale) {
        let (x, y, cx, cy) = bounds_to_px(bounds, scale);
        let result = unsafe {
            SetWindowPos(
                self.hwnd,
                None,
                x,
                y,
                cx,
                cy,
                SWP_NOZORDER | SWP_NOACTIVATE | SWP_FRAMECHANGED,
            )
        };
        if let Err(err) = result {
            log::warn!("Win32Host: SetWindowPos failed for {:?}: {err:?}", self.hwnd);
        }
    }

    fn set_frame_thickness(&mut self, thickness: FrameThickness) {
        self.frame = thickness;
        let glass = thickness.glass_frame.round() as i32;
        let margins = MARGINS {
            cxLeftWidth: glass,
            cxRightWidth: glass,
            cyTopHeight: glass,
            cyBottomHeight: glass,
        };
        if let Err(err) = unsafe { DwmExtendFrameIntoClientArea(self.hwnd, &margins) } {
            log::debug!("Win32Host: DwmExtendFrameIntoClientArea failed: {err:?}");
        }
    }

    fn set_content_inset(&mut self, inset: f64) {
        self.content_inset = inset;
        self.invalidate();
    }

    fn set_maximize_glyph(&mut self, glyph: MaximizeGlyph) {
        self.glyph = glyph;
        self.invalidate();
    }

    fn is_minimized(&self) -> bool {
        unsafe { IsIconic(self.hwnd).as_bool() }
    }

    fn minimize(&mut self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_MINIMIZE);
        }
    }

    fn restore_from_minimized(&mut self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_RESTORE);
        }
    }

    fn bring_to_front_and_focus(&mut self) {
        unsafe {
            let _ = SetForegroundWindow(self.hwnd);
            // A topmost round trip lifts the window above others without pinning it.
            let flags = SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE;
            let _ = SetWindowPos(self.hwnd, Some(HWND_TOPMOST), 0, 0, 0, 0, flags);
            let _ = SetWindowPos(self.hwnd, Some(HWND_NOTOPMOST), 0, 0, 0, 0, flags);
            let _ = SetFocus(Some(self.hwnd));
        }
    }

    fn close(&mut self) {
        unsafe {
            if PostMessageW(Some(self.hwnd), WM_CLOSE, WPARAM(0), LPARAM(0)).is_err() {
                log::error!("Win32Host: Failed to post WM_CLOSE: {:?}", GetLastError());
            }
        }
    }

    fn capture_pointer(&mut self) {
        unsafe {
            SetCapture(self.hwnd);
        }
    }

    fn release_pointer_capture(&mut self) {
        unsafe {
            if GetCapture() == self.hwnd {
                let _ = ReleaseCapture();
            }
        }
    }

    // The move loop is modal, so it is entered only after the dispatch returns.
    fn begin_native_move(&mut self) {
        self.native_move_requested = true;
    }

    fn continue_drag_as_native_move(&mut self) {
        self.native_move_requested = true;
    }

    fn schedule_deferred_layout_pass(&mut self) {
        unsafe {
            if PostMessageW(
                Some(self.hwnd),
                WM_APP_DEFERRED_LAYOUT_PASS,
                WPARAM(0),
                LPARAM(0),
            )
            .is_err()
            {
                log::error!(
                    "Win32Host: Failed to post WM_APP_DEFERRED_LAYOUT_PASS: {:?}",
                    GetLastError()
                );
            }
        }
    }

    fn content_scrollable_width(&self) -> f64 {
        self.scrollable_width
    }

    fn set_scroll_buttons_visible(&mut self, visible: bool) {
        if self.scroll_buttons_visible != visible {
            self.scroll_buttons_visible = visible;
            self.invalidate();
        }
    }
}

/*
 * Classifies a screen point against a window rectangle. Resize edges win over
 * the caption; with a zero resize border (pseudo-maximized) the edges are inert.
 */
pub(crate) fn classify_hit(
    window: Rect,
    point: ScreenPoint,
    resize_border: f64,
    caption_height: f64,
) -> u32 {
    if point.x < window.left
        || point.x >= window.right()
        || point.y < window.top
        || point.y >= window.bottom()
    {
        return HTNOWHERE;
    }
    let on_left = point.x < window.left + resize_border;
    let on_right = point.x >= window.right() - resize_border;
    let on_top = point.y < window.top + resize_border;
    let on_bottom = point.y >= window.bottom() - resize_border;

    match (on_top, on_right, on_bottom, on_left) {
        (true, _, _, true) => HTTOPLEFT,
        (true, true, _, _) => HTTOPRIGHT,
        (_, true, true, _) => HTBOTTOMRIGHT,
        (_, _, true, true) => HTBOTTOMLEFT,
        (true, _, _, _) => HTTOP,
        (_, true, _, _) => HTRIGHT,
        (_, _, true, _) => HTBOTTOM,
        (_, _, _, true) => HTLEFT,
        _ if point.y < window.top + caption_height => HTCAPTION,
        _ => HTCLIENT,
    }
}

/// Monitor, DPI and system-metric queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32GeometryProvider;

impl Win32GeometryProvider {
    fn monitor_scale(monitor: windows::Win32::Graphics::Gdi::HMONITOR) -> Option<DpiScale> {
        let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
        unsafe { GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) }.ok()?;
        Some(DpiScale::from_dpi(dpi_x, dpi_y))
    }
}

impl PlatformGeometryProvider for Win32GeometryProvider {
    fn monitor_metrics(&self, window: WindowHandle) -> Option<MonitorMetrics> {
        let hwnd = hwnd_from_handle(window);
        if hwnd.is_invalid() {
            return None;
        }
        unsafe {
            let monitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST);
            if monitor.is_invalid() {
                return None;
            }
            let mut info = MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };
            if !GetMonitorInfoW(monitor, &mut info).as_bool() {
                log::warn!("Win32Geometry: GetMonitorInfoW failed: {:?}", GetLastError());
                return None;
            }
            Some(MonitorMetrics {
                work_area: rect_from_native(&info.rcWork),
                scale: Self::monitor_scale(monitor).unwrap_or_else(|| dpi_scale_for_window(hwnd)),
            })
        }
    }

    fn scale_at_point(&self, point: ScreenPoint) -> Option<DpiScale> {
        let native = POINT {
            x: point.x.round() as i32,
            y: point.y.round() as i32,
        };
        let monitor = unsafe { MonitorFromPoint(native, MONITOR_DEFAULTTONULL) };
        if monitor.is_invalid() {
            return None;
        }
        Self::monitor_scale(monitor)
    }

    fn frame_metrics(&self) -> FrameMetrics {
        unsafe {
            FrameMetrics {
                frame_border_px: GetSystemMetrics(SM_CXFRAME),
                padded_border_px: GetSystemMetrics(SM_CXPADDEDBORDER),
            }
        }
    }

    fn drag_threshold(&self) -> DragThreshold {
        let (cx, cy) = unsafe { (GetSystemMetrics(SM_CXDRAG), GetSystemMetrics(SM_CYDRAG)) };
        if cx <= 0 || cy <= 0 {
            return DragThreshold::default();
        }
        DragThreshold {
            horizontal: cx as f64,
            vertical: cy as f64,
        }
    }
}

/*
 * Posts WM_THEMECHANGED to a window. Posting rather than sending keeps the
 * broadcast from re-entering a window procedure that is already dispatching.
 */
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32ThemeNotifier;

impl ThemeChangeNotifier for Win32ThemeNotifier {
    fn notify_theme_changed(&self, window: WindowHandle) {
        let hwnd = hwnd_from_handle(window);
        unsafe {
            if PostMessageW(Some(hwnd), WM_THEMECHANGED, WPARAM(0), LPARAM(0)).is_err() {
                log::warn!(
                    "Win32ThemeNotifier: Failed to post WM_THEMECHANGED to {hwnd:?}: {:?}",
                    GetLastError()
                );
            }
        }
    }
}

/// Restyles the application's content area after the frame has been themed.
pub type ContentRestyler = Box<dyn FnMut(WindowHandle, &ChromeAppearance)>;

/*
 * Frame-level theming: background brush, DWM dark title/border and the window
 * border colour. Content restyling is delegated to the application.
 */
pub struct NativeChrome {
    hwnd: HWND,
    background: Option<HBRUSH>,
    appearance: Option<ChromeAppearance>,
    restyle_content: Option<ContentRestyler>,
}

impl NativeChrome {
    pub(crate) fn new(restyle_content: Option<ContentRestyler>) -> Self {
        Self {
            hwnd: HWND::default(),
            background: None,
            appearance: None,
            restyle_content,
        }
    }

    pub fn appearance(&self) -> Option<&ChromeAppearance> {
        self.appearance.as_ref()
    }

    fn paint_background(&self, hdc: HDC) -> bool {
        let Some(brush) = self.background else {
            return false;
        };
        let mut rc = RECT::default();
        unsafe {
            if GetClientRect(self.hwnd, &mut rc).is_err() {
                return false;
            }
            FillRect(hdc, &rc, brush);
        }
        true
    }

    fn release_brush(&mut self) {
        if let Some(brush) = self.background.take() {
            unsafe {
                let _ = DeleteObject(brush.into());
            }
        }
    }
}

impl ThemeableChrome for NativeChrome {
    fn apply_theme(&mut self, appearance: &ChromeAppearance) {
        log::debug!(
            "NativeChrome: Applying {:?} (activated: {}) to {:?}",
            appearance.theme,
            appearance.activated,
            self.hwnd
        );
        set_immersive_dark_mode(self.hwnd, !appearance.theme.is_light());
        let border = color_to_colorref(appearance.border);
        unsafe {
            let _ = DwmSetWindowAttribute(
                self.hwnd,
                DWMWA_BORDER_COLOR,
                &border as *const _ as *const _,
                std::mem::size_of_val(&border) as u32,
            );
        }

        self.release_brush();
        let brush = unsafe { CreateSolidBrush(color_to_colorref(appearance.background)) };
        self.background = Some(brush);
        self.appearance = Some(*appearance);
        if let Some(restyle) = self.restyle_content.as_mut() {
            restyle(handle_from_hwnd(self.hwnd), appearance);
        }
        unsafe {
            let _ = InvalidateRect(Some(self.hwnd), None, true);
        }
    }
}

impl Drop for NativeChrome {
    fn drop(&mut self) {
        self.release_brush();
    }
}

impl std::fmt::Debug for NativeChrome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeChrome")
            .field("hwnd", &self.hwnd)
            .field("appearance", &self.appearance)
            .finish_non_exhaustive()
    }
}

/// Switches the DWM-drawn parts of the window (and its system menu) between light and dark.
fn set_immersive_dark_mode(hwnd: HWND, dark: bool) {
    let value: i32 = dark.into();
    unsafe {
        let _ = DwmSetWindowAttribute(
            hwnd,
            DWMWA_USE_IMMERSIVE_DARK_MODE,
            &value as *const _ as *const _,
            std::mem::size_of_val(&value) as u32,
        );
    }
}

#[repr(i32)]
#[derive(Clone, Copy)]
enum PreferredAppMode {
    AllowDark = 1,
}

type SetPreferredAppModeFn = unsafe extern "system" fn(PreferredAppMode) -> PreferredAppMode;
type FlushMenuThemesFn = unsafe extern "system" fn();

/*
 * Opts the process into dark system menus. Must run before the first window is
 * created. The entry points are undocumented uxtheme ordinals, so any failure
 * simply leaves menus light.
 */
pub fn init_app_dark_mode() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| unsafe {
        let module = match LoadLibraryW(w!("uxtheme.dll")) {
            Ok(module) => module,
            Err(err) => {
                log::debug!("Dark mode: Failed to load uxtheme.dll: {err:?}");
                return;
            }
        };
        let proc_at = |ordinal: usize| GetProcAddress(module, PCSTR(ordinal as *const u8));

        if let Some(ptr) = proc_at(UXTHEME_ORD_SET_PREFERRED_APP_MODE) {
            let set_preferred: SetPreferredAppModeFn = std::mem::transmute(ptr);
            let _ = set_preferred(PreferredAppMode::AllowDark);
        }
        if let Some(ptr) = proc_at(UXTHEME_ORD_FLUSH_MENU_THEMES) {
            let flush: FlushMenuThemesFn = std::mem::transmute(ptr);
            flush();
        }
        log::debug!("Dark mode: App-level dark menus enabled.");
    });
}

#[inline]
pub(crate) fn loword_from_wparam(wparam: WPARAM) -> u32 {
    (wparam.0 & 0xFFFF) as u32
}
#[inline]
pub(crate) fn hiword_from_lparam(lparam: LPARAM) -> u32 {
    ((lparam.0 >> 16) & 0xFFFF) as u32
}
#[inline]
pub(crate) fn loword_from_lparam(lparam: LPARAM) -> u32 {
    (lparam.0 & 0xFFFF) as u32
}

/// Signed coordinates packed in an lParam (GET_X_LPARAM / GET_Y_LPARAM).
#[inline]
pub(crate) fn point_from_lparam(lparam: LPARAM) -> (i32, i32) {
    (
        (lparam.0 & 0xFFFF) as u16 as i16 as i32,
        ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32,
    )
}

/*
 * Translates the messages the chrome cares about. Messages that need the
 * window's state (capture, client-to-screen mapping) take `hwnd`; everything
 * else is decoded from the parameters alone.
 */
pub(crate) fn translate_message(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> Option<ChromeEvent> {
    match msg {
        WM_ACTIVATEAPP => Some(ChromeEvent::AppActivated {
            active: wparam.0 != 0,
        }),
        WM_ACTIVATE => Some(ChromeEvent::ActivationChanged {
            active: loword_from_wparam(wparam) != WA_INACTIVE,
        }),
        // High word of lParam is non-zero for the window menu.
        WM_INITMENUPOPUP if hiword_from_lparam(lparam) != 0 => Some(ChromeEvent::MenuPopupOpening {
            menu: MenuHandle(wparam.0 as isize),
        }),
        WM_SYSCOMMAND => match (wparam.0 as u32) & 0xFFF0 {
            SC_MAXIMIZE => Some(ChromeEvent::SystemCommandMaximize),
            SC_RESTORE => Some(ChromeEvent::SystemCommandRestore),
            _ => None,
        },
        WM_SETTINGCHANGE | WM_THEMECHANGED => Some(ChromeEvent::SystemSettingsOrThemeChanged),
        WM_NCLBUTTONDOWN | WM_NCLBUTTONDBLCLK if wparam.0 as u32 == HTCAPTION => {
            let (x, y) = point_from_lparam(lparam);
            Some(ChromeEvent::PointerPressed {
                point: ScreenPoint::new(x as f64, y as f64),
                click_count: if msg == WM_NCLBUTTONDBLCLK { 2 } else { 1 },
            })
        }
        WM_MOUSEMOVE | WM_LBUTTONUP if unsafe { GetCapture() } == hwnd => {
            let (x, y) = point_from_lparam(lparam);
            let mut pt = POINT { x, y };
            if !unsafe { ClientToScreen(hwnd, &mut pt) }.as_bool() {
                return None;
            }
            let point = ScreenPoint::new(pt.x as f64, pt.y as f64);
            Some(if msg == WM_MOUSEMOVE {
                ChromeEvent::PointerMoved {
                    point,
                    primary_down: wparam.0 & MK_LBUTTON_FLAG != 0,
                }
            } else {
                ChromeEvent::PointerReleased { point }
            })
        }
        WM_SIZE if wparam.0 as u32 != SIZE_MINIMIZED => Some(ChromeEvent::SizeChanged {
            width: loword_from_lparam(lparam) as f64,
            height: hiword_from_lparam(lparam) as f64,
        }),
        WM_APP_DEFERRED_LAYOUT_PASS => Some(ChromeEvent::DeferredLayoutPass),
        _ => None,
    }
}

/*
 * Outcome reported to the OS for an event that was queued behind a running
 * dispatch. System maximize/restore are replayed through the hook, so the native
 * command must not run as well.
 */
fn queued_event_outcome(event: ChromeEvent) -> EventOutcome {
    match event {
        ChromeEvent::SystemCommandMaximize | ChromeEvent::SystemCommandRestore => {
            EventOutcome::Handled
        }
        _ => EventOutcome::Unhandled,
    }
}

/// Creation parameters of a chrome window.
#[derive(Debug, Clone)]
pub struct ChromeWindowConfig {
    pub title: String,
    pub kind: WindowKind,
    pub width: i32,
    pub height: i32,
    pub start_maximized: bool,
    /// Owner window; dialogs are owned by the main window.
    pub owner: Option<WindowHandle>,
}

/*
 * Per-window state reachable from the window procedure through GWLP_USERDATA.
 * Each field is borrowed only for one dispatch; events that arrive while a
 * dispatch is running (SetWindowPos sends WM_SIZE synchronously) are queued and
 * dispatched right after it. A requested native move runs once every borrow has
 * been released, so messages pumped by the move loop dispatch normally.
 */
struct ChromeWindowContext {
    hook: RefCell<WindowMessageHook>,
    host: RefCell<Win32WindowHost>,
    chrome: RefCell<NativeChrome>,
    geometry: Win32GeometryProvider,
    app: Rc<RefCell<AppContext>>,
    pending: RefCell<VecDeque<ChromeEvent>>,
}

impl ChromeWindowContext {
    fn attach(&self, hwnd: HWND) {
        *self.host.borrow_mut() = Win32WindowHost::new(hwnd);
        self.chrome.borrow_mut().hwnd = hwnd;
    }

    /// Runs one event through the hook, or `None` when a dispatch is already in progress.
    fn try_dispatch(&self, event: ChromeEvent) -> Option<EventOutcome> {
        let mut hook = self.hook.try_borrow_mut().ok()?;
        let mut host = self.host.try_borrow_mut().ok()?;
        let mut chrome = self.chrome.try_borrow_mut().ok()?;
        let app = self.app.try_borrow().ok()?;
        let mut env = ChromeEnvironment {
            host: &mut *host,
            geometry: &self.geometry,
            app: &app,
            chrome: &mut *chrome,
        };
        Some(hook.dispatch(event, &mut env))
    }

    fn dispatch(&self, event: ChromeEvent) -> EventOutcome {
        let Some(outcome) = self.try_dispatch(event) else {
            log::trace!("ChromeWindow: Queuing {event:?} raised during a dispatch.");
            self.pending.borrow_mut().push_back(event);
            return queued_event_outcome(event);
        };
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(queued) = next else { break };
            if self.try_dispatch(queued).is_none() {
                log::warn!("ChromeWindow: Dropping {queued:?}; window state is busy.");
            }
        }
        self.run_requested_native_move();
        outcome
    }

    fn run_requested_native_move(&self) {
        let (hwnd, requested) = match self.host.try_borrow_mut() {
            Ok(mut host) => (host.hwnd, host.take_native_move_request()),
            Err(_) => return,
        };
        if requested {
            log::trace!("ChromeWindow: Entering native move loop for {hwnd:?}");
            enter_native_move_loop(hwnd);
        }
    }

    fn initialize(&self, start_maximized: bool) -> PlatformResult<()> {
        let mut hook = self.hook.try_borrow_mut().map_err(|_| {
            PlatformError::OperationFailed("window hook busy during initialization".into())
        })?;
        let mut host = self.host.borrow_mut();
        let mut chrome = self.chrome.borrow_mut();
        let app = self.app.borrow();
        let mut env = ChromeEnvironment {
            host: &mut *host,
            geometry: &self.geometry,
            app: &app,
            chrome: &mut *chrome,
        };
        hook.initialize(&mut env, start_maximized);
        Ok(())
    }

    fn handle_window_message(
        &self,
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_NCLBUTTONDOWN if is_forwarding_native_move() => {
                return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
            }
            // Client area covers the whole window; the chrome draws its own frame.
            WM_NCCALCSIZE if wparam.0 != 0 => return SUCCESS_CODE,
            WM_NCHITTEST => {
                let (x, y) = point_from_lparam(lparam);
                let hit = match self.host.try_borrow() {
                    Ok(host) => host.hit_test(ScreenPoint::new(x as f64, y as f64)),
                    Err(_) => return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
                };
                return LRESULT(hit as isize);
            }
            WM_ERASEBKGND => {
                let hdc = HDC(wparam.0 as *mut c_void);
                if let Ok(chrome) = self.chrome.try_borrow() {
                    if chrome.paint_background(hdc) {
                        return LRESULT(1);
                    }
                }
            }
            WM_CAPTURECHANGED => {
                // Capture lost to another window ends any armed drag.
                if HWND(lparam.0 as *mut c_void) != hwnd {
                    self.dispatch(ChromeEvent::PointerReleased {
                        point: ScreenPoint::default(),
                    });
                }
            }
            _ => {}
        }

        let outcome = match translate_message(hwnd, msg, wparam, lparam) {
            Some(event) => self.dispatch(event),
            None => EventOutcome::Unhandled,
        };
        if outcome.is_handled() {
            SUCCESS_CODE
        } else {
            unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
        }
    }
}

fn class_name(app_name: &str) -> HSTRING {
    HSTRING::from(format!("{app_name}_ChromeWindowClass"))
}

fn module_instance() -> PlatformResult<HINSTANCE> {
    let module = unsafe { GetModuleHandleW(None)? };
    Ok(HINSTANCE(module.0))
}

/*
 * Registers the chrome window class if it is not registered yet. CS_DBLCLKS is
 * required for WM_NCLBUTTONDBLCLK on the caption.
 */
pub fn register_window_class(app_name: &str) -> PlatformResult<()> {
    let class_name_hstring = class_name(app_name);
    let class_name_pcwstr = PCWSTR(class_name_hstring.as_ptr());
    let instance = module_instance()?;

    unsafe {
        let mut existing = WNDCLASSEXW::default();
        if GetClassInfoExW(Some(instance), class_name_pcwstr, &mut existing).is_ok() {
            log::debug!("ChromeWindow: Window class for '{app_name}' already registered.");
            return Ok(());
        }

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW | CS_DBLCLKS,
            lpfnWndProc: Some(chrome_wnd_proc_router),
            hInstance: instance,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            lpszClassName: class_name_pcwstr,
            ..Default::default()
        };

        if RegisterClassExW(&wc) == 0 {
            let error = GetLastError();
            log::error!("ChromeWindow: RegisterClassExW failed: {error:?}");
            return Err(PlatformError::InitializationFailed(format!(
                "RegisterClassExW failed: {error:?}"
            )));
        }
        log::debug!("ChromeWindow: Window class for '{app_name}' registered.");
        Ok(())
    }
}

/*
 * Creates a chrome window, registers it for theme broadcasts and runs the
 * hook's first theme application. The window is shown by the caller.
 */
pub fn create_chrome_window(
    app_name: &str,
    config: &ChromeWindowConfig,
    app: &Rc<RefCell<AppContext>>,
    restyle_content: Option<ContentRestyler>,
) -> PlatformResult<WindowHandle> {
    let context = Box::new(ChromeWindowContext {
        hook: RefCell::new(WindowMessageHook::new(config.kind)),
        host: RefCell::new(Win32WindowHost::new(HWND::default())),
        chrome: RefCell::new(NativeChrome::new(restyle_content)),
        geometry: Win32GeometryProvider,
        app: Rc::clone(app),
        pending: RefCell::new(VecDeque::new()),
    });
    let style = match config.kind {
        WindowKind::Main => WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
        WindowKind::SettingsDialog => WS_POPUP | WS_CAPTION | WS_SYSMENU | WS_CLIPCHILDREN,
    };
    let instance = module_instance()?;
    let context_ptr = Box::into_raw(context);

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            &class_name(app_name),
            &HSTRING::from(config.title.as_str()),
            style,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            config.width,
            config.height,
            config.owner.map(hwnd_from_handle),
            None,
            Some(instance),
            Some(context_ptr as *mut c_void),
        )
    };
    let hwnd = match hwnd {
        Ok(hwnd) => hwnd,
        Err(err) => {
            log::error!("ChromeWindow: CreateWindowExW failed: {err:?}");
            return Err(err.into());
        }
    };

    let window = handle_from_hwnd(hwnd);
    app.try_borrow_mut()
        .map_err(|_| PlatformError::OperationFailed("application context busy".into()))?
        .register_window(window);

    let context = unsafe { &*context_ptr };
    context.initialize(config.start_maximized)?;
    log::debug!("ChromeWindow: Created {:?} window {window:?}", config.kind);
    Ok(window)
}

fn context_for(hwnd: HWND) -> Option<&'static ChromeWindowContext> {
    let ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *const ChromeWindowContext;
    // Valid until WM_NCDESTROY clears the slot.
    unsafe { ptr.as_ref() }
}

/// Feeds an application-originated event (caption buttons) to a chrome window.
pub fn dispatch_to_window(window: WindowHandle, event: ChromeEvent) -> Option<EventOutcome> {
    context_for(hwnd_from_handle(window)).map(|context| context.dispatch(event))
}

/// Reports how far the content overflows its viewport; read by the deferred layout pass.
pub fn set_content_scrollable_width(window: WindowHandle, width: f64) -> PlatformResult<()> {
    let context = context_for(hwnd_from_handle(window))
        .ok_or_else(|| PlatformError::InvalidHandle(format!("{window:?} is not a chrome window")))?;
    context
        .host
        .try_borrow_mut()
        .map_err(|_| PlatformError::OperationFailed("window host busy".into()))?
        .set_content_scrollable_width(width);
    Ok(())
}

/*
 * Window procedure router. The context pointer arrives with WM_NCCREATE and is
 * stored in GWLP_USERDATA; WM_NCDESTROY is the last message and frees it.
 */
unsafe extern "system" fn chrome_wnd_proc_router(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context_ptr = if msg == WM_NCCREATE {
        let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
        let context_raw_ptr = create_struct.lpCreateParams as *mut ChromeWindowContext;
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, context_raw_ptr as isize) };
        if let Some(context) = unsafe { context_raw_ptr.as_ref() } {
            context.attach(hwnd);
        }
        context_raw_ptr
    } else {
        unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut ChromeWindowContext }
    };

    if context_ptr.is_null() {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    let context = unsafe { &*context_ptr };
    let result = context.handle_window_message(hwnd, msg, wparam, lparam);

    if msg == WM_NCDESTROY {
        log::debug!("ChromeWindow: WM_NCDESTROY for {hwnd:?}; releasing window state.");
        if let Ok(mut app) = context.app.try_borrow_mut() {
            app.unregister_window(handle_from_hwnd(hwnd));
        }
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
        let _ = unsafe { Box::from_raw(context_ptr) };
    }
    result
}
