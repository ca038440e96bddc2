/*
 * Platform-agnostic value types shared by the chrome controllers and the
 * platform backends. Geometry is carried in device-independent units (DIPs)
 * unless a type or field says otherwise; screen points and monitor work areas
 * are reported by the OS in device pixels and converted with a `DpiScale`.
 */

/// Opaque identifier of a native top-level window. Only platform backends
/// interpret the wrapped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

/// Opaque identifier of a native (system) menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuHandle(pub isize);

/// Axis-aligned rectangle stored as origin plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Grows the rectangle outward by `amount` on each of the four edges.
    pub fn expanded(&self, amount: f64) -> Self {
        Self {
            left: self.left - amount,
            top: self.top - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }

    /// Shrinks the rectangle inward by `amount` on each edge, never below zero extent.
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            left: self.left + amount,
            top: self.top + amount,
            width: (self.width - amount * 2.0).max(0.0),
            height: (self.height - amount * 2.0).max(0.0),
        }
    }
}

/// A point in screen coordinates, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Per-monitor DPI scale factors (device pixels per DIP).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiScale {
    pub x: f64,
    pub y: f64,
}

impl DpiScale {
    pub const IDENTITY: DpiScale = DpiScale { x: 1.0, y: 1.0 };

    pub const fn uniform(factor: f64) -> Self {
        Self {
            x: factor,
            y: factor,
        }
    }

    /// Builds a scale from a Windows-style DPI value (96 DPI == 1.0).
    pub fn from_dpi(dpi_x: u32, dpi_y: u32) -> Self {
        Self {
            x: dpi_x as f64 / 96.0,
            y: dpi_y as f64 / 96.0,
        }
    }

    /// Rejects zero, negative, or non-finite factors reported by a confused backend.
    pub fn is_usable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x > 0.0 && self.y > 0.0
    }
}

impl Default for DpiScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Snapshot of the monitor under a window, taken at the moment of a maximize
/// transition. Never cached across monitor changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorMetrics {
    /// Work area in device pixels.
    pub work_area: Rect,
    pub scale: DpiScale,
}

/// Native frame metrics in device pixels (frame border plus padded border).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameMetrics {
    pub frame_border_px: i32,
    pub padded_border_px: i32,
}

/// The OS's minimum pointer displacement that separates a click from a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragThreshold {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for DragThreshold {
    fn default() -> Self {
        // Windows ships SM_CXDRAG/SM_CYDRAG at 4 pixels.
        Self {
            horizontal: 4.0,
            vertical: 4.0,
        }
    }
}

/// Native resize-border and glass-frame thickness applied to a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameThickness {
    pub resize_border: f64,
    pub glass_frame: f64,
}

impl FrameThickness {
    pub const NONE: FrameThickness = FrameThickness {
        resize_border: 0.0,
        glass_frame: 0.0,
    };
}

/// Glyph shown on the custom maximize/restore caption button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaximizeGlyph {
    /// Segoe Fluent Icons U+E922.
    Maximize,
    /// Segoe Fluent Icons U+E923.
    Restore,
}

/// Entries of the native system menu this crate keeps consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemMenuEntry {
    Move,
    Size,
    Maximize,
    Restore,
}

impl SystemMenuEntry {
    pub const ALL: [SystemMenuEntry; 4] = [
        SystemMenuEntry::Move,
        SystemMenuEntry::Size,
        SystemMenuEntry::Maximize,
        SystemMenuEntry::Restore,
    ];
}

/// Custom caption buttons drawn by the chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionButton {
    Close,
    Maximize,
    Minimize,
    Settings,
}

/// Distinguishes the resizable main window from the fixed-size modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Main,
    SettingsDialog,
}

/*
 * Abstracted window events delivered by the host. Pointer events are only
 * delivered for the title-bar region; `point` is always in screen device pixels.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChromeEvent {
    /// The application was activated (`true`) or deactivated (`false`).
    AppActivated { active: bool },
    /// This window gained or lost activation.
    ActivationChanged { active: bool },
    /// The native system menu is about to be shown.
    MenuPopupOpening { menu: MenuHandle },
    SystemCommandMaximize,
    SystemCommandRestore,
    SystemSettingsOrThemeChanged,
    PointerPressed { point: ScreenPoint, click_count: u32 },
    PointerMoved { point: ScreenPoint, primary_down: bool },
    PointerReleased { point: ScreenPoint },
    CaptionButton(CaptionButton),
    SizeChanged { width: f64, height: f64 },
    /// Fired by the host once the layout pass following a size change is complete.
    DeferredLayoutPass,
}

/// Whether the hook consumed an event or the host should continue default processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    Unhandled,
}

impl EventOutcome {
    pub fn is_handled(self) -> bool {
        self == EventOutcome::Handled
    }
}
