/*
 * Provides the public entry point for the micachrome crate: a custom window
 * chrome controller that pseudo-maximizes windows to the monitor work area,
 * turns title-bar drags of a maximized window into drag-to-restore, keeps the
 * system menu consistent with the geometry state, and themes the chrome from the
 * persisted appearance setting.
 *
 * The controllers are platform-agnostic and talk to the OS only through the
 * traits in `platform`, so they build and test on every target. The Win32
 * backend in `window_common` implements those traits and owns the window
 * procedure; it is compiled on Windows only.
 */
pub mod app_context;
pub mod drag_gesture;
pub mod error;
pub mod geometry;
pub mod message_hook;
pub mod platform;
pub mod pseudo_maximize;
pub mod settings;
pub mod styling_primitives;
pub mod system_menu;
pub mod system_theme;
pub mod theme;
pub mod types;
#[cfg(target_os = "windows")]
pub mod window_common;

#[cfg(test)]
mod test_support;

pub use app_context::AppContext;
pub use drag_gesture::{DragGestureTracker, DragSession};
pub use error::{PlatformError, Result as PlatformResult};
pub use message_hook::{ChromeEnvironment, WindowMessageHook};
pub use platform::{
    PlatformGeometryProvider, SystemMenu, SystemThemeProvider, ThemeChangeNotifier,
    ThemeableChrome, WindowHost,
};
pub use pseudo_maximize::{PseudoMaximizeController, WindowGeometryState};
pub use settings::{AppSettings, ConfigStore, FileConfigStore};
pub use styling_primitives::Color;
pub use system_menu::{MenuProfile, SystemMenuAdapter};
pub use system_theme::{DarkLightThemeProvider, FixedThemeProvider};
pub use theme::{
    AppearanceMode, ButtonStyle, ChromeAffordance, ChromeAppearance, Theme, ThemeController,
};
pub use types::{
    CaptionButton, ChromeEvent, DpiScale, DragThreshold, EventOutcome, FrameMetrics,
    FrameThickness, MaximizeGlyph, MenuHandle, MonitorMetrics, Rect, ScreenPoint,
    SystemMenuEntry, WindowHandle, WindowKind,
};
#[cfg(target_os = "windows")]
pub use window_common::{
    ChromeWindowConfig, Win32GeometryProvider, Win32ThemeNotifier, Win32WindowHost,
    create_chrome_window, dispatch_to_window, init_app_dark_mode, register_window_class,
};
