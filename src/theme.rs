/*
 * Theme resolution and chrome colouring.
 *
 * The effective theme is recomputed on every notification from the user's
 * appearance mode and, in Automatic mode, the OS preference. Nothing here caches
 * the result beyond one dispatch. Windows are styled through the
 * `ThemeableChrome` capability so the main window and the settings dialog share
 * one code path.
 */

use crate::platform::{SystemThemeProvider, ThemeChangeNotifier, ThemeableChrome};
use crate::styling_primitives::{
    CANVAS_BORDER_DARK, CANVAS_BORDER_LIGHT, Color, MICA_BACKGROUND_DARK, MICA_BACKGROUND_LIGHT,
    MICA_SHADOW_DARK, MICA_SHADOW_LIGHT,
};
use crate::system_menu::entry_enabled_for_state;
use crate::types::{MaximizeGlyph, SystemMenuEntry, WindowHandle};

/// User-selected appearance, persisted as `"0"`, `"1"` or `"2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppearanceMode {
    Dark,
    Light,
    #[default]
    Automatic,
}

impl AppearanceMode {
    pub fn from_setting(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(AppearanceMode::Dark),
            "1" => Some(AppearanceMode::Light),
            "2" => Some(AppearanceMode::Automatic),
            _ => None,
        }
    }

    pub fn as_setting(self) -> &'static str {
        match self {
            AppearanceMode::Dark => "0",
            AppearanceMode::Light => "1",
            AppearanceMode::Automatic => "2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn is_light(self) -> bool {
        self == Theme::Light
    }
}

/// One of the four caption-button style variants, keyed by theme and activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    LightActivated,
    LightDeactivated,
    DarkActivated,
    DarkDeactivated,
}

impl ButtonStyle {
    pub fn for_state(theme: Theme, activated: bool) -> Self {
        match (theme, activated) {
            (Theme::Light, true) => ButtonStyle::LightActivated,
            (Theme::Light, false) => ButtonStyle::LightDeactivated,
            (Theme::Dark, true) => ButtonStyle::DarkActivated,
            (Theme::Dark, false) => ButtonStyle::DarkDeactivated,
        }
    }

    /// Colour of the button glyphs.
    fn glyph_color(self) -> Color {
        match self {
            ButtonStyle::LightActivated => Color::BLACK,
            ButtonStyle::LightDeactivated => Color::rgb(0x99, 0x99, 0x99),
            ButtonStyle::DarkActivated => Color::WHITE,
            ButtonStyle::DarkDeactivated => Color::rgb(0x70, 0x70, 0x70),
        }
    }

    /// Background behind a hovered minimize/maximize/settings button.
    fn hover_background(self) -> Color {
        match self {
            ButtonStyle::LightActivated | ButtonStyle::LightDeactivated => {
                Color::rgb(0xE9, 0xE9, 0xE9)
            }
            ButtonStyle::DarkActivated | ButtonStyle::DarkDeactivated => {
                Color::rgb(0x2D, 0x2D, 0x2D)
            }
        }
    }

    /// The close button always hovers red, whatever the theme.
    fn close_hover_background(self) -> Color {
        Color::rgb(0xC4, 0x2B, 0x1C)
    }
}

/// Everything a window needs to restyle itself for one theme and activation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeAppearance {
    pub theme: Theme,
    pub activated: bool,
    pub background: Color,
    pub shadow_color: Color,
    pub shadow_opacity: f64,
    pub border: Color,
    pub button_style: ButtonStyle,
    /// Caption button glyphs and hover backgrounds for `button_style`.
    pub caption_glyph: Color,
    pub caption_hover: Color,
    pub close_hover: Color,
    pub title_text: Color,
    /// Accent of the main window's content area.
    pub content_accent: Color,
    /// Primary and secondary text of dialog content.
    pub primary_text: Color,
    pub secondary_text: Color,
}

impl ChromeAppearance {
    pub fn new(theme: Theme, activated: bool) -> Self {
        let light = theme.is_light();
        let button_style = ButtonStyle::for_state(theme, activated);
        let title_text = match (light, activated) {
            (true, true) => Color::BLACK,
            (true, false) => Color::SILVER,
            (false, true) => Color::WHITE,
            (false, false) => Color::GRAY,
        };
        Self {
            theme,
            activated,
            background: if light { MICA_BACKGROUND_LIGHT } else { MICA_BACKGROUND_DARK },
            shadow_color: if light { MICA_SHADOW_LIGHT } else { MICA_SHADOW_DARK },
            shadow_opacity: if light { 0.25 } else { 0.75 },
            border: if light { CANVAS_BORDER_LIGHT } else { CANVAS_BORDER_DARK },
            button_style,
            caption_glyph: button_style.glyph_color(),
            caption_hover: button_style.hover_background(),
            close_hover: button_style.close_hover_background(),
            title_text,
            content_accent: if light {
                Color::rgb(0x80, 0x00, 0x80)
            } else {
                Color::rgb(0xFF, 0xA5, 0x00)
            },
            primary_text: if light { Color::BLACK } else { Color::WHITE },
            secondary_text: if light {
                Color::rgb(0x66, 0x66, 0x66)
            } else {
                Color::rgb(0x99, 0x99, 0x99)
            },
        }
    }
}

/*
 * Derived, never stored: what the caption area and system menu should look like
 * for a given geometry state, activation state and theme.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeAffordance {
    pub glyph: MaximizeGlyph,
    pub button_style: ButtonStyle,
    is_pseudo_maximized: bool,
}

impl ChromeAffordance {
    pub fn derive(is_pseudo_maximized: bool, activated: bool, theme: Theme) -> Self {
        Self {
            glyph: if is_pseudo_maximized {
                MaximizeGlyph::Restore
            } else {
                MaximizeGlyph::Maximize
            },
            button_style: ButtonStyle::for_state(theme, activated),
            is_pseudo_maximized,
        }
    }

    pub fn menu_entry_enabled(&self, entry: SystemMenuEntry) -> bool {
        entry_enabled_for_state(entry, self.is_pseudo_maximized)
    }
}

/// Resolves the effective theme and pushes it to every registered top-level window.
pub struct ThemeController {
    provider: Box<dyn SystemThemeProvider>,
    windows: Vec<WindowHandle>,
}

impl ThemeController {
    pub fn new(provider: Box<dyn SystemThemeProvider>) -> Self {
        Self {
            provider,
            windows: Vec::new(),
        }
    }

    pub fn resolve(&self, mode: AppearanceMode) -> Theme {
        match mode {
            AppearanceMode::Dark => Theme::Dark,
            AppearanceMode::Light => Theme::Light,
            AppearanceMode::Automatic => self.provider.current_preference().unwrap_or_else(|| {
                log::warn!("ThemeController: System theme preference unreadable; using Dark.");
                Theme::Dark
            }),
        }
    }

    pub fn apply_to(
        &self,
        chrome: &mut dyn ThemeableChrome,
        mode: AppearanceMode,
        activated: bool,
    ) -> Theme {
        let theme = self.resolve(mode);
        log::debug!("ThemeController: Applying {theme:?} (mode {mode:?}, activated: {activated})");
        chrome.apply_theme(&ChromeAppearance::new(theme, activated));
        theme
    }

    pub fn register(&mut self, window: WindowHandle) {
        if !self.windows.contains(&window) {
            log::debug!("ThemeController: Registered window {window:?}");
            self.windows.push(window);
        }
    }

    pub fn unregister(&mut self, window: WindowHandle) {
        self.windows.retain(|registered| *registered != window);
    }

    pub fn registered_windows(&self) -> &[WindowHandle] {
        &self.windows
    }

    /// Notifies every registered window; each re-runs `apply_to` from its own hook.
    pub fn broadcast_change(&self, notifier: &dyn ThemeChangeNotifier) {
        log::debug!(
            "ThemeController: Broadcasting theme change to {} window(s)",
            self.windows.len()
        );
        for window in &self.windows {
            notifier.notify_theme_changed(*window);
        }
    }
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("windows", &self.windows)
            .finish_non_exhaustive()
    }
}
