/*
 * The application-context value: current settings, their backing store and the
 * theme controller. Constructed once at startup and passed by reference to
 * every window hook, instead of living in process-wide globals.
 */

use crate::error::Result;
use crate::platform::{SystemThemeProvider, ThemeChangeNotifier};
use crate::settings::{self, AppSettings, ConfigStore};
use crate::theme::{AppearanceMode, Theme, ThemeController};
use crate::types::WindowHandle;

pub struct AppContext {
    settings: AppSettings,
    store: Box<dyn ConfigStore>,
    theme: ThemeController,
}

impl AppContext {
    /// Loads (or seeds) the stored settings.
    pub fn new(
        mut store: Box<dyn ConfigStore>,
        theme_provider: Box<dyn SystemThemeProvider>,
    ) -> Self {
        let settings = AppSettings::load(store.as_mut());
        Self {
            settings,
            store,
            theme: ThemeController::new(theme_provider),
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn appearance(&self) -> AppearanceMode {
        self.settings.appearance
    }

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    /// Effective theme right now. Not cached: the OS preference may have changed.
    pub fn resolved_theme(&self) -> Theme {
        self.theme.resolve(self.settings.appearance)
    }

    pub fn register_window(&mut self, window: WindowHandle) {
        self.theme.register(window);
    }

    pub fn unregister_window(&mut self, window: WindowHandle) {
        self.theme.unregister(window);
    }

    /*
     * Stores the new mode and pushes a theme change to every open window. The
     * in-memory value is kept even if it cannot be persisted.
     */
    pub fn set_appearance(&mut self, mode: AppearanceMode, notifier: &dyn ThemeChangeNotifier) {
        log::info!("AppContext: Appearance set to {mode:?}");
        self.settings.appearance = mode;
        settings::persist(self.store.as_mut(), settings::KEY_APPEARANCE, mode.as_setting());
        self.theme.broadcast_change(notifier);
    }

    pub fn set_notification(&mut self, enabled: bool) {
        self.settings.notification = enabled;
        settings::persist(
            self.store.as_mut(),
            settings::KEY_NOTIFICATION,
            settings::flag_setting(enabled),
        );
    }

    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.settings.diagnostics = enabled;
        settings::persist(
            self.store.as_mut(),
            settings::KEY_DIAGNOSTICS,
            settings::flag_setting(enabled),
        );
    }

    pub fn set_language(&mut self, language: &str) {
        self.settings.language = language.to_string();
        settings::persist(self.store.as_mut(), settings::KEY_LANGUAGE, language);
    }

    /// Removes the stored settings (uninstall). In-memory values are unchanged.
    pub fn erase_stored_settings(&mut self) -> Result<()> {
        self.store.erase()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}
