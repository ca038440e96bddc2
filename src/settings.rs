/*
 * Persistent per-user settings.
 *
 * Values are stored as strings under a handful of well-known keys in a small
 * JSON file below the local application-data directory:
 *
 *   <local data dir>/OEM/MiniMica/<app name>/app.config.json
 *
 * Reads never fail from the caller's point of view: a missing key, an
 * unreadable file or a malformed file all read as "".
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};
use crate::theme::AppearanceMode;

pub const KEY_APPEARANCE: &str = "appearance";
pub const KEY_NOTIFICATION: &str = "notification";
pub const KEY_DIAGNOSTICS: &str = "diagnostics";
pub const KEY_LANGUAGE: &str = "language";

/// Language value meaning "follow the OS UI language".
pub const SYSTEM_DEFAULT_LANGUAGE: &str = "00";

const VENDOR_DIR: &str = "OEM";
const PRODUCT_DIR: &str = "MiniMica";
const CONFIG_FILE_NAME: &str = "app.config.json";

/// Key/value persistence used by the application context.
pub trait ConfigStore {
    /// The stored value, or an empty string when absent or unreadable.
    fn read(&self, key: &str) -> String;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn exists(&self) -> bool;
    /// Removes the stored settings and any directories left empty by doing so.
    fn erase(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub appearance: AppearanceMode,
    pub notification: bool,
    pub diagnostics: bool,
    pub language: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            appearance: AppearanceMode::Automatic,
            notification: true,
            diagnostics: false,
            language: SYSTEM_DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl AppSettings {
    /*
     * Loads settings from `store`. A store that does not exist yet is seeded with
     * the defaults. Individual keys that are empty or unparseable fall back to
     * their default without touching the store.
     */
    pub fn load(store: &mut dyn ConfigStore) -> Self {
        let defaults = Self::default();
        if !store.exists() {
            log::info!("Settings: No stored settings; writing defaults.");
            defaults.save(store);
            return defaults;
        }

        let appearance = AppearanceMode::from_setting(&store.read(KEY_APPEARANCE))
            .unwrap_or(defaults.appearance);
        let notification =
            parse_flag(&store.read(KEY_NOTIFICATION)).unwrap_or(defaults.notification);
        let diagnostics = parse_flag(&store.read(KEY_DIAGNOSTICS)).unwrap_or(defaults.diagnostics);
        let language = match store.read(KEY_LANGUAGE) {
            value if value.trim().is_empty() => defaults.language,
            value => value,
        };

        let settings = Self {
            appearance,
            notification,
            diagnostics,
            language,
        };
        log::debug!("Settings: Loaded {settings:?}");
        settings
    }

    /// Writes every key. Failures are logged; the in-memory values stay authoritative.
    pub fn save(&self, store: &mut dyn ConfigStore) {
        for (key, value) in [
            (KEY_APPEARANCE, self.appearance.as_setting()),
            (KEY_NOTIFICATION, flag_setting(self.notification)),
            (KEY_DIAGNOSTICS, flag_setting(self.diagnostics)),
            (KEY_LANGUAGE, self.language.as_str()),
        ] {
            persist(store, key, value);
        }
    }
}

/// Writes one key, logging instead of propagating a failure.
pub(crate) fn persist(store: &mut dyn ConfigStore, key: &str, value: &str) -> bool {
    match store.write(key, value) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Settings: Failed to persist '{key}': {e}");
            false
        }
    }
}

pub(crate) fn flag_setting(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    settings: BTreeMap<String, String>,
}

/// `ConfigStore` backed by a JSON file in the per-user local data directory.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    data_root: PathBuf,
    app_name: String,
}

impl FileConfigStore {
    /// Resolves the local data directory for the current user.
    pub fn for_app(app_name: &str) -> Result<Self> {
        let base = BaseDirs::new().ok_or(PlatformError::NoDataDirectory)?;
        Ok(Self::in_data_root(base.data_local_dir(), app_name))
    }

    /// Uses `data_root` in place of the per-user local data directory.
    pub fn in_data_root(data_root: impl AsRef<Path>, app_name: &str) -> Self {
        Self {
            data_root: data_root.as_ref().to_path_buf(),
            app_name: app_name.to_string(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.app_dir().join(CONFIG_FILE_NAME)
    }

    fn product_dir(&self) -> PathBuf {
        self.data_root.join(VENDOR_DIR).join(PRODUCT_DIR)
    }

    fn app_dir(&self) -> PathBuf {
        self.product_dir().join(&self.app_name)
    }

    fn load_file(&self) -> Result<ConfigFile> {
        let path = self.config_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
            Err(e) => return Err(PlatformError::config_io(path, e)),
        };
        serde_json::from_str(&text).map_err(|e| PlatformError::config_format(path, e))
    }
}

impl ConfigStore for FileConfigStore {
    fn read(&self, key: &str) -> String {
        match self.load_file() {
            Ok(mut file) => file.settings.remove(key).unwrap_or_default(),
            Err(e) => {
                log::warn!("Settings: Reading '{key}' failed: {e}");
                String::new()
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.config_path();
        // A malformed file is replaced rather than blocking every later write.
        let mut file = self.load_file().unwrap_or_else(|e| {
            log::warn!("Settings: Discarding unreadable config: {e}");
            ConfigFile::default()
        });
        file.settings.insert(key.to_string(), value.to_string());

        fs::create_dir_all(self.app_dir())
            .map_err(|e| PlatformError::config_io(self.app_dir(), e))?;
        let text =
            serde_json::to_string_pretty(&file)
                .map_err(|e| PlatformError::config_format(&path, e))?;
        fs::write(&path, text).map_err(|e| PlatformError::config_io(&path, e))?;
        log::trace!("Settings: Wrote '{key}' = '{value}'");
        Ok(())
    }

    fn exists(&self) -> bool {
        self.config_path().is_file()
    }

    fn erase(&mut self) -> Result<()> {
        let app_dir = self.app_dir();
        if app_dir.exists() {
            fs::remove_dir_all(&app_dir).map_err(|e| PlatformError::config_io(&app_dir, e))?;
        }
        for dir in [self.product_dir(), self.data_root.join(VENDOR_DIR)] {
            if !remove_if_empty(&dir)? {
                break;
            }
        }
        log::info!("Settings: Erased stored settings for '{}'", self.app_name);
        Ok(())
    }
}

/// Returns true when `dir` was removed (or was already gone).
fn remove_if_empty(dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(PlatformError::config_io(dir, e)),
    };
    if entries.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir).map_err(|e| PlatformError::config_io(dir, e))?;
    Ok(true)
}
