/*
 * Keeps the native system menu (Alt+Space, taskbar right-click) consistent with
 * the simulated window state. Stateless: every popup re-derives the entries from
 * the current state, and only Move/Size/Maximize/Restore are ever touched.
 */

use crate::platform::SystemMenu;
use crate::types::{MenuHandle, SystemMenuEntry, WindowKind};

/// Which enablement table a window uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuProfile {
    /// Resizable main window; entries follow the pseudo-maximized state.
    Resizable,
    /// Non-resizable, non-maximizable dialog; only Move is enabled.
    FixedDialog,
}

impl From<WindowKind> for MenuProfile {
    fn from(kind: WindowKind) -> Self {
        match kind {
            WindowKind::Main => MenuProfile::Resizable,
            WindowKind::SettingsDialog => MenuProfile::FixedDialog,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SystemMenuAdapter {
    profile: MenuProfile,
}

impl SystemMenuAdapter {
    pub fn new(profile: MenuProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> MenuProfile {
        self.profile
    }

    pub fn sync<M: SystemMenu + ?Sized>(
        &self,
        target: &mut M,
        menu: MenuHandle,
        is_pseudo_maximized: bool,
    ) {
        log::trace!(
            "SystemMenu: Syncing {menu:?} ({:?}, pseudo-maximized: {is_pseudo_maximized})",
            self.profile
        );
        for entry in SystemMenuEntry::ALL {
            target.set_entry_enabled(menu, entry, self.is_enabled(entry, is_pseudo_maximized));
        }
    }

    pub fn is_enabled(&self, entry: SystemMenuEntry, is_pseudo_maximized: bool) -> bool {
        match self.profile {
            MenuProfile::Resizable => entry_enabled_for_state(entry, is_pseudo_maximized),
            MenuProfile::FixedDialog => entry == SystemMenuEntry::Move,
        }
    }
}

/// The main-window enablement table: Restore only when maximized, the rest only when Normal.
pub fn entry_enabled_for_state(entry: SystemMenuEntry, is_pseudo_maximized: bool) -> bool {
    match entry {
        SystemMenuEntry::Restore => is_pseudo_maximized,
        SystemMenuEntry::Move | SystemMenuEntry::Size | SystemMenuEntry::Maximize => {
            !is_pseudo_maximized
        }
    }
}
