/*
 * Default `SystemThemeProvider`, reading the OS light/dark preference through
 * the `dark-light` crate. On Windows this is the AppsUseLightTheme value under
 * HKCU\...\Themes\Personalize.
 */

use crate::platform::SystemThemeProvider;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, Default)]
pub struct DarkLightThemeProvider;

impl DarkLightThemeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl SystemThemeProvider for DarkLightThemeProvider {
    fn current_preference(&self) -> Option<Theme> {
        theme_from_mode(dark_light::detect())
    }
}

fn theme_from_mode(mode: dark_light::Mode) -> Option<Theme> {
    match mode {
        dark_light::Mode::Dark => Some(Theme::Dark),
        dark_light::Mode::Light => Some(Theme::Light),
        // Reported when the preference could not be read.
        dark_light::Mode::Default => None,
    }
}

/// A provider that always answers with the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedThemeProvider(pub Option<Theme>);

impl SystemThemeProvider for FixedThemeProvider {
    fn current_preference(&self) -> Option<Theme> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mode_maps_to_no_preference() {
        assert_eq!(theme_from_mode(dark_light::Mode::Default), None);
        assert_eq!(theme_from_mode(dark_light::Mode::Dark), Some(Theme::Dark));
        assert_eq!(theme_from_mode(dark_light::Mode::Light), Some(Theme::Light));
    }
}
