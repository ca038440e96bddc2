/*
 * Platform-agnostic colour primitives used by the theme controller. Backends
 * convert these into their native colour representation (COLORREF on Win32).
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const SILVER: Color = Color::rgb(0xC0, 0xC0, 0xC0);
    pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
}

// Mica-style window surfaces.
pub(crate) const MICA_BACKGROUND_LIGHT: Color = Color::rgb(0xF3, 0xF3, 0xF3);
pub(crate) const MICA_BACKGROUND_DARK: Color = Color::rgb(0x20, 0x20, 0x20);
pub(crate) const MICA_SHADOW_LIGHT: Color = Color::rgb(0x70, 0x70, 0x70);
pub(crate) const MICA_SHADOW_DARK: Color = Color::rgb(0x00, 0x00, 0x00);
pub(crate) const CANVAS_BORDER_LIGHT: Color = Color::rgb(0xE5, 0xE5, 0xE5);
pub(crate) const CANVAS_BORDER_DARK: Color = Color::rgb(0x3A, 0x3A, 0x3A);
