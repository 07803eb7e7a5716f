//! Branding → concrete CSS values, one field at a time.

use crate::generation::models::Branding;

pub const DEFAULT_PRIMARY: &str = "#8C4BFF";
pub const DEFAULT_SECONDARY: &str = "#6E76FF";
pub const DEFAULT_ACCENT: &str = "#22D3EE";
pub const DEFAULT_BACKGROUND: &str = "#0B0D12";
pub const DEFAULT_TEXT: &str = "#FFFFFF";
pub const DEFAULT_FONT_STACK: &str =
    "Inter, -apple-system, Segoe UI, Roboto, Helvetica, Arial, sans-serif";

/// Fully resolved colours and fonts for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme<'a> {
    pub primary: &'a str,
    pub secondary: &'a str,
    pub accent: &'a str,
    pub background: &'a str,
    pub text: &'a str,
    pub heading_font: &'a str,
    pub body_font: &'a str,
}

impl<'a> Theme<'a> {
    pub fn resolve(branding: &'a Branding) -> Self {
        let palette = &branding.color_palette;
        let typography = &branding.typography;
        Self {
            primary: pick(&palette.primary, DEFAULT_PRIMARY),
            secondary: pick(&palette.secondary, DEFAULT_SECONDARY),
            accent: pick(&palette.accent, DEFAULT_ACCENT),
            background: pick(&palette.background, DEFAULT_BACKGROUND),
            text: pick(&palette.text, DEFAULT_TEXT),
            heading_font: pick(&typography.heading, DEFAULT_FONT_STACK),
            body_font: pick(&typography.body, DEFAULT_FONT_STACK),
        }
    }
}

/// Empty strings count as absent.
fn pick<'a>(value: &'a Option<String>, fallback: &'static str) -> &'a str {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
}
