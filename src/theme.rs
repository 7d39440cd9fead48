//! Colour themes.
//!
//! Three palettes: `dark` (zinc-800 background, white text), `light`
//! (zinc-100 background, near-black text) and `terminal`, which defers to
//! the terminal's own colours and ANSI palette.
//!
//! Individual slots can be overridden from config with hex strings.

use serde::{Deserialize, Serialize};

use crate::types::Rgba;

/// Which built-in palette to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    Terminal,
}

/// Resolved colours for drawing a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgba,
    pub text: Rgba,
    pub muted: Rgba,
    pub accent: Rgba,
}

impl Theme {
    pub fn preset(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self {
                background: Rgba::from_rgb_int(0x27272a),
                text: Rgba::WHITE,
                muted: Rgba::from_rgb_int(0xa1a1aa),
                accent: Rgba::from_rgb_int(0xe4e4e7),
            },
            ThemeName::Light => Self {
                background: Rgba::from_rgb_int(0xf4f4f5),
                text: Rgba::from_rgb_int(0x18181b),
                muted: Rgba::from_rgb_int(0x71717a),
                accent: Rgba::from_rgb_int(0x3f3f46),
            },
            ThemeName::Terminal => Self {
                background: Rgba::TERMINAL_DEFAULT,
                text: Rgba::TERMINAL_DEFAULT,
                muted: Rgba::ansi(8),
                accent: Rgba::ansi(12),
            },
        }
    }

    /// Apply hex overrides on top of this palette.
    ///
    /// Unparseable values are logged and ignored.
    pub fn with_overrides(mut self, overrides: &ThemeOverrides) -> Self {
        let slots = [
            ("background", &overrides.background, &mut self.background),
            ("text", &overrides.text, &mut self.text),
            ("muted", &overrides.muted, &mut self.muted),
            ("accent", &overrides.accent, &mut self.accent),
        ];

        for (slot, value, target) in slots {
            let Some(hex) = value else { continue };
            match Rgba::from_hex(hex) {
                Some(color) => *target = color,
                None => tracing::warn!(slot, value = %hex, "ignoring invalid theme colour"),
            }
        }
        self
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::preset(ThemeName::default())
    }
}

/// Optional per-slot colour overrides (`#RGB` or `#RRGGBB`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_is_zinc_800() {
        let theme = Theme::preset(ThemeName::Dark);
        assert_eq!(theme.background, Rgba::rgb(0x27, 0x27, 0x2a));
        assert_eq!(theme.text, Rgba::WHITE);
    }

    #[test]
    fn test_light_is_zinc_100() {
        let theme = Theme::preset(ThemeName::Light);
        assert_eq!(theme.background, Rgba::rgb(0xf4, 0xf4, 0xf5));
    }

    #[test]
    fn test_terminal_uses_defaults() {
        let theme = Theme::preset(ThemeName::Terminal);
        assert!(theme.background.is_terminal_default());
        assert!(theme.muted.is_ansi());
    }

    #[test]
    fn test_overrides_apply_and_skip_invalid() {
        let overrides = ThemeOverrides {
            accent: Some("#ff0000".into()),
            text: Some("not a colour".into()),
            ..ThemeOverrides::default()
        };
        let theme = Theme::preset(ThemeName::Dark).with_overrides(&overrides);

        assert_eq!(theme.accent, Rgba::rgb(255, 0, 0));
        assert_eq!(theme.text, Rgba::WHITE);
    }

    #[test]
    fn test_theme_name_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            theme: ThemeName,
        }
        let parsed: Wrapper = toml::from_str("theme = \"light\"").unwrap();
        assert_eq!(parsed.theme, ThemeName::Light);
    }
}
