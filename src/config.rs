//! Site configuration.
//!
//! Everything the pages show comes from a [`SiteConfig`]. The defaults
//! reproduce the AJClifton home page; a TOML file only needs the keys it
//! wants to change.
//!
//! ```toml
//! [home]
//! tagline = "Still working on it."
//!
//! [cursor]
//! blinks = 4
//! blink_time_ms = 300
//!
//! [theme]
//! name = "light"
//! accent = "#2563eb"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::components::{CursorProps, DEFAULT_CURSOR_GLYPH, TypeEffectProps};
use crate::error::{FolioError, Result};
use crate::theme::{Theme, ThemeName, ThemeOverrides};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "FOLIO_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub home: HomeContent,
    pub type_effect: TypeEffectConfig,
    pub cursor: CursorConfig,
    pub theme: ThemeConfig,
    pub list: ListConfig,
}

impl SiteConfig {
    /// Load from `path`, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file, using defaults");
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| FolioError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The path to load: explicit argument first, then `FOLIO_CONFIG`.
    pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn resolved_theme(&self) -> Theme {
        Theme::preset(self.theme.name).with_overrides(&self.theme.overrides)
    }
}

/// Page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMeta {
    /// Shown as the terminal window title.
    pub title: String,
    /// Shown as the status line.
    pub description: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "AJClifton".into(),
            description: "Main page for AJClifton.co.uk, a website owned by Alex Clifton.".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeContent {
    pub heading: String,
    pub tagline: String,
    pub links: Vec<LinkConfig>,
}

impl Default for HomeContent {
    fn default() -> Self {
        Self {
            heading: "AJClifton".into(),
            tagline: "I am working on this website very slowly.".into(),
            links: vec![
                LinkConfig::new("Github (AJClifton)", "https://github.com/AJClifton", "⎇"),
                LinkConfig::new("Github (horrid57)", "https://github.com/horrid57", "⎇"),
                LinkConfig::new(
                    "LinkedIn",
                    "https://www.linkedin.com/in/alex-clifton-1a6102160/",
                    "▣",
                ),
            ],
        }
    }
}

/// A footer link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

impl LinkConfig {
    pub fn new(label: &str, url: &str, icon: &str) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            icon: icon.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeEffectConfig {
    pub text: String,
    pub delay_ms: u64,
    pub starting_index: usize,
    pub initial_delay_ms: u64,
}

impl Default for TypeEffectConfig {
    fn default() -> Self {
        Self {
            text: "Welcome to AJClifton.co.uk".into(),
            delay_ms: 100,
            starting_index: 0,
            initial_delay_ms: 0,
        }
    }
}

impl TypeEffectConfig {
    pub fn props(&self) -> TypeEffectProps {
        TypeEffectProps::new(self.text.clone(), Duration::from_millis(self.delay_ms))
            .with_starting_index(self.starting_index)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub blinks: u32,
    pub blink_time_ms: u64,
    pub glyph: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            blinks: 6,
            blink_time_ms: 500,
            glyph: DEFAULT_CURSOR_GLYPH.into(),
        }
    }
}

impl CursorConfig {
    pub fn props(&self) -> CursorProps {
        CursorProps::new(self.blinks, Duration::from_millis(self.blink_time_ms))
            .with_glyph(self.glyph.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: ThemeName,
    #[serde(flatten)]
    pub overrides: ThemeOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub count: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { count: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::types::Rgba;

    #[test]
    fn test_defaults_match_site() {
        let config = SiteConfig::default();
        assert_eq!(config.site.title, "AJClifton");
        assert_eq!(config.home.heading, "AJClifton");
        assert_eq!(config.home.tagline, "I am working on this website very slowly.");
        assert_eq!(config.home.links.len(), 3);
        assert_eq!(config.home.links[1].url, "https://github.com/horrid57");
        assert_eq!(config.list.count, 10);
        assert_eq!(config.cursor.glyph, "|");
    }

    #[test]
    fn test_load_none_is_default() {
        assert_eq!(SiteConfig::load(None).unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_only_named_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[cursor]\nblinks = 2\n\n[theme]\nname = \"light\"\naccent = \"#ff0000\""
        )
        .unwrap();

        let config = SiteConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.cursor.blinks, 2);
        assert_eq!(config.cursor.blink_time_ms, 500);
        assert_eq!(config.home, HomeContent::default());

        let theme = config.resolved_theme();
        assert_eq!(theme.accent, Rgba::rgb(255, 0, 0));
        assert_eq!(theme.background, Rgba::rgb(0xf4, 0xf4, 0xf5));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = SiteConfig::load(Some(&path)).unwrap_err();

        assert!(matches!(err, FolioError::ConfigRead { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cursor]\nblinks = \"many\"").unwrap();
        let err = SiteConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, FolioError::ConfigParse(_)));
    }

    #[test]
    fn test_toml_output_reloads() {
        let config = SiteConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: SiteConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_props_conversion() {
        let config = SiteConfig::default();
        let props = config.type_effect.props();
        assert_eq!(props.delay, Duration::from_millis(100));
        assert_eq!(config.cursor.props().blink_time, Duration::from_millis(500));
    }
}
