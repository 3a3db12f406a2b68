//! `[general]` configuration section

use crate::coercion::{bool_text, SectionReader};
use crate::ini::IniDocument;
use crate::paths;
use crate::settings::SettingsSection;
use crate::ConfigResult;
use std::path::PathBuf;

/// Provider, UI and download preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralSettings {
    /// Anime provider used for search and streams
    pub provider: String,

    /// Title language shown in menus
    pub preferred_language: String,

    /// Where downloaded episodes are stored
    pub downloads_dir: PathBuf,

    /// Show icons in menus
    pub icons: bool,

    /// Show cover previews in the fuzzy finder
    pub preview: bool,

    /// Use fzf for menus
    pub use_fzf: bool,

    /// Use rofi for menus
    pub use_rofi: bool,

    /// Rofi theme for selection menus
    pub rofi_theme: String,

    /// Rofi theme for input prompts
    pub rofi_theme_input: String,

    /// Rofi theme for confirmation prompts
    pub rofi_theme_confirm: String,

    /// Desktop notification duration in seconds
    pub notification_duration: i64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            provider: "allanime".to_string(),
            preferred_language: "english".to_string(),
            downloads_dir: paths::default_downloads_dir(),
            icons: false,
            preview: false,
            use_fzf: false,
            use_rofi: false,
            rofi_theme: String::new(),
            rofi_theme_input: String::new(),
            rofi_theme_confirm: String::new(),
            notification_duration: 2,
        }
    }
}

impl SettingsSection for GeneralSettings {
    const NAME: &'static str = "general";

    fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("provider", self.provider.clone()),
            ("preferred_language", self.preferred_language.clone()),
            (
                "downloads_dir",
                self.downloads_dir.to_string_lossy().into_owned(),
            ),
            ("icons", bool_text(self.icons).to_string()),
            ("preview", bool_text(self.preview).to_string()),
            ("use_fzf", bool_text(self.use_fzf).to_string()),
            ("use_rofi", bool_text(self.use_rofi).to_string()),
            ("rofi_theme", self.rofi_theme.clone()),
            ("rofi_theme_input", self.rofi_theme_input.clone()),
            ("rofi_theme_confirm", self.rofi_theme_confirm.clone()),
            (
                "notification_duration",
                self.notification_duration.to_string(),
            ),
        ]
    }

    fn from_document(doc: &IniDocument) -> ConfigResult<Self> {
        let d = Self::default();
        let r = SectionReader::new(doc, Self::NAME);
        Ok(Self {
            provider: r.string("provider", &d.provider),
            preferred_language: r.string("preferred_language", &d.preferred_language),
            downloads_dir: r.path("downloads_dir", &d.downloads_dir),
            icons: r.boolean("icons", d.icons)?,
            preview: r.boolean("preview", d.preview)?,
            use_fzf: r.boolean("use_fzf", d.use_fzf)?,
            use_rofi: r.boolean("use_rofi", d.use_rofi)?,
            rofi_theme: r.string("rofi_theme", &d.rofi_theme),
            rofi_theme_input: r.string("rofi_theme_input", &d.rofi_theme_input),
            rofi_theme_confirm: r.string("rofi_theme_confirm", &d.rofi_theme_confirm),
            notification_duration: r.integer("notification_duration", d.notification_duration)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;

    #[test]
    fn test_empty_document_yields_defaults() {
        let settings =
            GeneralSettings::from_document(&IniDocument::new()).expect("Should load defaults");
        assert_eq!(settings, GeneralSettings::default());
    }

    #[test]
    fn test_reads_section_values() {
        let doc = IniDocument::parse(
            "[general]\nprovider = animepahe\nuse_fzf = yes\nnotification_duration = 5\n",
        )
        .expect("Should parse");
        let settings = GeneralSettings::from_document(&doc).expect("Should load");
        assert_eq!(settings.provider, "animepahe");
        assert!(settings.use_fzf);
        assert_eq!(settings.notification_duration, 5);
        assert!(!settings.use_rofi);
    }

    #[test]
    fn test_invalid_boolean() {
        let doc = IniDocument::parse("[general]\nicons = sometimes\n").expect("Should parse");
        let err = GeneralSettings::from_document(&doc).unwrap_err();
        assert_eq!(err.setting(), Some(("general", "icons")));
        assert!(matches!(err, ConfigError::InvalidSettingValue { .. }));
    }

    #[test]
    fn test_entries_cover_every_key() {
        let defaults = GeneralSettings::default();
        let doc = {
            let mut doc = IniDocument::new();
            for (key, value) in defaults.entries() {
                doc.set_default(key, &value);
            }
            doc
        };
        let reloaded = GeneralSettings::from_document(&doc).expect("Should load");
        assert_eq!(reloaded, defaults);
        assert_eq!(defaults.entries().len(), 11);
    }
}
