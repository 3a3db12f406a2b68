//! Settings store - typed access to the INI configuration file

use crate::coercion::{parse_bool, parse_int};
use crate::ini::{IniDocument, SetError};
use crate::persistence;
use crate::{
    AnilistSettings, ConfigError, ConfigResult, GeneralSettings, StreamSettings,
};
use std::path::{Path, PathBuf};

/// A named group of settings backed by one INI section
///
/// Each section knows its compiled-in defaults, how to render them as text
/// and how to read itself back out of a document.
pub trait SettingsSection: Default + Sized {
    /// Section name in the config file
    const NAME: &'static str;

    /// Every key of the section with its value as config file text
    fn entries(&self) -> Vec<(&'static str, String)>;

    /// Reads the section, resolving missing keys to defaults
    fn from_document(doc: &IniDocument) -> ConfigResult<Self>;
}

/// All recognised settings, one field per section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub stream: StreamSettings,
    pub general: GeneralSettings,
    pub anilist: AnilistSettings,
}

impl Settings {
    /// Reads every section from `doc`
    pub fn from_document(doc: &IniDocument) -> ConfigResult<Self> {
        Ok(Self {
            stream: StreamSettings::from_document(doc)?,
            general: GeneralSettings::from_document(doc)?,
            anilist: AnilistSettings::from_document(doc)?,
        })
    }

    /// Builds the document written on first run
    ///
    /// Compiled defaults go into `DEFAULT`; the named sections are declared
    /// but left empty for the user to fill in. A new document is built on
    /// every call.
    pub fn default_document() -> IniDocument {
        let defaults = Settings::default();
        let mut doc = IniDocument::new();
        for (key, value) in defaults
            .stream
            .entries()
            .into_iter()
            .chain(defaults.general.entries())
            .chain(defaults.anilist.entries())
        {
            doc.set_default(key, &value);
        }
        doc.add_section(StreamSettings::NAME);
        doc.add_section(GeneralSettings::NAME);
        doc.add_section(AnilistSettings::NAME);
        doc
    }
}

/// Loads, reads and updates the configuration file
///
/// The store keeps the raw document for `get`/`update` and a typed
/// [`Settings`] snapshot taken at load time.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    document: IniDocument,
    settings: Settings,
}

impl SettingsStore {
    /// Loads the config file at `path`, writing defaults first if missing
    ///
    /// Values that fail to coerce to their declared type fail the load with
    /// [`ConfigError::InvalidSettingValue`]. Missing keys and sections
    /// resolve to defaults.
    pub fn load(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let (document, settings) = Self::read(&path)?;
        Ok(Self {
            path,
            document,
            settings,
        })
    }

    /// Re-reads the config file, replacing both document and snapshot
    pub fn reload(&mut self) -> ConfigResult<()> {
        let (document, settings) = Self::read(&self.path)?;
        self.document = document;
        self.settings = settings;
        Ok(())
    }

    fn read(path: &Path) -> ConfigResult<(IniDocument, Settings)> {
        let mut document = Settings::default_document();

        if !path.exists() {
            log::info!(
                "Config file not found at {}, writing defaults",
                path.display()
            );
            persistence::write_atomic(path, &document.to_string())?;
        }

        let contents = persistence::read_to_string(path)?;
        let from_file = IniDocument::parse(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })?;
        document.overlay(from_file);

        let settings = Settings::from_document(&document)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok((document, settings))
    }

    /// Path of the config file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Typed settings as of the last load
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The in-memory INI document
    pub fn document(&self) -> &IniDocument {
        &self.document
    }

    /// Raw value of `key` in `section`, falling back to `DEFAULT`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.document.get(section, key)
    }

    /// Value of `key` coerced to a boolean
    pub fn get_bool(&self, section: &str, key: &str) -> ConfigResult<Option<bool>> {
        self.get(section, key)
            .map(|raw| {
                parse_bool(raw).ok_or_else(|| invalid(section, key, raw, "a boolean"))
            })
            .transpose()
    }

    /// Value of `key` coerced to an integer
    pub fn get_int(&self, section: &str, key: &str) -> ConfigResult<Option<i64>> {
        self.get(section, key)
            .map(|raw| parse_int(raw).ok_or_else(|| invalid(section, key, raw, "an integer")))
            .transpose()
    }

    /// Sets `key` in `section` and rewrites the whole file
    ///
    /// The typed snapshot returned by [`settings`](Self::settings) is not
    /// touched; call [`reload`](Self::reload) to refresh it. On a failed
    /// write the in-memory document keeps the new value.
    pub fn update(&mut self, section: &str, key: &str, value: &str) -> ConfigResult<()> {
        self.document
            .set(section, key, value)
            .map_err(|e| match e {
                SetError::UnknownSection(name) => ConfigError::UnknownSection(name),
                SetError::InvalidKey(key) => ConfigError::InvalidKey {
                    section: section.to_string(),
                    key,
                },
            })?;
        log::debug!("Set [{}] {} = {}", section, key, value);
        self.save()
    }

    fn save(&self) -> ConfigResult<()> {
        persistence::write_atomic(&self.path, &self.document.to_string())?;
        log::info!("Config saved to {}", self.path.display());
        Ok(())
    }
}

fn invalid(section: &str, key: &str, raw: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidSettingValue {
        section: section.to_string(),
        key: key.to_string(),
        value: raw.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::DEFAULT_SECTION;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.ini");
        (temp_dir, config_path)
    }

    #[test]
    fn test_load_creates_file_with_defaults() {
        let (_temp_dir, config_path) = setup_test_dir();

        let store = SettingsStore::load(&config_path).expect("Should load");
        assert!(config_path.exists());
        assert_eq!(store.settings(), &Settings::default());

        let written = fs::read_to_string(&config_path).expect("Should read");
        assert!(written.starts_with("[DEFAULT]\n"));
        assert!(written.contains("\n[stream]\n"));
        assert!(written.contains("\n[general]\n"));
        assert!(written.contains("\n[anilist]\n"));
    }

    #[test]
    fn test_load_creates_missing_parent_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("FastAnime").join("config.ini");

        SettingsStore::load(&config_path).expect("Should load");
        assert!(config_path.exists());
    }

    #[test]
    fn test_load_is_idempotent() {
        let (_temp_dir, config_path) = setup_test_dir();

        let first = SettingsStore::load(&config_path).expect("Should load");
        let second = SettingsStore::load(&config_path).expect("Should load again");
        assert_eq!(first.settings(), second.settings());
        assert_eq!(first.document(), second.document());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "[stream]\nserver = dropbox\n").expect("Should write");

        let store = SettingsStore::load(&config_path).expect("Should load");
        assert_eq!(store.settings().stream.server, "dropbox");
        assert_eq!(store.settings().stream.quality, "1080");
        assert_eq!(store.settings().anilist.sort_by, "search match");
    }

    #[test]
    fn test_get_reads_document() {
        let (_temp_dir, config_path) = setup_test_dir();
        let store = SettingsStore::load(&config_path).expect("Should load");

        assert_eq!(store.get("stream", "quality"), Some("1080"));
        assert_eq!(store.get_bool("stream", "auto_select").expect("bool"), Some(true));
        assert_eq!(store.get_int("general", "notification_duration").expect("int"), Some(2));
        assert_eq!(store.get("stream", "no_such_key"), None);
        assert_eq!(store.get_int("stream", "no_such_key").expect("int"), None);
    }

    #[test]
    fn test_get_bool_rejects_non_boolean() {
        let (_temp_dir, config_path) = setup_test_dir();
        let store = SettingsStore::load(&config_path).expect("Should load");

        let err = store.get_bool("stream", "quality").unwrap_err();
        assert_eq!(err.setting(), Some(("stream", "quality")));
    }

    #[test]
    fn test_update_persists_whole_document() {
        let (_temp_dir, config_path) = setup_test_dir();
        let mut store = SettingsStore::load(&config_path).expect("Should load");

        store.update("stream", "quality", "720").expect("Should update");
        assert_eq!(store.get("stream", "quality"), Some("720"));
        assert_eq!(store.settings().stream.quality, "1080");

        let written = fs::read_to_string(&config_path).expect("Should read");
        assert!(written.contains("[stream]\nquality = 720\n"));
        assert!(written.contains("server = top"));
    }

    #[test]
    fn test_update_unknown_section() {
        let (_temp_dir, config_path) = setup_test_dir();
        let mut store = SettingsStore::load(&config_path).expect("Should load");

        let result = store.update("video", "quality", "720");
        assert!(matches!(result, Err(ConfigError::UnknownSection(ref s)) if s == "video"));
    }

    #[test]
    fn test_update_rejects_key_that_would_corrupt_file() {
        let (_temp_dir, config_path) = setup_test_dir();
        let mut store = SettingsStore::load(&config_path).expect("Should load");
        let before = fs::read_to_string(&config_path).expect("Should read");

        let result = store.update("stream", "quality = 480\n[general", "720");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidKey { ref section, .. }) if section == "stream"
        ));
        assert_eq!(fs::read_to_string(&config_path).expect("Should read"), before);
        SettingsStore::load(&config_path).expect("Should still load");
    }

    #[test]
    fn test_update_value_with_empty_lines_reloads() {
        let (_temp_dir, config_path) = setup_test_dir();
        let mut store = SettingsStore::load(&config_path).expect("Should load");

        store
            .update("general", "rofi_theme", "a\n\nb")
            .expect("Should update");

        let reloaded = SettingsStore::load(&config_path).expect("Should reload");
        assert_eq!(reloaded.settings().general.rofi_theme, "a\n\nb");
        assert_eq!(reloaded.settings().general.provider, "allanime");
    }

    #[test]
    fn test_update_default_section() {
        let (_temp_dir, config_path) = setup_test_dir();
        let mut store = SettingsStore::load(&config_path).expect("Should load");

        store
            .update(DEFAULT_SECTION, "translation_type", "dub")
            .expect("Should update");
        store.reload().expect("Should reload");
        assert_eq!(store.settings().stream.translation_type, "dub");
    }

    #[test]
    fn test_reload_picks_up_update() {
        let (_temp_dir, config_path) = setup_test_dir();
        let mut store = SettingsStore::load(&config_path).expect("Should load");

        store.update("general", "use_fzf", "True").expect("Should update");
        store.reload().expect("Should reload");
        assert!(store.settings().general.use_fzf);
    }

    #[test]
    fn test_invalid_value_fails_load() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "[stream]\nauto_next = perhaps\n").expect("Should write");

        match SettingsStore::load(&config_path) {
            Err(ConfigError::InvalidSettingValue {
                section, key, value, ..
            }) => {
                assert_eq!(section, "stream");
                assert_eq!(key, "auto_next");
                assert_eq!(value, "perhaps");
            }
            other => panic!("Expected InvalidSettingValue, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "quality = 720\n").expect("Should write");

        let result = SettingsStore::load(&config_path);
        assert!(matches!(result, Err(ConfigError::ParseError { line: 1, .. })));
    }

    #[test]
    fn test_default_document_declares_sections() {
        let doc = Settings::default_document();
        assert_eq!(
            doc.sections().collect::<Vec<_>>(),
            vec!["stream", "general", "anilist"]
        );
        assert_eq!(doc.entries(DEFAULT_SECTION).count(), 23);
    }
}
