//! FastAnime configuration and user data
//!
//! Two independent stores, owned together by [`Config`]:
//!
//! - [`SettingsStore`] reads the INI settings file (sections `stream`,
//!   `general`, `anilist`), writing compiled-in defaults on first run and
//!   exposing every setting as a typed field.
//! - [`UserDataStore`] keeps watch history, favourites and the AniList
//!   profile in a JSON file that is rewritten on every change.
//!
//! Settings are strict: a value that does not coerce to its declared type
//! fails the load. User data is forgiving: a missing or corrupt file is
//! logged and replaced by an empty document.
//!
//! # Example
//!
//! ```rust,no_run
//! use fastanime_config::Config;
//!
//! let mut config = Config::new().expect("Failed to load config");
//! println!("Quality: {}", config.settings().stream.quality);
//!
//! config.update_config("stream", "quality", "720")?;
//! config.record_progress(21, Some("1"), Some("00:12:30"), Some("00:24:00"))?;
//! # Ok::<(), fastanime_config::ConfigError>(())
//! ```

mod anilist_settings;
mod coercion;
mod error;
mod general_settings;
pub mod ini;
pub mod paths;
mod persistence;
mod settings;
mod stream_settings;
mod user_data;

pub use anilist_settings::AnilistSettings;
pub use coercion::{parse_bool, parse_int};
pub use error::{ConfigError, ConfigResult};
pub use general_settings::GeneralSettings;
pub use settings::{Settings, SettingsSection, SettingsStore};
pub use stream_settings::{StreamSettings, DEFAULT_FORMAT};
pub use user_data::{
    AnimeId, FavoriteOutcome, UserData, UserDataStore, UserProfile, WatchRecord,
};

use std::fmt;
use std::path::{Path, PathBuf};

/// AniList implicit-grant authorisation page shown to log in
pub const ANILIST_LOGIN_URL: &str =
    "https://anilist.co/api/v2/oauth/authorize?client_id=20148&response_type=token";

/// Settings and user data for one run of the CLI
#[derive(Debug, Clone)]
pub struct Config {
    user_data: UserDataStore,
    settings: SettingsStore,
}

impl Config {
    /// Loads both files from the platform application directory
    ///
    /// - Linux: `~/.config/FastAnime/`
    /// - macOS: `~/Library/Application Support/FastAnime/`
    /// - Windows: `%APPDATA%\FastAnime\config\`
    pub fn new() -> ConfigResult<Self> {
        Self::with_directory(paths::app_dir()?)
    }

    /// Loads `config.ini` and `user_data.json` from `dir`
    pub fn with_directory(dir: impl AsRef<Path>) -> ConfigResult<Self> {
        let dir = dir.as_ref();
        Self::with_paths(
            dir.join(paths::CONFIG_FILE_NAME),
            dir.join(paths::USER_DATA_FILE_NAME),
        )
    }

    /// Loads from explicit file paths
    ///
    /// User data is loaded first and never fails; the settings load fails on
    /// unreadable files or values of the wrong type.
    pub fn with_paths(
        config_path: impl Into<PathBuf>,
        user_data_path: impl Into<PathBuf>,
    ) -> ConfigResult<Self> {
        let user_data = UserDataStore::load(user_data_path);
        let settings = SettingsStore::load(config_path)?;
        Ok(Self {
            user_data,
            settings,
        })
    }

    /// Typed settings as of the last load
    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn settings_store(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn user_data(&self) -> &UserDataStore {
        &self.user_data
    }

    /// Raw setting value, see [`SettingsStore::get`]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.settings.get(section, key)
    }

    /// Sets a config key and rewrites the config file
    pub fn update_config(&mut self, section: &str, key: &str, value: &str) -> ConfigResult<()> {
        self.settings.update(section, key, value)
    }

    /// Re-reads the config file
    pub fn reload_settings(&mut self) -> ConfigResult<()> {
        self.settings.reload()
    }

    /// See [`UserDataStore::record_progress`]
    pub fn record_progress(
        &mut self,
        anime_id: AnimeId,
        episode: Option<&str>,
        start_time: Option<&str>,
        total_time: Option<&str>,
    ) -> ConfigResult<()> {
        self.user_data
            .record_progress(anime_id, episode, start_time, total_time)
    }

    /// See [`UserDataStore::set_user`]
    pub fn set_user(&mut self, profile: UserProfile) -> ConfigResult<()> {
        self.user_data.set_user(profile)
    }

    /// See [`UserDataStore::toggle_favorite`]
    pub fn toggle_favorite(
        &mut self,
        anime_id: AnimeId,
        remove: bool,
    ) -> ConfigResult<FavoriteOutcome> {
        self.user_data.toggle_favorite(anime_id, remove)
    }
}

impl Config {
    /// Current text of a setting, as `get` sees it
    fn live_text(&self, section: &str, key: &str) -> &str {
        self.get(section, key).unwrap_or_default()
    }

    /// Current boolean setting, or its raw text if it does not coerce
    fn live_flag(&self, section: &str, key: &str) -> String {
        match self.settings.get_bool(section, key) {
            Ok(Some(value)) => value.to_string(),
            _ => self.live_text(section, key).to_string(),
        }
    }
}

/// Diagnostic summary read from the in-memory document, so it reflects
/// `update_config` without a reload
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config(server:{},quality:{},auto_next:{},continue_from_history:{},sort_by:{},downloads_dir:{})",
            self.live_text("stream", "server"),
            self.live_text("stream", "quality"),
            self.live_flag("stream", "auto_next"),
            self.live_flag("stream", "continue_from_history"),
            self.live_text("anilist", "sort_by"),
            self.live_text("general", "downloads_dir")
        )
    }
}
