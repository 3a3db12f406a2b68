//! Platform default locations

use crate::{ConfigError, ConfigResult};
use directories::{ProjectDirs, UserDirs};
use std::path::PathBuf;

/// Application directory name, shared with existing installs
pub const APP_NAME: &str = "FastAnime";

/// File name of the settings file inside the app directory
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// File name of the user data file inside the app directory
pub const USER_DATA_FILE_NAME: &str = "user_data.json";

/// Returns the per-user application directory
///
/// - Linux: `~/.config/FastAnime/`
/// - macOS: `~/Library/Application Support/FastAnime/`
/// - Windows: `%APPDATA%\FastAnime\config\`
pub fn app_dir() -> ConfigResult<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ConfigError::PathResolutionError {
            reason: "Could not determine user config directory".to_string(),
        })
}

/// Default location for downloaded episodes
///
/// Uses the platform videos directory, then `~/Videos`, then a relative
/// `Videos` directory when no home directory is known.
pub fn default_downloads_dir() -> PathBuf {
    let base = UserDirs::new()
        .and_then(|dirs| {
            dirs.video_dir()
                .map(|p| p.to_path_buf())
                .or_else(|| Some(dirs.home_dir().join("Videos")))
        })
        .unwrap_or_else(|| PathBuf::from("Videos"));
    base.join(APP_NAME)
}
