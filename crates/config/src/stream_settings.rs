//! `[stream]` configuration section

use crate::coercion::{bool_text, SectionReader};
use crate::ini::IniDocument;
use crate::settings::SettingsSection;
use crate::ConfigResult;

/// yt-dlp format selector used when no quality-specific stream is found
pub const DEFAULT_FORMAT: &str = "best[height<=1080]/bestvideo[height<=1080]+bestaudio/best";

/// Playback and stream selection preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSettings {
    /// Skip intros and outros where skip data exists
    pub skip: bool,

    /// Play the next episode when one finishes
    pub auto_next: bool,

    /// Pick the best search match without asking
    pub auto_select: bool,

    /// Resume from the episode recorded in watch history
    pub continue_from_history: bool,

    /// Drive mpv through its IPC interface instead of a plain subprocess
    pub use_mpv_mod: bool,

    /// Number of attempts when a stream fails to load
    pub error: i64,

    /// mpv `--force-window` value
    pub force_window: String,

    /// `sub` or `dub`
    pub translation_type: String,

    /// Preferred vertical resolution
    pub quality: String,

    /// Preferred streaming server, `top` for the first available
    pub server: String,

    /// yt-dlp format selector for downloads
    pub format: String,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            skip: false,
            auto_next: false,
            auto_select: true,
            continue_from_history: true,
            use_mpv_mod: false,
            error: 3,
            force_window: "immediate".to_string(),
            translation_type: "sub".to_string(),
            quality: "1080".to_string(),
            server: "top".to_string(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl SettingsSection for StreamSettings {
    const NAME: &'static str = "stream";

    fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("skip", bool_text(self.skip).to_string()),
            ("auto_next", bool_text(self.auto_next).to_string()),
            ("auto_select", bool_text(self.auto_select).to_string()),
            (
                "continue_from_history",
                bool_text(self.continue_from_history).to_string(),
            ),
            ("use_mpv_mod", bool_text(self.use_mpv_mod).to_string()),
            ("error", self.error.to_string()),
            ("force_window", self.force_window.clone()),
            ("translation_type", self.translation_type.clone()),
            ("quality", self.quality.clone()),
            ("server", self.server.clone()),
            ("format", self.format.clone()),
        ]
    }

    fn from_document(doc: &IniDocument) -> ConfigResult<Self> {
        let d = Self::default();
        let r = SectionReader::new(doc, Self::NAME);
        Ok(Self {
            skip: r.boolean("skip", d.skip)?,
            auto_next: r.boolean("auto_next", d.auto_next)?,
            auto_select: r.boolean("auto_select", d.auto_select)?,
            continue_from_history: r.boolean("continue_from_history", d.continue_from_history)?,
            use_mpv_mod: r.boolean("use_mpv_mod", d.use_mpv_mod)?,
            error: r.integer("error", d.error)?,
            force_window: r.string("force_window", &d.force_window),
            translation_type: r.string("translation_type", &d.translation_type),
            quality: r.string("quality", &d.quality),
            server: r.string("server", &d.server),
            format: r.string("format", &d.format),
        })
    }
}
