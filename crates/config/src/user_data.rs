//! User data store - watch history, favourites and the AniList profile
//!
//! The document lives in a single JSON file that is rewritten in full on
//! every change. Loading never fails: a missing, unreadable or malformed
//! file is logged and replaced by an empty document, and a known key of the
//! wrong shape is logged and reset on its own without losing the others.

use crate::persistence;
use crate::ConfigResult;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// AniList media id
pub type AnimeId = u64;

/// Opaque AniList profile payload
pub type UserProfile = Map<String, Value>;

fn zero() -> String {
    "0".to_string()
}

/// Older clients wrote positions and episode labels as bare numbers
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, found {}",
            json_kind(&other)
        ))),
    }
}

fn optional_text_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => text_or_number(value).map(Some).map_err(D::Error::custom),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Last watched position for one anime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchRecord {
    /// Episode label, `None` when no episode has been recorded yet
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub episode: Option<String>,

    /// Playback position the episode was left at
    #[serde(default = "zero", deserialize_with = "text_or_number")]
    pub start_time: String,

    /// Total duration of the episode
    #[serde(default = "zero", deserialize_with = "text_or_number")]
    pub total_time: String,
}

/// The persisted user data document
///
/// Top-level keys other than the three known ones are kept in `extra` and
/// written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserData {
    /// Anime id (as a string) to last watched position
    pub watch_history: IndexMap<String, WatchRecord>,

    /// Favourite anime ids
    pub animelist: Vec<AnimeId>,

    /// Logged-in profile, empty when logged out
    pub user: UserProfile,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserData {
    /// Builds the document from a parsed JSON object, one known key at a time
    ///
    /// A known key holding the wrong shape is logged and falls back to its
    /// default. Inside `watch_history` and `animelist` only the offending
    /// entries are dropped.
    pub fn from_object(mut root: Map<String, Value>) -> Self {
        let watch_history = root
            .remove("watch_history")
            .map(history_from_value)
            .unwrap_or_default();
        let animelist = root
            .remove("animelist")
            .map(favorites_from_value)
            .unwrap_or_default();
        let user = match root.remove("user") {
            None | Some(Value::Null) => UserProfile::new(),
            Some(Value::Object(profile)) => profile,
            Some(other) => {
                log::warn!(
                    "Ignoring user data key \"user\": expected an object, found {}",
                    json_kind(&other)
                );
                UserProfile::new()
            }
        };

        Self {
            watch_history,
            animelist,
            user,
            extra: root,
        }
    }
}

fn history_from_value(value: Value) -> IndexMap<String, WatchRecord> {
    let entries = match value {
        Value::Object(entries) => entries,
        other => {
            log::warn!(
                "Ignoring user data key \"watch_history\": expected an object, found {}",
                json_kind(&other)
            );
            return IndexMap::new();
        }
    };

    entries
        .into_iter()
        .filter_map(
            |(anime_id, record)| match serde_json::from_value::<WatchRecord>(record) {
                Ok(record) => Some((anime_id, record)),
                Err(e) => {
                    log::warn!("Dropping watch history entry {}: {}", anime_id, e);
                    None
                }
            },
        )
        .collect()
}

fn favorites_from_value(value: Value) -> Vec<AnimeId> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            log::warn!(
                "Ignoring user data key \"animelist\": expected an array, found {}",
                json_kind(&other)
            );
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| {
            let id = match &item {
                Value::Number(number) => number.as_u64(),
                Value::String(text) => text.trim().parse().ok(),
                _ => None,
            };
            if id.is_none() {
                log::warn!("Dropping favourite {}: not an anime id", item);
            }
            id
        })
        .collect()
}

/// Result of [`UserDataStore::toggle_favorite`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added,
    Removed,
    /// The id was not in the favourites list; nothing was written
    NothingToRemove,
}

/// Owns the in-memory user data and its file
#[derive(Debug, Clone)]
pub struct UserDataStore {
    path: PathBuf,
    data: UserData,
}

impl UserDataStore {
    /// Loads the document at `path`, falling back to an empty one
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match Self::read(&path) {
            Ok(Some(data)) => data,
            Ok(None) => {
                log::debug!(
                    "User data not found at {}, starting empty",
                    path.display()
                );
                UserData::default()
            }
            Err(e) => {
                log::error!("Failed to load user data, starting empty: {}", e);
                UserData::default()
            }
        };
        Self { path, data }
    }

    fn read(path: &Path) -> ConfigResult<Option<UserData>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = persistence::read_to_string(path)?;
        let root: Map<String, Value> = serde_json::from_str(&contents)?;
        Ok(Some(UserData::from_object(root)))
    }

    /// Path of the user data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole in-memory document
    pub fn data(&self) -> &UserData {
        &self.data
    }

    pub fn watch_history(&self) -> &IndexMap<String, WatchRecord> {
        &self.data.watch_history
    }

    /// Recorded position for `anime_id`, if any
    pub fn progress(&self, anime_id: AnimeId) -> Option<&WatchRecord> {
        self.data.watch_history.get(&anime_id.to_string())
    }

    pub fn favorites(&self) -> &[AnimeId] {
        &self.data.animelist
    }

    pub fn user(&self) -> &UserProfile {
        &self.data.user
    }

    /// Whether a profile is stored
    pub fn is_logged_in(&self) -> bool {
        !self.data.user.is_empty()
    }

    /// Records where `anime_id` was left off and persists
    ///
    /// `start_time` and `total_time` default to `"0"`.
    pub fn record_progress(
        &mut self,
        anime_id: AnimeId,
        episode: Option<&str>,
        start_time: Option<&str>,
        total_time: Option<&str>,
    ) -> ConfigResult<()> {
        let record = WatchRecord {
            episode: episode.map(str::to_string),
            start_time: start_time.map_or_else(zero, str::to_string),
            total_time: total_time.map_or_else(zero, str::to_string),
        };
        self.data
            .watch_history
            .insert(anime_id.to_string(), record);
        self.persist()
    }

    /// Replaces the stored profile and persists
    pub fn set_user(&mut self, profile: UserProfile) -> ConfigResult<()> {
        self.data.user = profile;
        self.persist()
    }

    /// Clears the stored profile and persists
    pub fn logout(&mut self) -> ConfigResult<()> {
        self.set_user(UserProfile::new())
    }

    /// Adds `anime_id` to favourites, or removes it when `remove` is set
    ///
    /// Kept for older front-ends that still manage a local favourites list.
    pub fn toggle_favorite(
        &mut self,
        anime_id: AnimeId,
        remove: bool,
    ) -> ConfigResult<FavoriteOutcome> {
        let favorites = &mut self.data.animelist;

        if remove {
            if !favorites.contains(&anime_id) {
                log::info!("{} is not a favourite, nothing to remove", anime_id);
                return Ok(FavoriteOutcome::NothingToRemove);
            }
            favorites.retain(|id| *id != anime_id);
            self.persist()?;
            return Ok(FavoriteOutcome::Removed);
        }

        favorites.push(anime_id);
        let mut seen = std::collections::HashSet::new();
        favorites.retain(|id| seen.insert(*id));
        self.persist()?;
        Ok(FavoriteOutcome::Added)
    }

    /// Writes the whole document to disk
    pub fn persist(&self) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        persistence::write_atomic(&self.path, &json)
    }
}
