//! Coercion of raw setting text into typed values
//!
//! Booleans accept `1`, `yes`, `true`, `on` and `0`, `no`, `false`, `off`,
//! compared case-insensitively after trimming. Integers accept an optionally
//! signed base-10 number. Anything else is rejected; there is no fallback to
//! the default.

use crate::ini::IniDocument;
use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;

const TRUTHY: [&str; 4] = ["1", "yes", "true", "on"];
const FALSY: [&str; 4] = ["0", "no", "false", "off"];

/// Parses a boolean in one of the accepted forms
pub fn parse_bool(raw: &str) -> Option<bool> {
    let value = raw.trim().to_lowercase();
    if TRUTHY.contains(&value.as_str()) {
        Some(true)
    } else if FALSY.contains(&value.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Parses an integer, ignoring surrounding whitespace
pub fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Canonical text for a boolean as written to the config file
pub fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Reads typed values out of one section of a document
///
/// Every getter takes the compiled default used when the key is absent from
/// both the section and `DEFAULT`.
pub struct SectionReader<'a> {
    doc: &'a IniDocument,
    section: &'static str,
}

impl<'a> SectionReader<'a> {
    pub fn new(doc: &'a IniDocument, section: &'static str) -> Self {
        Self { doc, section }
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        self.doc
            .get(self.section, key)
            .unwrap_or(default)
            .to_string()
    }

    pub fn path(&self, key: &str, default: &std::path::Path) -> PathBuf {
        self.doc
            .get(self.section, key)
            .map(PathBuf::from)
            .unwrap_or_else(|| default.to_path_buf())
    }

    pub fn boolean(&self, key: &str, default: bool) -> ConfigResult<bool> {
        match self.doc.get(self.section, key) {
            None => Ok(default),
            Some(raw) => parse_bool(raw).ok_or_else(|| self.invalid(key, raw, "a boolean")),
        }
    }

    pub fn integer(&self, key: &str, default: i64) -> ConfigResult<i64> {
        match self.doc.get(self.section, key) {
            None => Ok(default),
            Some(raw) => parse_int(raw).ok_or_else(|| self.invalid(key, raw, "an integer")),
        }
    }

    fn invalid(&self, key: &str, raw: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidSettingValue {
            section: self.section.to_string(),
            key: key.to_string(),
            value: raw.to_string(),
            expected,
        }
    }
}
