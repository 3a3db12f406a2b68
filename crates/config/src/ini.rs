//! INI document model
//!
//! The config file uses the classic "config parser" layout: a `[DEFAULT]`
//! table that every other section falls back to, followed by named sections
//! of `key = value` entries. This module holds the in-memory model, parses
//! text into it and writes it back out.
//!
//! Syntax accepted by [`IniDocument::parse`]:
//!
//! - `[name]` starts a section; `[DEFAULT]` addresses the fallback table
//! - `key = value` or `key : value`, split on the first delimiter
//! - keys are case-insensitive and stored lower-case, section names are not
//! - full-line comments start with `#` or `;`
//! - an indented line right after an entry continues that entry's value;
//!   empty lines between continuation lines are kept in the value

use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Name of the fallback section
pub const DEFAULT_SECTION: &str = "DEFAULT";

type Entries = IndexMap<String, String>;

/// Syntax error with the 1-based line it was found on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Rejected [`IniDocument::set`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    #[error("no section named [{0}]")]
    UnknownSection(String),

    #[error("'{0}' cannot be used as a key")]
    InvalidKey(String),
}

/// Whether `key` would parse back as itself once written
fn is_writable_key(key: &str) -> bool {
    !key.is_empty()
        && key.trim() == key
        && !key.contains(|c: char| matches!(c, '=' | ':' | '\n' | '\r'))
        && !key.starts_with(|c: char| matches!(c, '[' | '#' | ';'))
}

impl SyntaxError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Sectioned key/value document with a `[DEFAULT]` fallback table
///
/// Sections and entries keep insertion order so a rewritten file looks like
/// the one that was read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    defaults: Entries,
    sections: IndexMap<String, Entries>,
}

impl IniDocument {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a section. Returns false if it already existed.
    pub fn add_section(&mut self, name: &str) -> bool {
        if name == DEFAULT_SECTION || self.sections.contains_key(name) {
            return false;
        }
        self.sections.insert(name.to_string(), Entries::new());
        true
    }

    /// Whether `name` can be written to (declared sections and `DEFAULT`)
    pub fn has_section(&self, name: &str) -> bool {
        name == DEFAULT_SECTION || self.sections.contains_key(name)
    }

    /// Names of the declared sections, excluding `DEFAULT`
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Entries explicitly set in `section`, without `DEFAULT` fallback
    pub fn entries(&self, section: &str) -> impl Iterator<Item = (&str, &str)> {
        let table = if section == DEFAULT_SECTION {
            Some(&self.defaults)
        } else {
            self.sections.get(section)
        };
        table
            .into_iter()
            .flat_map(|t| t.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Looks up `key` in `section`, falling back to `DEFAULT`
    ///
    /// An undeclared section resolves through `DEFAULT` as well.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.sections
            .get(section)
            .and_then(|entries| entries.get(&key))
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
    }

    /// Sets `key` in an existing section
    ///
    /// Fails when the section is not declared or when the key contains a
    /// delimiter, a line break, surrounding whitespace or a leading `[`, `#`
    /// or `;`.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), SetError> {
        if !is_writable_key(key) {
            return Err(SetError::InvalidKey(key.to_string()));
        }
        let table = if section == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections
                .get_mut(section)
                .ok_or_else(|| SetError::UnknownSection(section.to_string()))?
        };
        table.insert(key.to_lowercase(), value.to_string());
        Ok(())
    }

    /// Sets a `DEFAULT` entry
    pub fn set_default(&mut self, key: &str, value: &str) {
        self.defaults.insert(key.to_lowercase(), value.to_string());
    }

    /// Overlays `other` on top of this document
    ///
    /// Sections from `other` are added when missing and their entries win
    /// over existing ones, as do its `DEFAULT` entries.
    pub fn overlay(&mut self, other: IniDocument) {
        self.defaults.extend(other.defaults);
        for (name, entries) in other.sections {
            self.sections.entry(name).or_default().extend(entries);
        }
    }

    /// Parses INI text into a new document
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        let mut doc = IniDocument::new();
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;
        let mut blank_lines = 0;
        let mut seen_sections = HashSet::new();
        let mut seen_keys = HashSet::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() {
                if last_key.is_some() {
                    blank_lines += 1;
                }
                continue;
            }
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let indented = raw.starts_with(char::is_whitespace);
            if indented {
                if let (Some(section), Some(key)) = (&current, &last_key) {
                    doc.table_mut(section)
                        .entry(key.clone())
                        .and_modify(|value| {
                            value.push_str(&"\n".repeat(blank_lines + 1));
                            value.push_str(line);
                        });
                    blank_lines = 0;
                    continue;
                }
            }

            // Blank lines not followed by a continuation end the value
            blank_lines = 0;

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| SyntaxError::new(line_no, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(SyntaxError::new(line_no, "empty section name"));
                }
                if !seen_sections.insert(name.to_string()) {
                    return Err(SyntaxError::new(
                        line_no,
                        format!("section [{}] appears more than once", name),
                    ));
                }
                doc.add_section(name);
                current = Some(name.to_string());
                last_key = None;
                continue;
            }

            let section = current
                .as_ref()
                .ok_or_else(|| SyntaxError::new(line_no, "entry outside of any section"))?;
            let split = line
                .find(|c: char| c == '=' || c == ':')
                .ok_or_else(|| SyntaxError::new(line_no, "expected 'key = value'"))?;
            let key = line[..split].trim().to_lowercase();
            let value = line[split + 1..].trim();
            if key.is_empty() {
                return Err(SyntaxError::new(line_no, "empty key"));
            }
            if !seen_keys.insert((section.clone(), key.clone())) {
                return Err(SyntaxError::new(
                    line_no,
                    format!("key '{}' appears more than once in [{}]", key, section),
                ));
            }

            doc.table_mut(section).insert(key.clone(), value.to_string());
            last_key = Some(key);
        }

        Ok(doc)
    }

    fn table_mut(&mut self, section: &str) -> &mut Entries {
        if section == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(section.to_string()).or_default()
        }
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, name: &str, entries: &Entries) -> fmt::Result {
    writeln!(f, "[{}]", name)?;
    for (key, value) in entries {
        if value.is_empty() {
            writeln!(f, "{} =", key)?;
        } else {
            writeln!(f, "{} = {}", key, value.replace('\n', "\n\t"))?;
        }
    }
    writeln!(f)
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.defaults.is_empty() {
            write_table(f, DEFAULT_SECTION, &self.defaults)?;
        }
        for (name, entries) in &self.sections {
            write_table(f, name, entries)?;
        }
        Ok(())
    }
}
