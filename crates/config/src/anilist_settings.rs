//! `[anilist]` configuration section

use crate::coercion::SectionReader;
use crate::ini::IniDocument;
use crate::settings::SettingsSection;
use crate::ConfigResult;

/// AniList browsing preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnilistSettings {
    /// Ordering applied to AniList search results
    pub sort_by: String,
}

impl Default for AnilistSettings {
    fn default() -> Self {
        Self {
            sort_by: "search match".to_string(),
        }
    }
}

impl SettingsSection for AnilistSettings {
    const NAME: &'static str = "anilist";

    fn entries(&self) -> Vec<(&'static str, String)> {
        vec![("sort_by", self.sort_by.clone())]
    }

    fn from_document(doc: &IniDocument) -> ConfigResult<Self> {
        let r = SectionReader::new(doc, Self::NAME);
        Ok(Self {
            sort_by: r.string("sort_by", &Self::default().sort_by),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_keeps_inner_spaces() {
        let doc = IniDocument::parse("[anilist]\nsort_by =  popularity desc  \n")
            .expect("Should parse");
        let settings = AnilistSettings::from_document(&doc).expect("Should load");
        assert_eq!(settings.sort_by, "popularity desc");
    }
}
