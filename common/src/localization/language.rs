use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the app authors content in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "es_ES")]
    Spanish,
    #[serde(rename = "en_US")]
    English,
    #[serde(rename = "ca_ES")]
    Catalan,
    #[serde(rename = "fr_FR")]
    French,
}

impl Language {
    /// Same order as [`crate::constants::LANGUAGE_PRIORITY`].
    pub const PRIORITY: [Language; 4] = [
        Language::Spanish,
        Language::English,
        Language::Catalan,
        Language::French,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Language::Spanish => "es_ES",
            Language::English => "en_US",
            Language::Catalan => "ca_ES",
            Language::French => "fr_FR",
        }
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        self.tag()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Language {
    type Err = AppError;

    /// Accepts full tags (`es_ES`, `en-US`) and bare language codes (`es`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        let code = normalized
            .split('_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match code.as_str() {
            "es" => Ok(Language::Spanish),
            "en" => Ok(Language::English),
            "ca" => Ok(Language::Catalan),
            "fr" => Ok(Language::French),
            _ => Err(AppError::UnsupportedLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LANGUAGE_PRIORITY;

    #[test]
    fn test_priority_matches_tag_constants() {
        let tags: Vec<&str> = Language::PRIORITY.iter().map(Language::tag).collect();
        assert_eq!(tags, LANGUAGE_PRIORITY);
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("es_ES".parse::<Language>(), Ok(Language::Spanish));
        assert_eq!("en-US".parse::<Language>(), Ok(Language::English));
        assert_eq!("ca".parse::<Language>(), Ok(Language::Catalan));
        assert_eq!("FR_fr".parse::<Language>(), Ok(Language::French));
        assert_eq!(
            "de_DE".parse::<Language>(),
            Err(AppError::UnsupportedLanguage("de_DE".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_tags() {
        assert_eq!(serde_json::to_string(&Language::Catalan).unwrap(), "\"ca_ES\"");
        let language: Language = serde_json::from_str("\"fr_FR\"").unwrap();
        assert_eq!(language, Language::French);
    }
}
