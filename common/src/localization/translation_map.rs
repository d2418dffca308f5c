//! Per-field multi-language text.
//!
//! Localized columns (restaurant descriptions, address fields, menu and dish
//! names, review comments) are stored as a JSON object keyed by language tag.
//! Reads go through [`resolve`], edits through [`merge`].

use crate::constants::{DEFAULT_FALLBACK_LANGUAGE, LANGUAGE_PRIORITY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationMap(BTreeMap<String, String>);

impl TranslationMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A map holding a single entry, as created when content is first authored.
    pub fn single(language: impl Into<String>, text: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.insert(language, text);
        map
    }

    pub fn insert(&mut self, language: impl Into<String>, text: impl Into<String>) {
        self.0.insert(language.into(), text.into());
    }

    /// Raw lookup, empty strings included.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    fn non_empty(&self, language: &str) -> Option<&str> {
        self.get(language).filter(|text| !text.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn resolve(&self, requested: &str, fallback: &str) -> String {
        resolve(Some(self), requested, fallback)
    }

    pub fn resolve_default(&self, requested: &str) -> String {
        resolve(Some(self), requested, DEFAULT_FALLBACK_LANGUAGE)
    }

    pub fn merged(&self, new_text: &str, editing_language: &str) -> TranslationMap {
        merge(Some(self), new_text, editing_language)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Picks the text to show for `requested`.
///
/// Order: the requested language, then `fallback` (when it differs), then the
/// first non-empty entry in [`LANGUAGE_PRIORITY`]. An absent map or no match
/// yields `""`, which callers treat as "no content".
pub fn resolve(map: Option<&TranslationMap>, requested: &str, fallback: &str) -> String {
    let Some(map) = map else {
        return String::new();
    };

    if let Some(text) = map.non_empty(requested) {
        return text.to_string();
    }

    if fallback != requested {
        if let Some(text) = map.non_empty(fallback) {
            return text.to_string();
        }
    }

    LANGUAGE_PRIORITY
        .iter()
        .find_map(|language| map.non_empty(language))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Returns `existing` with the entry for `editing_language` set to `new_text`.
/// Entries for other languages are kept untouched.
pub fn merge(
    existing: Option<&TranslationMap>,
    new_text: &str,
    editing_language: &str,
) -> TranslationMap {
    let mut merged = existing.cloned().unwrap_or_default();
    merged.insert(editing_language, new_text);
    merged
}
