//! Advisory entries and their localized texts

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Advisory bundle for one crop, keyed by lower-cased crop label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryEntry {
    /// Image reference shown next to the advice
    pub image: String,

    /// Interesting fact, per language
    pub facts: BTreeMap<String, String>,

    /// Growing tip, per language
    pub tips: BTreeMap<String, String>,

    /// Suggestion to improve yield, per language
    pub suggestions: BTreeMap<String, String>,
}

impl AdvisoryEntry {
    /// Resolve the fact/tip/suggestion triple for one language
    pub fn localize(&self, language: &str) -> Option<LocalizedAdvice> {
        Some(LocalizedAdvice {
            image: self.image.clone(),
            fact: self.facts.get(language)?.clone(),
            tip: self.tips.get(language)?.clone(),
            suggestion: self.suggestions.get(language)?.clone(),
        })
    }

    /// Languages for which at least one of the three texts is missing
    pub fn missing_languages<'a>(&self, languages: &'a [String]) -> Vec<&'a str> {
        languages
            .iter()
            .filter(|lang| {
                !(self.facts.contains_key(*lang)
                    && self.tips.contains_key(*lang)
                    && self.suggestions.contains_key(*lang))
            })
            .map(String::as_str)
            .collect()
    }
}

/// Advice rendered for the active language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedAdvice {
    pub image: String,
    pub fact: String,
    pub tip: String,
    pub suggestion: String,
}

/// Outcome of looking a predicted label up in the knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryLookup {
    Found(LocalizedAdvice),
    Unavailable,
}

impl AdvisoryLookup {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}
