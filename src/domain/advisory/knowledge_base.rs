//! Static, read-only crop knowledge base

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AdvisoryEntry, AdvisoryLookup};
use crate::domain::DomainError;

/// Serialized form of the knowledge base data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseDocument {
    /// Supported languages; the first one is the default
    pub languages: Vec<String>,

    /// UI labels per language
    #[serde(default)]
    pub translations: BTreeMap<String, BTreeMap<String, String>>,

    /// Advisory entries keyed by crop name
    pub crops: BTreeMap<String, AdvisoryEntry>,
}

/// Validated knowledge base, shared immutably for the process lifetime
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    languages: Vec<String>,
    translations: BTreeMap<String, BTreeMap<String, String>>,
    crops: BTreeMap<String, AdvisoryEntry>,
}

impl KnowledgeBase {
    /// Validate a document and index its crops by lower-cased name
    pub fn from_document(document: KnowledgeBaseDocument) -> Result<Self, DomainError> {
        if document.languages.is_empty() {
            return Err(DomainError::configuration(
                "Knowledge base declares no languages",
            ));
        }

        let mut crops = BTreeMap::new();

        for (name, entry) in document.crops {
            let missing = entry.missing_languages(&document.languages);

            if !missing.is_empty() {
                return Err(DomainError::configuration(format!(
                    "Crop '{}' is missing advice for: {}",
                    name,
                    missing.join(", ")
                )));
            }

            let key = name.trim().to_lowercase();

            if crops.insert(key.clone(), entry).is_some() {
                return Err(DomainError::configuration(format!(
                    "Crop '{}' is declared more than once",
                    key
                )));
            }
        }

        Ok(Self {
            languages: document.languages,
            translations: document.translations,
            crops,
        })
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn default_language(&self) -> &str {
        &self.languages[0]
    }

    /// Match a requested language case-insensitively against the supported set
    pub fn resolve_language(&self, requested: &str) -> Result<String, DomainError> {
        self.languages
            .iter()
            .find(|lang| lang.eq_ignore_ascii_case(requested.trim()))
            .cloned()
            .ok_or_else(|| {
                DomainError::invalid_field(
                    "language",
                    format!(
                        "Unsupported language '{}'; expected one of: {}",
                        requested,
                        self.languages.join(", ")
                    ),
                )
            })
    }

    /// UI labels for a language, falling back to the default language per key
    pub fn labels(&self, language: &str) -> BTreeMap<String, String> {
        let mut labels = self
            .translations
            .get(self.default_language())
            .cloned()
            .unwrap_or_default();

        if let Some(localized) = self.translations.get(language) {
            labels.extend(localized.clone());
        }

        labels
    }

    pub fn crop_names(&self) -> impl Iterator<Item = &str> {
        self.crops.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// Case-insensitive lookup of a predicted label
    pub fn lookup(&self, label: &str, language: &str) -> AdvisoryLookup {
        self.crops
            .get(&label.trim().to_lowercase())
            .and_then(|entry| entry.localize(language))
            .map(AdvisoryLookup::Found)
            .unwrap_or(AdvisoryLookup::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn rice_entry() -> AdvisoryEntry {
        AdvisoryEntry {
            image: "assets/Rice.jpg".to_string(),
            facts: texts(&[("English", "Rice fact"), ("Hindi", "चावल तथ्य")]),
            tips: texts(&[("English", "Rice tip"), ("Hindi", "चावल सुझाव")]),
            suggestions: texts(&[("English", "Rice suggestion"), ("Hindi", "चावल उपज")]),
        }
    }

    fn document() -> KnowledgeBaseDocument {
        let mut crops = BTreeMap::new();
        crops.insert("Rice".to_string(), rice_entry());

        let mut translations = BTreeMap::new();
        translations.insert(
            "English".to_string(),
            texts(&[("title", "Enter Soil and Climate Parameters"), ("tips", "Tips to Grow")]),
        );
        translations.insert("Hindi".to_string(), texts(&[("tips", "उगाने के टिप्स")]));

        KnowledgeBaseDocument {
            languages: vec!["English".to_string(), "Hindi".to_string()],
            translations,
            crops,
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let kb = KnowledgeBase::from_document(document()).unwrap();

        match kb.lookup("Rice", "English") {
            AdvisoryLookup::Found(advice) => {
                assert_eq!(advice.fact, "Rice fact");
                assert_eq!(advice.image, "assets/Rice.jpg");
            }
            AdvisoryLookup::Unavailable => panic!("rice should be found"),
        }

        assert!(!kb.lookup("RICE", "Hindi").is_unavailable());
    }

    #[test]
    fn test_unknown_crop_is_unavailable() {
        let kb = KnowledgeBase::from_document(document()).unwrap();
        assert_eq!(kb.lookup("Quinoa", "English"), AdvisoryLookup::Unavailable);
    }

    #[test]
    fn test_missing_translation_rejected() {
        let mut doc = document();
        doc.languages.push("Tamil".to_string());

        let err = KnowledgeBase::from_document(doc).unwrap_err();
        assert!(err.to_string().contains("Tamil"));
    }

    #[test]
    fn test_empty_languages_rejected() {
        let mut doc = document();
        doc.languages.clear();
        assert!(KnowledgeBase::from_document(doc).is_err());
    }

    #[test]
    fn test_resolve_language() {
        let kb = KnowledgeBase::from_document(document()).unwrap();
        assert_eq!(kb.resolve_language("hindi").unwrap(), "Hindi");
        assert!(kb.resolve_language("Klingon").is_err());
        assert_eq!(kb.default_language(), "English");
    }

    #[test]
    fn test_labels_fall_back_to_default_language() {
        let kb = KnowledgeBase::from_document(document()).unwrap();
        let labels = kb.labels("Hindi");

        assert_eq!(labels["tips"], "उगाने के टिप्स");
        assert_eq!(labels["title"], "Enter Soil and Climate Parameters");
    }
}
