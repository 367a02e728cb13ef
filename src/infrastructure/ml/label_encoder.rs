use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Maps crop labels to dense class ids in sorted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit(labels: &[String]) -> Result<Self, DomainError> {
        let mut classes = labels.to_vec();
        classes.sort();
        classes.dedup();

        if classes.is_empty() {
            return Err(DomainError::data_load("No labels to encode"));
        }

        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn encode(&self, label: &str) -> Result<u32, DomainError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map(|i| i as u32)
            .map_err(|_| DomainError::model(format!("Label '{}' not in training vocabulary", label)))
    }

    pub fn encode_all(&self, labels: &[String]) -> Result<Vec<u32>, DomainError> {
        labels.iter().map(|l| self.encode(l)).collect()
    }

    pub fn decode(&self, id: u32) -> Result<&str, DomainError> {
        self.classes
            .get(id as usize)
            .map(String::as_str)
            .ok_or_else(|| DomainError::model(format!("Class id {} out of range", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_dense_ids() {
        let encoder = LabelEncoder::fit(&labels(&["rice", "maize", "rice", "apple"])).unwrap();
        assert_eq!(encoder.classes(), &["apple", "maize", "rice"]);
        assert_eq!(encoder.encode("maize").unwrap(), 1);
        assert_eq!(encoder.decode(2).unwrap(), "rice");
    }

    #[test]
    fn test_unknown_values() {
        let encoder = LabelEncoder::fit(&labels(&["rice"])).unwrap();
        assert!(encoder.encode("quinoa").is_err());
        assert!(encoder.decode(5).is_err());
    }

    #[test]
    fn test_empty_labels() {
        assert!(LabelEncoder::fit(&[]).is_err());
    }
}
