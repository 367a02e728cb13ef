use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LanguagesResponse {
    pub default: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelsResponse {
    pub language: String,
    pub labels: BTreeMap<String, String>,
}
