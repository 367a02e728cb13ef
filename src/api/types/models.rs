//! Model listing types

use serde::{Deserialize, Serialize};

use crate::domain::ModelKind;

/// One selectable model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub name: String,
}

impl ModelInfo {
    pub fn from_kind(kind: ModelKind) -> Self {
        Self {
            id: kind.as_str().to_string(),
            object: "model".to_string(),
            name: kind.display_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

impl ModelsResponse {
    pub fn new(kinds: &[ModelKind]) -> Self {
        Self {
            object: "list".to_string(),
            data: kinds.iter().copied().map(ModelInfo::from_kind).collect(),
        }
    }
}
