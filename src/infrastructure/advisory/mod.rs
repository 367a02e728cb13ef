//! Knowledge base file loading

use std::path::Path;

use tracing::info;

use crate::domain::advisory::KnowledgeBaseDocument;
use crate::domain::{DomainError, KnowledgeBase};

/// Parse and validate a knowledge base from JSON text
pub fn parse_knowledge_base(json: &str) -> Result<KnowledgeBase, DomainError> {
    let document: KnowledgeBaseDocument = serde_json::from_str(json).map_err(|e| {
        DomainError::configuration(format!("Invalid knowledge base document: {}", e))
    })?;

    KnowledgeBase::from_document(document)
}

/// Read the knowledge base data file at `path`
pub fn load_knowledge_base(path: impl AsRef<Path>) -> Result<KnowledgeBase, DomainError> {
    let path = path.as_ref();

    let json = std::fs::read_to_string(path).map_err(|e| {
        DomainError::configuration(format!(
            "Cannot read knowledge base '{}': {}",
            path.display(),
            e
        ))
    })?;

    let knowledge_base = parse_knowledge_base(&json)?;

    info!(
        path = %path.display(),
        crops = knowledge_base.len(),
        languages = knowledge_base.languages().len(),
        "Knowledge base loaded"
    );

    Ok(knowledge_base)
}
