//! Advisory domain - localized crop facts, tips and suggestions

mod entity;
mod knowledge_base;

pub use entity::{AdvisoryEntry, AdvisoryLookup, LocalizedAdvice};
pub use knowledge_base::{KnowledgeBase, KnowledgeBaseDocument};
