//! Application state for shared services

use std::sync::Arc;

use crate::domain::{KnowledgeBase, ModelRegistry};
use crate::infrastructure::services::{PredictionService, SessionService};

/// Shared, cheaply cloned handles; the registry and knowledge base are immutable
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub knowledge_base: Arc<KnowledgeBase>,
    pub prediction_service: Arc<PredictionService>,
    pub session_service: Arc<SessionService>,
}
