//! Session store and session-scoped operations

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{DomainError, KnowledgeBase, Session, SessionId};
use crate::infrastructure::weather::WeatherResolver;

/// Bounds of the in-memory session store
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    pub max_capacity: u64,
    /// Sessions not touched for this long are evicted
    pub time_to_idle: Duration,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            time_to_idle: Duration::from_secs(3600),
        }
    }
}

type SessionHandle = Arc<RwLock<Session>>;

/// Creates sessions and applies language and weather changes to them
#[derive(Debug, Clone)]
pub struct SessionService {
    sessions: MokaCache<SessionId, SessionHandle>,
    resolver: Arc<WeatherResolver>,
    knowledge_base: Arc<KnowledgeBase>,
}

impl SessionService {
    pub fn new(
        resolver: Arc<WeatherResolver>,
        knowledge_base: Arc<KnowledgeBase>,
        config: SessionStoreConfig,
    ) -> Self {
        let sessions = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_idle(config.time_to_idle)
            .build();

        Self {
            sessions,
            resolver,
            knowledge_base,
        }
    }

    /// Resolve the caller's weather and start a session
    pub async fn create(
        &self,
        client_ip: Option<IpAddr>,
        language: Option<&str>,
    ) -> Result<Session, DomainError> {
        let language = match language {
            Some(requested) => self.knowledge_base.resolve_language(requested)?,
            None => self.knowledge_base.default_language().to_string(),
        };

        let weather = self.resolver.resolve(client_ip).await;
        let session = Session::new(language, weather);

        self.sessions
            .insert(session.id(), Arc::new(RwLock::new(session.clone())))
            .await;

        info!(
            session_id = %session.id(),
            language = %session.language(),
            weather_source = ?session.weather().source,
            "Session created"
        );

        Ok(session)
    }

    async fn handle(&self, id: SessionId) -> Result<SessionHandle, DomainError> {
        self.sessions
            .get(&id)
            .await
            .ok_or_else(|| DomainError::not_found(format!("Session '{}' not found", id)))
    }

    pub async fn get(&self, id: SessionId) -> Result<Session, DomainError> {
        let handle = self.handle(id).await?;
        let session = handle.read().await;
        Ok(session.clone())
    }

    pub async fn set_language(&self, id: SessionId, language: &str) -> Result<Session, DomainError> {
        let language = self.knowledge_base.resolve_language(language)?;
        let handle = self.handle(id).await?;

        let mut session = handle.write().await;
        session.set_language(language);
        Ok(session.clone())
    }

    /// Manual weather override for a user-supplied city
    ///
    /// The write lock is held across the fetch so refreshes of one session apply
    /// one at a time and the snapshot is replaced as a whole.
    pub async fn refresh_weather(&self, id: SessionId, city: &str) -> Result<Session, DomainError> {
        let handle = self.handle(id).await?;

        let mut session = handle.write().await;
        let snapshot = self.resolver.refresh(session.weather(), city).await;
        session.replace_weather(snapshot);

        Ok(session.clone())
    }

    pub fn session_count(&self) -> u64 {
        self.sessions.entry_count()
    }
}
