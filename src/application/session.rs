// Per-visitor session context: chart renderer, current persona and preloaded chart defaults
use crate::application::chart_renderer::ChartRenderer;
use crate::application::clock::Clock;
use crate::application::figure_builders::DASHBOARD_CONTAINERS;
use crate::domain::analysis::Persona;
use crate::infrastructure::scene_surface::SceneSurface;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<Session>>;

/// Chart defaults cached per session so first paint does not wait on the backend.
#[derive(Debug, Clone, Default)]
pub struct PreloadCache {
    entries: HashMap<String, Value>,
}

impl PreloadCache {
    pub fn with_chart_defaults() -> Self {
        let mut cache = Self::default();
        cache.insert(
            "demographics",
            json!({ "labels": ["Gen Z", "Millennials", "Gen X", "Boomers"], "values": [35, 28, 22, 15] }),
        );
        cache.insert(
            "regions",
            json!({ "labels": ["North America", "Europe", "Asia", "Other"], "values": [40, 30, 25, 5] }),
        );
        cache.insert(
            "trends",
            json!({ "dates": ["Jan", "Feb", "Mar", "Apr", "May", "Jun"], "music": [45, 52, 48, 61, 58, 67] }),
        );
        cache
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn to_json(&self) -> Value {
        json!(self.entries)
    }
}

pub struct Session {
    pub id: Uuid,
    pub renderer: ChartRenderer<SceneSurface>,
    pub current_persona: Option<Persona>,
    pub preload: PreloadCache,
}

impl Session {
    /// A session whose page has the insights dashboard containers mounted.
    pub fn new(clock: Arc<dyn Clock>, default_interval: Duration) -> Self {
        let surface = SceneSurface::with_containers(&DASHBOARD_CONTAINERS);
        Self {
            id: Uuid::new_v4(),
            renderer: ChartRenderer::new(surface, clock, default_interval),
            current_persona: None,
            preload: PreloadCache::with_chart_defaults(),
        }
    }
}

struct SessionEntry {
    session: SharedSession,
    last_seen_ms: AtomicI64,
}

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    clock: Arc<dyn Clock>,
    default_interval: Duration,
    idle_ttl: Option<Duration>,
}

impl SessionRegistry {
    pub fn new(clock: Arc<dyn Clock>, default_interval: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            clock,
            default_interval,
            idle_ttl: None,
        }
    }

    /// Evict sessions nobody has looked up for `ttl`.
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = Some(ttl);
        self
    }

    pub async fn create(&self) -> (Uuid, SharedSession) {
        let session = Session::new(self.clock.clone(), self.default_interval);
        let id = session.id;
        let shared = Arc::new(Mutex::new(session));
        let entry = SessionEntry {
            session: shared.clone(),
            last_seen_ms: AtomicI64::new(self.clock.now_ms()),
        };
        self.sessions.write().await.insert(id, entry);
        tracing::info!("Created session {}", id);
        (id, shared)
    }

    /// Look up a session and mark it as seen.
    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(id)?;
        entry.last_seen_ms.store(self.clock.now_ms(), Ordering::Relaxed);
        Some(entry.session.clone())
    }

    /// Remove the session and tear down its charts.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(entry) => {
                entry.session.lock().await.renderer.destroy_all();
                tracing::info!("Closed session {}", id);
                true
            }
            None => false,
        }
    }

    /// Remove every session idle for at least the configured TTL and tear
    /// down its charts. Returns the number of sessions evicted.
    pub async fn evict_idle(&self) -> usize {
        let Some(ttl) = self.idle_ttl else {
            return 0;
        };
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let now = self.clock.now_ms();

        let evicted: Vec<(Uuid, SessionEntry)> = {
            let mut sessions = self.sessions.write().await;
            let idle: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, entry)| {
                    now.saturating_sub(entry.last_seen_ms.load(Ordering::Relaxed)) >= ttl_ms
                })
                .map(|(id, _)| *id)
                .collect();
            idle.into_iter()
                .filter_map(|id| sessions.remove(&id).map(|entry| (id, entry)))
                .collect()
        };

        for (id, entry) in &evicted {
            entry.session.lock().await.renderer.destroy_all();
            tracing::info!("Evicted idle session {}", id);
        }
        evicted.len()
    }

    pub async fn all(&self) -> Vec<SharedSession> {
        self.sessions
            .read()
            .await
            .values()
            .map(|entry| entry.session.clone())
            .collect()
    }
}
