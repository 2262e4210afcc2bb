//! In-memory session store. One `PipelineContext` per session, shared across handlers.
//!
//! Sessions idle for longer than the configured TTL are evicted by a background sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::pipeline::context::PipelineContext;

struct Entry {
    ctx: PipelineContext,
    /// Monotonic; any read or write through the store refreshes it.
    last_seen: Instant,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> PipelineContext {
        let ctx = PipelineContext::new();
        let mut sessions = self.inner.write().await;
        sessions.insert(
            ctx.id,
            Entry {
                ctx: ctx.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!("Session {} created ({} active)", ctx.id, sessions.len());
        ctx
    }

    pub async fn get(&self, id: Uuid) -> Option<PipelineContext> {
        let mut sessions = self.inner.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.ctx.clone())
    }

    /// Applies `f` to the session and returns the updated snapshot.
    ///
    /// Stage results are computed before calling this, so the lock is never held across
    /// an oracle call. Concurrent runs of the same step resolve last-write-wins.
    pub async fn update<F>(&self, id: Uuid, f: F) -> Option<PipelineContext>
    where
        F: FnOnce(&mut PipelineContext),
    {
        let mut sessions = self.inner.write().await;
        let entry = sessions.get_mut(&id)?;
        f(&mut entry.ctx);
        entry.last_seen = Instant::now();
        Some(entry.ctx.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Drops every session not seen for at least `idle_ttl`. Returns how many were dropped.
    pub async fn evict_idle(&self, idle_ttl: Duration) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < idle_ttl);
        before - sessions.len()
    }

    /// Spawns the periodic eviction sweep.
    pub fn spawn_sweeper(&self, idle_ttl: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(idle_ttl).await;
                if evicted > 0 {
                    info!("Evicted {evicted} idle sessions");
                }
            }
        })
    }
}
