// Shared real-time scheduler - one timer drives every session's refresh policies
use crate::application::session::SessionRegistry;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Run one pass over every live session after evicting idle ones. Returns the
/// number of charts updated.
pub async fn tick_all(sessions: &SessionRegistry) -> usize {
    let evicted = sessions.evict_idle().await;
    if evicted > 0 {
        tracing::info!("Evicted {} idle sessions", evicted);
    }

    let mut refreshed = 0;
    for session in sessions.all().await {
        refreshed += session.lock().await.renderer.tick();
    }
    refreshed
}

/// Spawn the scheduler loop. It stops when `shutdown` is cancelled.
pub fn spawn_scheduler(
    sessions: SessionRegistry,
    tick_interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!("Real-time scheduler started ({:?} tick)", tick_interval);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let refreshed = tick_all(&sessions).await;
                    if refreshed > 0 {
                        tracing::debug!("Scheduler refreshed {} charts", refreshed);
                    }
                }
            }
        }

        tracing::info!("Real-time scheduler stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::{Clock, ManualClock};
    use crate::application::figure_builders::{regions_chart, REGIONS_CHART};
    use crate::domain::payload::RegionsData;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_tick_all_refreshes_due_charts_only() {
        let clock = Arc::new(ManualClock::new(0));
        let sessions = SessionRegistry::new(clock.clone() as Arc<dyn Clock>, Duration::from_millis(1_000));
        let (_, live) = sessions.create().await;
        let (_, idle) = sessions.create().await;

        live.lock()
            .await
            .renderer
            .render(REGIONS_CHART, &regions_chart(&RegionsData::default()));

        assert_eq!(tick_all(&sessions).await, 0);
        clock.set(1_000);
        assert_eq!(tick_all(&sessions).await, 1);
        assert!(idle.lock().await.renderer.registered_ids().is_empty());
    }

    #[tokio::test]
    async fn test_tick_all_evicts_idle_sessions() {
        let clock = Arc::new(ManualClock::new(0));
        let sessions = SessionRegistry::new(clock.clone() as Arc<dyn Clock>, Duration::from_millis(1_000))
            .with_idle_ttl(Duration::from_millis(60_000));
        let (id, session) = sessions.create().await;
        session
            .lock()
            .await
            .renderer
            .render(REGIONS_CHART, &regions_chart(&RegionsData::default()));

        clock.set(59_999);
        assert_eq!(tick_all(&sessions).await, 1);
        clock.set(60_000);

        assert_eq!(tick_all(&sessions).await, 0);
        assert!(sessions.all().await.is_empty());
        assert!(sessions.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_scheduler_stops_on_cancel() {
        let sessions = SessionRegistry::new(
            Arc::new(ManualClock::new(0)),
            Duration::from_millis(1_000),
        );
        let shutdown = CancellationToken::new();
        let handle = spawn_scheduler(sessions, Duration::from_millis(10), shutdown.clone());

        shutdown.cancel();
        assert!(handle.await.is_ok());
    }
}
