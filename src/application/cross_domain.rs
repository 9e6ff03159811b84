// Cross-domain analysis triggered from a chart interaction
use crate::application::backend::TasteShiftBackend;
use crate::application::session::SharedSession;
use crate::domain::analysis::{CrossDomainInsights, CrossDomainRequest};

/// Run a cross-domain analysis for the chart in `container_id` and show the
/// result as an overlay. Backend failures fall back to the canned insight set;
/// this never fails.
pub async fn trigger_cross_domain_analysis(
    session: &SharedSession,
    backend: &dyn TasteShiftBackend,
    container_id: &str,
) -> Option<CrossDomainInsights> {
    if !session.lock().await.renderer.begin_cross_domain(container_id) {
        tracing::warn!("Container element with id '{}' not found", container_id);
        return None;
    }

    tracing::info!("Triggering cross-domain analysis for {}", container_id);
    let insights = match backend.cross_domain_insights(&CrossDomainRequest::default()).await {
        Ok(insights) => insights,
        Err(e) => {
            tracing::error!("Cross-domain analysis error: {}", e);
            CrossDomainInsights::fallback()
        }
    };

    session
        .lock()
        .await
        .renderer
        .finish_cross_domain(container_id, insights.clone());
    Some(insights)
}
