// Insights dashboard loader
use crate::application::backend::TasteShiftBackend;
use crate::application::chart_renderer::{ChartRenderer, RenderResult, RenderTicket};
use crate::application::chart_surface::{ChartError, ChartSurface};
use crate::application::figure_builders::{
    ChartPayload, CORRELATION_MATRIX, DASHBOARD_CONTAINERS, DEMOGRAPHICS_CHART,
    GEOGRAPHIC_HEATMAP, PREDICTIVE_ANALYTICS, REGIONS_CHART, TASTE_PATTERNS_CHART,
    TIMELINE_CHART, TREND_TIMELINE,
};
use crate::application::session::SharedSession;
use crate::domain::figure::Figure;
use crate::domain::payload::{DashboardStats, InsightsData};
use serde::Serialize;

const PENDING_STATS: [&str; 3] = ["trend-score", "diversity-index", "market-coverage"];

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub used_fallback: bool,
    pub results: Vec<RenderResult>,
    pub invalid_sections: Vec<String>,
}

/// Fetch the insights document and draw the whole dashboard into the session.
///
/// The session lock is released while the backend call is in flight; renders
/// issued by anything else in the meantime win over this load.
pub async fn load_insights_dashboard(
    session: &SharedSession,
    backend: &dyn TasteShiftBackend,
) -> DashboardReport {
    let tickets: Vec<RenderTicket> = {
        let mut session = session.lock().await;
        let renderer = &mut session.renderer;
        for element_id in PENDING_STATS {
            renderer.set_text(element_id, "...");
        }
        DASHBOARD_CONTAINERS
            .iter()
            .map(|container_id| {
                renderer.show_loading(container_id);
                renderer.begin_render(container_id)
            })
            .collect()
    };

    let (data, used_fallback) = match backend.insights_data().await {
        Ok(data) => (data, false),
        Err(e) => {
            tracing::warn!("Using fallback insights data: {}", e);
            (InsightsData::fallback(), true)
        }
    };

    let mut session = session.lock().await;
    let renderer = &mut session.renderer;
    let mut report = DashboardReport {
        used_fallback,
        results: Vec::with_capacity(tickets.len()),
        invalid_sections: Vec::new(),
    };

    for ticket in &tickets {
        let built = match ticket.container_id() {
            DEMOGRAPHICS_CHART => section(&data.demographics),
            REGIONS_CHART => section(&data.regions),
            TIMELINE_CHART => section(&data.timeline),
            TASTE_PATTERNS_CHART => section(&data.taste_patterns),
            GEOGRAPHIC_HEATMAP => section(&data.geographic),
            TREND_TIMELINE => section(&data.trends),
            CORRELATION_MATRIX => section(&data.correlation),
            PREDICTIVE_ANALYTICS => section(&data.predictions),
            other => Err(ChartError::MissingContainer(other.to_string())),
        };
        if built.is_err() {
            report
                .invalid_sections
                .push(ticket.container_id().to_string());
        }
        let result = draw(renderer, ticket, built);
        report.results.push(result);
    }

    let stats = data.stats.unwrap_or_default();
    write_stats(renderer, &stats);

    tracing::info!(
        "Insights dashboard loaded ({} charts, fallback: {})",
        report.results.len(),
        report.used_fallback
    );
    report
}

/// Build a section, falling back to its defaults when the backend omitted it.
fn section<T: ChartPayload + Default>(data: &Option<T>) -> Result<Figure, ChartError> {
    match data {
        Some(data) => Ok(data.to_figure()?),
        None => Ok(T::default().to_figure()?),
    }
}

fn draw<S: ChartSurface>(
    renderer: &mut ChartRenderer<S>,
    ticket: &RenderTicket,
    built: Result<Figure, ChartError>,
) -> RenderResult {
    match built {
        Ok(figure) => renderer.complete_render(ticket, &figure),
        Err(_) if !renderer.is_current(ticket) => RenderResult::Stale {
            container_id: ticket.container_id().to_string(),
        },
        Err(e) => renderer.reject_payload(ticket.container_id(), e),
    }
}

fn write_stats<S: ChartSurface>(renderer: &mut ChartRenderer<S>, stats: &DashboardStats) {
    for (element_id, text) in stats.cards() {
        renderer.set_text(element_id, &text);
    }
}
