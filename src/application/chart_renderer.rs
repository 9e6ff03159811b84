// Chart renderer - draws figures into a surface and keeps them "live"
use crate::application::chart_surface::{ChartError, ChartResult, ChartSurface};
use crate::application::clock::Clock;
use crate::application::figure_enhancer::enhance_figure;
use crate::application::realtime::perturb_traces;
use crate::domain::analysis::CrossDomainInsights;
use crate::domain::chart_instance::{
    ChartEvent, ChartInstance, ChartPoint, ChartState, InteractionOutcome, RefreshPolicy,
};
use crate::domain::figure::{Figure, PlotConfig};
use crate::domain::scene::{Overlay, Popup};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

const POPUP_TTL_MS: i64 = 5_000;
const INDICATOR_TTL_MS: i64 = 2_000;
const UPDATE_TRANSITION_MS: u64 = 500;
const MAX_RECORDED_RENDER_TIMES: usize = 50;

pub const LIBRARY_UNAVAILABLE_MESSAGE: &str = "Chart library not loaded";
pub const RENDER_FAILED_MESSAGE: &str = "Chart rendering failed";
pub const INVALID_DATA_MESSAGE: &str = "Invalid chart data";
pub const CROSS_DOMAIN_PROGRESS_MESSAGE: &str = "Analyzing cultural bridges and affinities...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderResult {
    Rendered { container_id: String, generation: u64 },
    MissingContainer { container_id: String },
    Degraded { container_id: String, reason: String },
    Stale { container_id: String },
}

/// Claim on a container issued before asynchronous work; only the most recent
/// ticket for a container may draw into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    container_id: String,
    generation: u64,
}

impl RenderTicket {
    pub fn container_id(&self) -> &str {
        &self.container_id
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderMetrics {
    pub render_count: u64,
    pub update_count: u64,
    pub error_count: u64,
    pub recent_render_times_ms: VecDeque<f64>,
}

impl RenderMetrics {
    fn record_render(&mut self, elapsed: Duration) {
        self.render_count += 1;
        if self.recent_render_times_ms.len() == MAX_RECORDED_RENDER_TIMES {
            self.recent_render_times_ms.pop_front();
        }
        self.recent_render_times_ms
            .push_back(elapsed.as_secs_f64() * 1_000.0);
    }
}

pub struct ChartRenderer<S> {
    surface: S,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    plot_config: PlotConfig,
    default_interval: Duration,
    charts: HashMap<String, ChartInstance>,
    realtime: HashMap<String, RefreshPolicy>,
    generations: HashMap<String, u64>,
    next_generation: u64,
    destroyed: HashSet<String>,
    metrics: RenderMetrics,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(surface: S, clock: Arc<dyn Clock>, default_interval: Duration) -> Self {
        Self::with_rng(surface, clock, default_interval, StdRng::from_entropy())
    }

    pub fn with_rng(
        surface: S,
        clock: Arc<dyn Clock>,
        default_interval: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            surface,
            clock,
            rng,
            plot_config: PlotConfig::default(),
            default_interval,
            charts: HashMap::new(),
            realtime: HashMap::new(),
            generations: HashMap::new(),
            next_generation: 0,
            destroyed: HashSet::new(),
            metrics: RenderMetrics::default(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn metrics(&self) -> &RenderMetrics {
        &self.metrics
    }

    pub fn chart(&self, container_id: &str) -> Option<&ChartInstance> {
        self.charts.get(container_id)
    }

    pub fn refresh_policy(&self, container_id: &str) -> Option<&RefreshPolicy> {
        self.realtime.get(container_id)
    }

    pub fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.charts.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn chart_state(&self, container_id: &str) -> ChartState {
        if self.charts.contains_key(container_id) {
            ChartState::Rendered
        } else if self.destroyed.contains(container_id) {
            ChartState::Destroyed
        } else {
            ChartState::Unrendered
        }
    }

    fn bump_generation(&mut self, container_id: &str) -> u64 {
        self.next_generation += 1;
        self.generations
            .insert(container_id.to_string(), self.next_generation);
        self.next_generation
    }

    /// Reserve the container before fetching data for it. Any older ticket for
    /// the same container becomes stale.
    pub fn begin_render(&mut self, container_id: &str) -> RenderTicket {
        let generation = self.bump_generation(container_id);
        RenderTicket {
            container_id: container_id.to_string(),
            generation,
        }
    }

    pub fn is_current(&self, ticket: &RenderTicket) -> bool {
        self.generations.get(&ticket.container_id) == Some(&ticket.generation)
    }

    pub fn render(&mut self, container_id: &str, figure: &Figure) -> RenderResult {
        let ticket = self.begin_render(container_id);
        self.complete_render(&ticket, figure)
    }

    pub fn complete_render(&mut self, ticket: &RenderTicket, figure: &Figure) -> RenderResult {
        let container_id = ticket.container_id.clone();

        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale render for {}", container_id);
            return RenderResult::Stale { container_id };
        }

        if container_id.is_empty() || !self.surface.has_container(&container_id) {
            tracing::warn!("Container element with id '{}' not found", container_id);
            return RenderResult::MissingContainer { container_id };
        }

        if !self.surface.library_available() {
            tracing::error!("Chart library not available, cannot render {}", container_id);
            return self.degrade(&container_id, LIBRARY_UNAVAILABLE_MESSAGE, ChartError::LibraryUnavailable);
        }

        let started = Instant::now();
        self.surface.clear(&container_id);
        let (data, layout) = enhance_figure(figure);
        let enhanced = Figure {
            data,
            layout,
            cultural_intelligence_score: figure.cultural_intelligence_score,
        };

        if let Err(e) = self
            .surface
            .new_plot(&container_id, &enhanced, &self.plot_config)
        {
            return self.degrade(&container_id, RENDER_FAILED_MESSAGE, e);
        }

        let elapsed = started.elapsed();
        self.metrics.record_render(elapsed);
        let now_ms = self.clock.now_ms();

        self.retire(&container_id);
        self.charts.insert(
            container_id.clone(),
            ChartInstance {
                generation: ticket.generation,
                baseline: enhanced.data.clone(),
                data: enhanced.data,
                layout: enhanced.layout,
                last_update_ms: now_ms,
            },
        );
        self.realtime.insert(
            container_id.clone(),
            RefreshPolicy::new(self.default_interval, now_ms),
        );
        self.destroyed.remove(&container_id);

        tracing::info!(
            "Rendered interactive chart in {} ({:.2}ms)",
            container_id,
            elapsed.as_secs_f64() * 1_000.0
        );

        RenderResult::Rendered {
            container_id,
            generation: ticket.generation,
        }
    }

    /// Show the invalid-data placeholder for a payload that failed validation.
    pub fn reject_payload(&mut self, container_id: &str, error: ChartError) -> RenderResult {
        if !self.surface.has_container(container_id) {
            tracing::warn!("Container element with id '{}' not found", container_id);
            return RenderResult::MissingContainer {
                container_id: container_id.to_string(),
            };
        }
        self.bump_generation(container_id);
        self.degrade(container_id, INVALID_DATA_MESSAGE, error)
    }

    fn degrade(&mut self, container_id: &str, message: &str, error: ChartError) -> RenderResult {
        self.metrics.error_count += 1;
        tracing::error!("Error rendering chart in {}: {}", container_id, error);
        self.retire(container_id);
        self.surface.show_placeholder(container_id, message);
        RenderResult::Degraded {
            container_id: container_id.to_string(),
            reason: error.to_string(),
        }
    }

    /// Drop any existing instance and refresh policy for the container.
    fn retire(&mut self, container_id: &str) {
        self.charts.remove(container_id);
        if let Some(policy) = self.realtime.remove(container_id) {
            policy.cancel.cancel();
        }
    }

    pub fn destroy(&mut self, container_id: &str) {
        // Invalidate in-flight tickets so a pending render cannot resurrect the chart.
        if self.generations.contains_key(container_id) {
            self.bump_generation(container_id);
        }
        if self.charts.contains_key(container_id) {
            self.surface.purge(container_id);
            self.retire(container_id);
            self.destroyed.insert(container_id.to_string());
            tracing::debug!("Destroyed chart {}", container_id);
        }
    }

    pub fn destroy_all(&mut self) {
        for container_id in self.registered_ids() {
            self.destroy(&container_id);
        }
    }

    /// Register a periodic refresh for a rendered chart. Returns false when no
    /// chart is registered for the container.
    pub fn start_real_time_updates(&mut self, container_id: &str, interval: Duration) -> bool {
        if !self.charts.contains_key(container_id) {
            return false;
        }
        let now_ms = self.clock.now_ms();
        if let Some(previous) = self
            .realtime
            .insert(container_id.to_string(), RefreshPolicy::new(interval, now_ms))
        {
            previous.cancel.cancel();
        }
        true
    }

    pub fn stop_real_time_updates(&mut self, container_id: &str) -> bool {
        match self.realtime.get_mut(container_id) {
            Some(policy) => {
                policy.enabled = false;
                true
            }
            None => false,
        }
    }

    /// One pass of the shared scheduler. Returns how many charts were refreshed.
    pub fn tick(&mut self) -> usize {
        let now_ms = self.clock.now_ms();
        self.surface.expire_transients(now_ms);

        let mut due: Vec<String> = self
            .realtime
            .iter()
            .filter(|(_, policy)| policy.is_due(now_ms))
            .map(|(id, _)| id.clone())
            .collect();
        due.sort();

        let mut refreshed = 0;
        for container_id in due {
            match self.perform_update(&container_id, now_ms) {
                Ok(()) => refreshed += 1,
                Err(e) => {
                    // Policy stays enabled; the next tick retries.
                    self.metrics.error_count += 1;
                    tracing::error!("Error in real-time update for {}: {}", container_id, e);
                }
            }
        }
        refreshed
    }

    /// Manual refresh, independent of the refresh interval.
    pub fn refresh(&mut self, container_id: &str) -> ChartResult<()> {
        let now_ms = self.clock.now_ms();
        self.perform_update(container_id, now_ms)
    }

    fn perform_update(&mut self, container_id: &str, now_ms: i64) -> ChartResult<()> {
        let instance = self
            .charts
            .get_mut(container_id)
            .ok_or_else(|| ChartError::Update {
                container_id: container_id.to_string(),
                reason: "no chart registered".to_string(),
            })?;

        tracing::debug!("Performing real-time update for {}", container_id);
        let updated = perturb_traces(&instance.baseline, now_ms, &mut self.rng);

        self.surface
            .animate(container_id, &updated, UPDATE_TRANSITION_MS)
            .map_err(|e| ChartError::Update {
                container_id: container_id.to_string(),
                reason: e.to_string(),
            })?;

        instance.data = updated;
        instance.last_update_ms = now_ms;
        if let Some(policy) = self.realtime.get_mut(container_id) {
            policy.last_update_ms = now_ms;
        }
        self.metrics.update_count += 1;
        self.surface
            .show_indicator(container_id, "🔄 Updated", now_ms + INDICATOR_TTL_MS);
        Ok(())
    }

    pub fn handle_event(&mut self, container_id: &str, event: &ChartEvent) -> InteractionOutcome {
        if !self.charts.contains_key(container_id) {
            tracing::debug!("Ignoring interaction on unrendered container {}", container_id);
            return InteractionOutcome::Ignored;
        }

        match event {
            ChartEvent::Click { points } => match points.first() {
                Some(point) => {
                    tracing::info!("Chart interaction in {}: {:?}", container_id, point);
                    self.show_insight_popup(container_id, point);
                    InteractionOutcome::PopupShown
                }
                None => InteractionOutcome::Ignored,
            },
            ChartEvent::Hover { points } => {
                match points.first().and_then(|p| p.point_number) {
                    Some(point_number) => {
                        self.surface.highlight(container_id, point_number);
                        InteractionOutcome::Highlighted { point_number }
                    }
                    None => InteractionOutcome::Ignored,
                }
            }
            ChartEvent::Selected { points } => {
                tracing::info!("Data selection in {}: {} points", container_id, points.len());
                if points.is_empty() {
                    InteractionOutcome::Ignored
                } else {
                    InteractionOutcome::CrossDomainRequested
                }
            }
            ChartEvent::DoubleClick => InteractionOutcome::CrossDomainRequested,
        }
    }

    fn show_insight_popup(&mut self, container_id: &str, point: &ChartPoint) {
        let now_ms = self.clock.now_ms();
        self.surface.show_popup(
            container_id,
            Popup {
                title: "🧠 Cultural Intelligence Insight".to_string(),
                lines: vec![
                    format!("Data Point: {}", point.display_name()),
                    format!("Value: {}", point.display_value()),
                    "Cultural Relevance: High".to_string(),
                    "Cross-Domain Connections: 3 identified".to_string(),
                ],
                expires_at_ms: now_ms + POPUP_TTL_MS,
            },
        );
    }

    /// Put the progress overlay over a container. Returns false if the container is gone.
    pub fn begin_cross_domain(&mut self, container_id: &str) -> bool {
        if !self.surface.has_container(container_id) {
            return false;
        }
        self.surface.set_overlay(
            container_id,
            Some(Overlay::Progress {
                message: CROSS_DOMAIN_PROGRESS_MESSAGE.to_string(),
            }),
        );
        true
    }

    pub fn finish_cross_domain(&mut self, container_id: &str, insights: CrossDomainInsights) {
        if !self.surface.has_container(container_id) {
            tracing::debug!("Container {} removed before cross-domain analysis finished", container_id);
            return;
        }
        let lines = insights.summary_lines();
        self.surface
            .set_overlay(container_id, Some(Overlay::Results { insights, lines }));
    }

    pub fn dismiss_overlay(&mut self, container_id: &str) {
        if self.surface.has_container(container_id) {
            self.surface.set_overlay(container_id, None);
        }
    }

    pub fn show_loading(&mut self, container_id: &str) {
        if self.surface.has_container(container_id) {
            self.surface.show_loading(container_id, "Loading chart...");
        }
    }

    pub fn set_text(&mut self, element_id: &str, text: &str) {
        self.surface.set_text(element_id, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::ManualClock;
    use crate::application::figure_builders::{demographics_chart, regions_chart};
    use crate::domain::figure::{Series, Trace, TraceKind};
    use crate::domain::payload::{DemographicsData, RegionsData};
    use crate::infrastructure::scene_surface::SceneSurface;

    fn renderer_with(containers: &[&str]) -> (ChartRenderer<SceneSurface>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let renderer = ChartRenderer::with_rng(
            SceneSurface::with_containers(containers),
            clock.clone(),
            Duration::from_millis(3_000),
            StdRng::seed_from_u64(7),
        );
        (renderer, clock)
    }

    fn bar_values(renderer: &ChartRenderer<SceneSurface>, id: &str) -> Vec<f64> {
        renderer.chart(id).unwrap().data[0]
            .y
            .as_ref()
            .and_then(|s| s.numbers())
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_render_missing_container_registers_nothing() {
        let (mut renderer, _) = renderer_with(&[]);
        let result = renderer.render("nowhere", &regions_chart(&RegionsData::default()));

        assert_eq!(
            result,
            RenderResult::MissingContainer {
                container_id: "nowhere".to_string()
            }
        );
        assert!(renderer.registered_ids().is_empty());
        assert!(renderer.refresh_policy("nowhere").is_none());
    }

    #[test]
    fn test_render_empty_id_is_missing_container() {
        let (mut renderer, _) = renderer_with(&["regions-chart"]);
        let result = renderer.render("", &regions_chart(&RegionsData::default()));
        assert!(matches!(result, RenderResult::MissingContainer { .. }));
    }

    #[test]
    fn test_render_without_library_shows_placeholder() {
        let (mut renderer, _) = renderer_with(&["regions-chart"]);
        renderer.surface_mut().set_library_loaded(false);

        let result = renderer.render("regions-chart", &regions_chart(&RegionsData::default()));

        assert!(matches!(result, RenderResult::Degraded { .. }));
        assert!(renderer.chart("regions-chart").is_none());
        let view = renderer.surface().container("regions-chart").unwrap();
        assert_eq!(view.placeholder_message(), Some(LIBRARY_UNAVAILABLE_MESSAGE));
        assert_eq!(renderer.metrics().error_count, 1);
    }

    #[test]
    fn test_rejected_figure_shows_placeholder() {
        let (mut renderer, _) = renderer_with(&["empty"]);
        let figure = Figure::new(Vec::new(), Default::default());

        let result = renderer.render("empty", &figure);

        assert!(matches!(result, RenderResult::Degraded { .. }));
        let view = renderer.surface().container("empty").unwrap();
        assert_eq!(view.placeholder_message(), Some(RENDER_FAILED_MESSAGE));
    }

    #[test]
    fn test_render_registers_instance_and_policy() {
        let (mut renderer, _) = renderer_with(&["demographics-chart"]);
        let result = renderer.render(
            "demographics-chart",
            &demographics_chart(&DemographicsData::default()),
        );

        assert!(matches!(result, RenderResult::Rendered { .. }));
        assert_eq!(renderer.chart_state("demographics-chart"), ChartState::Rendered);
        assert_eq!(
            renderer.refresh_policy("demographics-chart").unwrap().interval,
            Duration::from_millis(3_000)
        );
        assert!(renderer
            .surface()
            .container("demographics-chart")
            .unwrap()
            .figure()
            .is_some());
        assert_eq!(renderer.metrics().render_count, 1);
    }

    #[test]
    fn test_rerender_supersedes_previous_policy() {
        let (mut renderer, _) = renderer_with(&["regions-chart"]);
        let figure = regions_chart(&RegionsData::default());
        renderer.render("regions-chart", &figure);
        let old_token = renderer.refresh_policy("regions-chart").unwrap().cancel.clone();

        renderer.render("regions-chart", &figure);

        assert!(old_token.is_cancelled());
        assert!(!renderer
            .refresh_policy("regions-chart")
            .unwrap()
            .cancel
            .is_cancelled());
        assert_eq!(renderer.registered_ids(), vec!["regions-chart".to_string()]);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let (mut renderer, _) = renderer_with(&["regions-chart"]);
        let figure = regions_chart(&RegionsData::default());

        let first = renderer.begin_render("regions-chart");
        let second = renderer.begin_render("regions-chart");

        assert!(matches!(renderer.complete_render(&second, &figure), RenderResult::Rendered { .. }));
        assert_eq!(
            renderer.complete_render(&first, &figure),
            RenderResult::Stale {
                container_id: "regions-chart".to_string()
            }
        );
        assert_eq!(renderer.chart("regions-chart").unwrap().generation, second.generation);
    }

    #[test]
    fn test_destroy_unknown_is_noop() {
        let (mut renderer, _) = renderer_with(&[]);
        renderer.destroy("never-rendered");
        assert_eq!(renderer.chart_state("never-rendered"), ChartState::Unrendered);
    }

    #[test]
    fn test_destroy_removes_refresh_policy() {
        let (mut renderer, _) = renderer_with(&["regions-chart"]);
        renderer.render("regions-chart", &regions_chart(&RegionsData::default()));
        let token = renderer.refresh_policy("regions-chart").unwrap().cancel.clone();

        renderer.destroy("regions-chart");

        assert!(token.is_cancelled());
        assert!(renderer.refresh_policy("regions-chart").is_none());
        assert_eq!(renderer.chart_state("regions-chart"), ChartState::Destroyed);
        assert!(renderer.surface().container("regions-chart").unwrap().figure().is_none());
    }

    #[test]
    fn test_destroy_invalidates_pending_ticket() {
        let (mut renderer, _) = renderer_with(&["regions-chart"]);
        let figure = regions_chart(&RegionsData::default());
        renderer.render("regions-chart", &figure);

        let pending = renderer.begin_render("regions-chart");
        renderer.destroy("regions-chart");

        assert!(matches!(renderer.complete_render(&pending, &figure), RenderResult::Stale { .. }));
    }

    #[test]
    fn test_destroy_all_twice() {
        let (mut renderer, _) = renderer_with(&["a", "b"]);
        let figure = regions_chart(&RegionsData::default());
        renderer.render("a", &figure);
        renderer.render("b", &figure);

        renderer.destroy_all();
        renderer.destroy_all();

        assert!(renderer.registered_ids().is_empty());
    }

    #[test]
    fn test_real_time_ticks_stay_bounded_and_advance() {
        let (mut renderer, clock) = renderer_with(&["regions-chart"]);
        renderer.render("regions-chart", &regions_chart(&RegionsData::default()));
        assert!(renderer.start_real_time_updates("regions-chart", Duration::from_millis(1_000)));
        let original = bar_values(&renderer, "regions-chart");

        let mut last_update = renderer.chart("regions-chart").unwrap().last_update_ms;
        for now in [0, 1_000, 2_000] {
            clock.set(now);
            renderer.tick();

            let values = bar_values(&renderer, "regions-chart");
            for (o, v) in original.iter().zip(&values) {
                assert!((v - o).abs() <= 0.1 * o + 1e-9, "{} drifted to {}", o, v);
            }
            let current = renderer.chart("regions-chart").unwrap().last_update_ms;
            assert!(current >= last_update);
            last_update = current;
        }

        assert_eq!(last_update, 2_000);
        assert_eq!(renderer.metrics().update_count, 2);
    }

    #[test]
    fn test_tick_failure_keeps_policy_enabled() {
        let (mut renderer, clock) = renderer_with(&["regions-chart"]);
        renderer.render("regions-chart", &regions_chart(&RegionsData::default()));
        renderer.surface_mut().unmount("regions-chart");

        clock.set(10_000);
        assert_eq!(renderer.tick(), 0);

        let policy = renderer.refresh_policy("regions-chart").unwrap();
        assert!(policy.enabled);
        assert_eq!(policy.last_update_ms, 0);
        assert_eq!(renderer.metrics().error_count, 1);
    }

    #[test]
    fn test_stopped_policy_is_skipped() {
        let (mut renderer, clock) = renderer_with(&["regions-chart"]);
        renderer.render("regions-chart", &regions_chart(&RegionsData::default()));
        assert!(renderer.stop_real_time_updates("regions-chart"));

        clock.set(60_000);
        assert_eq!(renderer.tick(), 0);
    }

    #[test]
    fn test_huge_interval_never_refreshes() {
        let (mut renderer, clock) = renderer_with(&["regions-chart"]);
        renderer.render("regions-chart", &regions_chart(&RegionsData::default()));
        assert!(renderer.start_real_time_updates("regions-chart", Duration::from_millis(u64::MAX)));

        let mut refreshed = 0;
        for now in [1, 2, 3, 86_400_000] {
            clock.set(now);
            refreshed += renderer.tick();
        }
        assert_eq!(refreshed, 0);
        assert_eq!(renderer.metrics().update_count, 0);
    }

    #[test]
    fn test_start_real_time_updates_requires_chart() {
        let (mut renderer, _) = renderer_with(&["regions-chart"]);
        assert!(!renderer.start_real_time_updates("regions-chart", Duration::from_millis(500)));
    }

    #[test]
    fn test_manual_refresh_shows_indicator() {
        let (mut renderer, clock) = renderer_with(&["timeline"]);
        let figure = Figure::new(
            vec![Trace {
                mode: Some("lines".to_string()),
                y: Some(Series::Numbers(vec![10.0, 20.0])),
                ..Trace::new(TraceKind::Scatter)
            }],
            Default::default(),
        );
        renderer.render("timeline", &figure);

        clock.set(500);
        renderer.refresh("timeline").unwrap();

        let view = renderer.surface().container("timeline").unwrap();
        assert_eq!(view.indicator.as_ref().unwrap().expires_at_ms, 2_500);
        assert_eq!(renderer.chart("timeline").unwrap().last_update_ms, 500);

        clock.set(3_000);
        renderer.tick();
        assert!(renderer.surface().container("timeline").unwrap().indicator.is_none());
    }

    #[test]
    fn test_click_shows_popup_that_expires() {
        let (mut renderer, clock) = renderer_with(&["regions-chart"]);
        renderer.render("regions-chart", &regions_chart(&RegionsData::default()));

        let outcome = renderer.handle_event(
            "regions-chart",
            &ChartEvent::Click {
                points: vec![ChartPoint {
                    x: Some("Europe".to_string()),
                    y: Some(24.0),
                    ..Default::default()
                }],
            },
        );

        assert_eq!(outcome, InteractionOutcome::PopupShown);
        let popup = &renderer.surface().container("regions-chart").unwrap().popups[0];
        assert_eq!(popup.lines[0], "Data Point: Europe");
        assert_eq!(popup.lines[1], "Value: 24");

        clock.set(5_000);
        renderer.tick();
        assert!(renderer.surface().container("regions-chart").unwrap().popups.is_empty());
    }

    #[test]
    fn test_selection_and_double_click_request_cross_domain() {
        let (mut renderer, _) = renderer_with(&["regions-chart"]);
        renderer.render("regions-chart", &regions_chart(&RegionsData::default()));

        let selected = ChartEvent::Selected {
            points: vec![ChartPoint::default()],
        };
        assert_eq!(
            renderer.handle_event("regions-chart", &selected),
            InteractionOutcome::CrossDomainRequested
        );
        assert_eq!(
            renderer.handle_event("regions-chart", &ChartEvent::DoubleClick),
            InteractionOutcome::CrossDomainRequested
        );
        assert_eq!(
            renderer.handle_event("other", &ChartEvent::DoubleClick),
            InteractionOutcome::Ignored
        );
    }

    #[test]
    fn test_hover_highlights_point() {
        let (mut renderer, _) = renderer_with(&["regions-chart"]);
        renderer.render("regions-chart", &regions_chart(&RegionsData::default()));

        let outcome = renderer.handle_event(
            "regions-chart",
            &ChartEvent::Hover {
                points: vec![ChartPoint {
                    point_number: Some(2),
                    ..Default::default()
                }],
            },
        );

        assert_eq!(outcome, InteractionOutcome::Highlighted { point_number: 2 });
        assert_eq!(
            renderer.surface().container("regions-chart").unwrap().highlighted_point,
            Some(2)
        );
    }
}
