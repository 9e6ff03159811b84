// In-memory page model implementing the chart surface
use crate::application::chart_surface::{ChartError, ChartResult, ChartSurface};
use crate::domain::figure::{Figure, PlotConfig, Trace};
use crate::domain::scene::{
    ContainerContent, ContainerView, Indicator, Overlay, Popup, SceneEvent, SceneSnapshot,
};
use std::collections::BTreeMap;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 256;

/// A session's page: mounted chart containers, stat text elements and the
/// figures the charting library currently shows. Every mutation is also
/// published as a [`SceneEvent`] for streaming clients.
pub struct SceneSurface {
    containers: BTreeMap<String, ContainerView>,
    text: BTreeMap<String, String>,
    library_loaded: bool,
    events: broadcast::Sender<SceneEvent>,
}

impl Default for SceneSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneSurface {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            containers: BTreeMap::new(),
            text: BTreeMap::new(),
            library_loaded: true,
            events,
        }
    }

    pub fn with_containers(ids: &[&str]) -> Self {
        let mut surface = Self::new();
        for id in ids {
            surface.mount(id);
        }
        surface
    }

    pub fn mount(&mut self, container_id: &str) {
        self.containers
            .entry(container_id.to_string())
            .or_insert_with(ContainerView::empty);
    }

    pub fn unmount(&mut self, container_id: &str) -> bool {
        self.containers.remove(container_id).is_some()
    }

    #[cfg(test)]
    pub fn set_library_loaded(&mut self, loaded: bool) {
        self.library_loaded = loaded;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SceneEvent> {
        self.events.subscribe()
    }

    #[cfg(test)]
    pub fn container(&self, container_id: &str) -> Option<&ContainerView> {
        self.containers.get(container_id)
    }

    #[cfg(test)]
    pub fn text(&self, element_id: &str) -> Option<&str> {
        self.text.get(element_id).map(String::as_str)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            containers: self.containers.clone(),
            text: self.text.clone(),
        }
    }

    fn publish(&self, event: SceneEvent) {
        // No subscribers is the common case.
        let _ = self.events.send(event);
    }

    fn set_content(&mut self, container_id: &str, content: ContainerContent) {
        if let Some(view) = self.containers.get_mut(container_id) {
            view.content = content.clone();
            view.highlighted_point = None;
            self.publish(SceneEvent::ContentChanged {
                container_id: container_id.to_string(),
                content,
            });
        }
    }
}

impl ChartSurface for SceneSurface {
    fn has_container(&self, container_id: &str) -> bool {
        self.containers.contains_key(container_id)
    }

    fn library_available(&self) -> bool {
        self.library_loaded
    }

    fn clear(&mut self, container_id: &str) {
        if let Some(view) = self.containers.get_mut(container_id) {
            *view = ContainerView::empty();
            self.publish(SceneEvent::Cleared {
                container_id: container_id.to_string(),
            });
        }
    }

    fn new_plot(&mut self, container_id: &str, figure: &Figure, config: &PlotConfig) -> ChartResult<()> {
        if figure.data.is_empty() {
            return Err(ChartError::Library("figure has no traces".to_string()));
        }
        let view = self
            .containers
            .get_mut(container_id)
            .ok_or_else(|| ChartError::MissingContainer(container_id.to_string()))?;
        view.content = ContainerContent::Plot {
            figure: figure.clone(),
            config: config.clone(),
        };
        self.publish(SceneEvent::Plotted {
            container_id: container_id.to_string(),
            figure: figure.clone(),
        });
        Ok(())
    }

    fn animate(&mut self, container_id: &str, data: &[Trace], transition_ms: u64) -> ChartResult<()> {
        let view = self
            .containers
            .get_mut(container_id)
            .ok_or_else(|| ChartError::MissingContainer(container_id.to_string()))?;
        match &mut view.content {
            ContainerContent::Plot { figure, .. } => {
                if figure.data.len() != data.len() {
                    return Err(ChartError::Library(format!(
                        "expected {} traces, got {}",
                        figure.data.len(),
                        data.len()
                    )));
                }
                figure.data = data.to_vec();
            }
            _ => {
                return Err(ChartError::Library(format!(
                    "no plot in container '{}'",
                    container_id
                )));
            }
        }
        self.publish(SceneEvent::Animated {
            container_id: container_id.to_string(),
            data: data.to_vec(),
            transition_ms,
        });
        Ok(())
    }

    fn purge(&mut self, container_id: &str) {
        if let Some(view) = self.containers.get_mut(container_id) {
            *view = ContainerView::empty();
            self.publish(SceneEvent::Purged {
                container_id: container_id.to_string(),
            });
        }
    }

    fn show_loading(&mut self, container_id: &str, message: &str) {
        self.set_content(
            container_id,
            ContainerContent::Loading {
                message: message.to_string(),
            },
        );
    }

    fn show_placeholder(&mut self, container_id: &str, message: &str) {
        self.set_content(
            container_id,
            ContainerContent::Placeholder {
                message: message.to_string(),
            },
        );
    }

    fn set_overlay(&mut self, container_id: &str, overlay: Option<Overlay>) {
        if let Some(view) = self.containers.get_mut(container_id) {
            view.overlay = overlay.clone();
            self.publish(SceneEvent::OverlayChanged {
                container_id: container_id.to_string(),
                overlay,
            });
        }
    }

    fn show_popup(&mut self, container_id: &str, popup: Popup) {
        if let Some(view) = self.containers.get_mut(container_id) {
            view.popups.push(popup.clone());
            self.publish(SceneEvent::PopupShown {
                container_id: container_id.to_string(),
                popup,
            });
        }
    }

    fn show_indicator(&mut self, container_id: &str, text: &str, expires_at_ms: i64) {
        if let Some(view) = self.containers.get_mut(container_id) {
            let indicator = Indicator {
                text: text.to_string(),
                expires_at_ms,
            };
            view.indicator = Some(indicator.clone());
            self.publish(SceneEvent::IndicatorShown {
                container_id: container_id.to_string(),
                indicator,
            });
        }
    }

    fn highlight(&mut self, container_id: &str, point_number: usize) {
        if let Some(view) = self.containers.get_mut(container_id) {
            view.highlighted_point = Some(point_number);
            self.publish(SceneEvent::Highlighted {
                container_id: container_id.to_string(),
                point_number,
            });
        }
    }

    fn set_text(&mut self, element_id: &str, text: &str) {
        self.text.insert(element_id.to_string(), text.to_string());
        self.publish(SceneEvent::TextChanged {
            element_id: element_id.to_string(),
            text: text.to_string(),
        });
    }

    fn expire_transients(&mut self, now_ms: i64) {
        let mut expired = Vec::new();
        for (container_id, view) in self.containers.iter_mut() {
            let popups = view.popups.len();
            view.popups.retain(|p| p.expires_at_ms > now_ms);
            let mut changed = view.popups.len() != popups;
            if view
                .indicator
                .as_ref()
                .is_some_and(|i| i.expires_at_ms <= now_ms)
            {
                view.indicator = None;
                changed = true;
            }
            if changed {
                expired.push(container_id.clone());
            }
        }
        for container_id in expired {
            self.publish(SceneEvent::TransientsExpired { container_id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::figure::{Layout, TraceKind};

    fn pie() -> Figure {
        Figure::new(vec![Trace::new(TraceKind::Pie)], Layout::default())
    }

    #[test]
    fn test_new_plot_requires_mounted_container() {
        let mut surface = SceneSurface::new();
        let result = surface.new_plot("missing", &pie(), &PlotConfig::default());
        assert_eq!(result, Err(ChartError::MissingContainer("missing".to_string())));
    }

    #[test]
    fn test_animate_requires_matching_trace_count() {
        let mut surface = SceneSurface::with_containers(&["chart"]);
        surface.new_plot("chart", &pie(), &PlotConfig::default()).unwrap();

        assert!(surface.animate("chart", &[], 500).is_err());
        assert!(surface.animate("chart", &[Trace::new(TraceKind::Pie)], 500).is_ok());
    }

    #[test]
    fn test_events_are_published_to_subscribers() {
        let mut surface = SceneSurface::with_containers(&["chart"]);
        let mut rx = surface.subscribe();

        surface.show_placeholder("chart", "No data");
        surface.set_text("trend-score", "87");

        assert_eq!(
            rx.try_recv().unwrap(),
            SceneEvent::ContentChanged {
                container_id: "chart".to_string(),
                content: ContainerContent::Placeholder {
                    message: "No data".to_string()
                },
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SceneEvent::TextChanged {
                element_id: "trend-score".to_string(),
                text: "87".to_string(),
            }
        );
    }

    #[test]
    fn test_transient_changes_are_published() {
        let mut surface = SceneSurface::with_containers(&["chart", "other"]);
        surface.new_plot("chart", &pie(), &PlotConfig::default()).unwrap();
        let mut rx = surface.subscribe();

        surface.show_indicator("chart", "Updated", 2_000);
        surface.highlight("chart", 3);
        surface.expire_transients(1_999);
        surface.expire_transients(2_000);
        surface.clear("chart");

        assert_eq!(
            rx.try_recv().unwrap(),
            SceneEvent::IndicatorShown {
                container_id: "chart".to_string(),
                indicator: Indicator {
                    text: "Updated".to_string(),
                    expires_at_ms: 2_000,
                },
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SceneEvent::Highlighted {
                container_id: "chart".to_string(),
                point_number: 3,
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SceneEvent::TransientsExpired {
                container_id: "chart".to_string()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SceneEvent::Cleared {
                container_id: "chart".to_string()
            }
        );
        assert!(rx.try_recv().is_err());
        assert!(surface.container("chart").unwrap().indicator.is_none());
    }

    #[test]
    fn test_snapshot_contains_text_and_containers() {
        let mut surface = SceneSurface::with_containers(&["a"]);
        surface.set_text("market-coverage", "78");
        let snapshot = surface.snapshot();

        assert!(snapshot.containers.contains_key("a"));
        assert_eq!(snapshot.text["market-coverage"], "78");
    }
}
