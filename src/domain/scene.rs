// Scene view model - what a session's page currently shows
use super::analysis::CrossDomainInsights;
use super::figure::{Figure, PlotConfig, Trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContainerContent {
    Empty,
    Loading { message: String },
    Plot { figure: Figure, config: PlotConfig },
    Placeholder { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    Progress { message: String },
    Results {
        insights: CrossDomainInsights,
        lines: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
    pub expires_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub text: String,
    pub expires_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerView {
    pub content: ContainerContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Overlay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub popups: Vec<Popup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator: Option<Indicator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_point: Option<usize>,
}

impl ContainerView {
    pub fn empty() -> Self {
        Self {
            content: ContainerContent::Empty,
            overlay: None,
            popups: Vec::new(),
            indicator: None,
            highlighted_point: None,
        }
    }

    #[cfg(test)]
    pub fn figure(&self) -> Option<&Figure> {
        match &self.content {
            ContainerContent::Plot { figure, .. } => Some(figure),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn placeholder_message(&self) -> Option<&str> {
        match &self.content {
            ContainerContent::Placeholder { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub containers: BTreeMap<String, ContainerView>,
    pub text: BTreeMap<String, String>,
}

/// Incremental scene changes pushed to connected clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SceneEvent {
    Plotted { container_id: String, figure: Figure },
    Animated {
        container_id: String,
        data: Vec<Trace>,
        transition_ms: u64,
    },
    Purged { container_id: String },
    Cleared { container_id: String },
    ContentChanged {
        container_id: String,
        content: ContainerContent,
    },
    OverlayChanged {
        container_id: String,
        overlay: Option<Overlay>,
    },
    PopupShown { container_id: String, popup: Popup },
    IndicatorShown {
        container_id: String,
        indicator: Indicator,
    },
    Highlighted {
        container_id: String,
        point_number: usize,
    },
    /// Expired popups and indicators were removed from the container.
    TransientsExpired { container_id: String },
    TextChanged { element_id: String, text: String },
}
