// Chart figure domain models (Plotly-compatible JSON shape)
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Pie,
    Bar,
    Scatter,
    Scatterpolar,
    Choropleth,
    Heatmap,
}

/// Values along one axis of a trace: either numbers or category labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Series {
    Numbers(Vec<f64>),
    Categories(Vec<String>),
}

impl Series {
    pub fn numbers(&self) -> Option<&[f64]> {
        match self {
            Series::Numbers(values) => Some(values),
            Series::Categories(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZValues {
    Flat(Vec<f64>),
    Grid(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Series>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Series>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<ZValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    /// Cosmetic attributes (marker, line, fill, text...) passed through untouched.
    #[serde(flatten)]
    pub style: Map<String, Value>,
}

impl Trace {
    pub fn new(kind: TraceKind) -> Self {
        Self {
            kind,
            name: None,
            mode: None,
            x: None,
            y: None,
            z: None,
            labels: None,
            values: None,
            r: None,
            theta: None,
            locations: None,
            hovertemplate: None,
            style: Map::new(),
        }
    }

    /// Set a style attribute. Non-object values are expected to be JSON objects.
    pub fn with_style(mut self, style: Value) -> Self {
        if let Value::Object(entries) = style {
            self.style.extend(entries);
        }
        self
    }

    /// Shallow-merge `patch` into the object stored under `key`.
    pub fn merge_style(&mut self, key: &str, patch: Value) {
        let Value::Object(patch) = patch else {
            return;
        };
        match self.style.get_mut(key) {
            Some(Value::Object(existing)) => existing.extend(patch),
            _ => {
                self.style.insert(key.to_string(), Value::Object(patch));
            }
        }
    }

    pub fn is_markers_scatter(&self) -> bool {
        self.kind == TraceKind::Scatter
            && self.mode.as_deref().is_some_and(|m| m.contains("markers"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yref: Option<String>,
    #[serde(default)]
    pub showarrow: bool,
    #[serde(flatten)]
    pub style: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl Layout {
    /// Layout shared by every chart: fonts, transparent backgrounds, legend and transitions.
    pub fn base() -> Self {
        let mut layout = Self::default();
        layout.extend(serde_json::json!({
            "font": { "family": "Inter, sans-serif", "size": 14, "color": "#1e293b" },
            "paper_bgcolor": "rgba(255,255,255,0)",
            "plot_bgcolor": "rgba(255,255,255,0)",
            "margin": { "t": 60, "b": 80, "l": 80, "r": 60 },
            "showlegend": true,
            "legend": {
                "orientation": "h",
                "x": 0.5,
                "xanchor": "center",
                "y": -0.15,
                "font": { "size": 12 },
                "bgcolor": "rgba(255,255,255,0.8)",
                "bordercolor": "#e2e8f0",
                "borderwidth": 1
            },
            "hovermode": "closest",
            "dragmode": "zoom",
            "transition": { "duration": 800, "easing": "cubic-in-out" }
        }));
        layout
    }

    /// Spread `overrides` over the current settings, replacing top-level keys.
    pub fn extend(&mut self, overrides: Value) {
        if let Value::Object(entries) = overrides {
            self.settings.extend(entries);
        }
    }

    pub fn with(mut self, overrides: Value) -> Self {
        self.extend(overrides);
        self
    }

    pub fn merge(mut self, other: Layout) -> Self {
        self.settings.extend(other.settings);
        if !other.annotations.is_empty() {
            self.annotations = other.annotations;
        }
        self
    }

    #[cfg(test)]
    pub fn title_text(&self) -> Option<&str> {
        self.settings.get("title")?.get("text")?.as_str()
    }
}

/// A full declarative chart: traces plus layout, optionally tagged with a
/// cultural-intelligence score that is surfaced as an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_intelligence_score: Option<f64>,
}

impl Figure {
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self {
            data,
            layout,
            cultural_intelligence_score: None,
        }
    }
}

/// Options handed to the charting library alongside every figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub responsive: bool,
    pub display_mode_bar: bool,
    pub displaylogo: bool,
    pub mode_bar_buttons_to_add: Vec<String>,
    pub mode_bar_buttons_to_remove: Vec<String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            responsive: true,
            display_mode_bar: true,
            displaylogo: false,
            mode_bar_buttons_to_add: vec![
                "cross-domain-analysis".to_string(),
                "real-time-update".to_string(),
            ],
            mode_bar_buttons_to_remove: vec!["pan2d".to_string(), "lasso2d".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_serializes_type_and_flattened_style() {
        let trace = Trace::new(TraceKind::Bar).with_style(json!({ "marker": { "opacity": 0.8 } }));
        let value = serde_json::to_value(&trace).unwrap();

        assert_eq!(value["type"], "bar");
        assert_eq!(value["marker"]["opacity"], 0.8);
        assert!(value.get("labels").is_none());
    }

    #[test]
    fn test_figure_parses_plotly_json() {
        let raw = json!({
            "data": [{ "type": "scatter", "mode": "lines", "x": ["a", "b"], "y": [1.0, 2.0], "line": { "width": 3 } }],
            "layout": { "title": { "text": "Trends" } }
        });
        let figure: Figure = serde_json::from_value(raw).unwrap();

        assert_eq!(figure.data[0].kind, TraceKind::Scatter);
        assert_eq!(figure.data[0].y, Some(Series::Numbers(vec![1.0, 2.0])));
        assert_eq!(figure.data[0].x, Some(Series::Categories(vec!["a".into(), "b".into()])));
        assert_eq!(figure.data[0].style["line"]["width"], 3);
        assert_eq!(figure.layout.title_text(), Some("Trends"));
    }

    #[test]
    fn test_merge_style_extends_existing_object() {
        let mut trace = Trace::new(TraceKind::Scatter).with_style(json!({ "marker": { "size": 12 } }));
        trace.merge_style("marker", json!({ "opacity": 0.8 }));

        assert_eq!(trace.style["marker"]["size"], 12);
        assert_eq!(trace.style["marker"]["opacity"], 0.8);
    }

    #[test]
    fn test_layout_with_overrides_top_level_keys() {
        let layout = Layout::base().with(json!({ "showlegend": false }));
        assert_eq!(layout.settings["showlegend"], false);
        assert_eq!(layout.settings["hovermode"], "closest");
    }
}
