// Figure builders - fixed-shape trace and layout configuration per chart family
use crate::domain::figure::{Annotation, Figure, Layout, Series, Trace, TraceKind, ZValues};
use crate::domain::payload::{
    CorrelationData, DemographicsData, GeographicData, PayloadError, PredictionsData,
    RegionsData, TastePatternsData, TimelineData, TrendsData,
};
use serde_json::{json, Map, Value};

pub const COLOR_PALETTE: [&str; 12] = [
    "#667eea", "#764ba2", "#f093fb", "#f5576c", "#10b981", "#3b82f6", "#8b5cf6", "#f59e0b",
    "#ef4444", "#06b6d4", "#84cc16", "#f97316",
];

pub const DEMOGRAPHICS_CHART: &str = "demographics-chart";
pub const REGIONS_CHART: &str = "regions-chart";
pub const TIMELINE_CHART: &str = "timeline-chart";
pub const TASTE_PATTERNS_CHART: &str = "taste-patterns-chart";
pub const GEOGRAPHIC_HEATMAP: &str = "geographic-heatmap";
pub const TREND_TIMELINE: &str = "trend-timeline";
pub const CORRELATION_MATRIX: &str = "correlation-matrix";
pub const PREDICTIVE_ANALYTICS: &str = "predictive-analytics";

/// Every container the insights dashboard draws into.
pub const DASHBOARD_CONTAINERS: [&str; 8] = [
    DEMOGRAPHICS_CHART,
    REGIONS_CHART,
    TIMELINE_CHART,
    TASTE_PATTERNS_CHART,
    GEOGRAPHIC_HEATMAP,
    TREND_TIMELINE,
    CORRELATION_MATRIX,
    PREDICTIVE_ANALYTICS,
];

fn palette(count: usize) -> Vec<&'static str> {
    COLOR_PALETTE.iter().copied().cycle().take(count).collect()
}

fn title(text: &str, size: u32) -> Value {
    json!({
        "text": format!("<b>{}</b>", text),
        "font": { "size": size, "color": "#1e293b" },
        "x": 0.5,
        "y": 0.95
    })
}

fn axis_title(text: &str) -> Value {
    json!({ "text": format!("<b>{}</b>", text), "font": { "size": 14 } })
}

fn format_total(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{:.0}", total)
    } else {
        format!("{:.1}", total)
    }
}

/// Donut chart of persona demographics with the total in the hole.
pub fn demographics_chart(data: &DemographicsData) -> Figure {
    let slices = data.values.len();
    let trace = Trace {
        values: Some(data.values.clone()),
        labels: Some(data.labels.clone()),
        hovertemplate: Some(
            "<b>%{label}</b><br>Count: %{value}<br>Percentage: %{percent}<br><extra></extra>"
                .to_string(),
        ),
        ..Trace::new(TraceKind::Pie)
    }
    .with_style(json!({
        "hole": 0.5,
        "marker": { "colors": palette(slices), "line": { "color": "#ffffff", "width": 4 } },
        "textinfo": "percent",
        "textposition": "auto",
        "textfont": { "size": 12, "color": "#ffffff" },
        "pull": vec![0.05; slices],
        "rotation": 45
    }));

    let mut font = Map::new();
    font.insert("font".to_string(), json!({ "size": 18, "color": "#667eea", "family": "Inter" }));
    let center = Annotation {
        text: format!(
            "<b>Total</b><br><span style=\"font-size:24px\">{}</span><br><span style=\"font-size:12px\">Personas</span>",
            format_total(data.total)
        ),
        x: 0.5,
        y: 0.5,
        xref: None,
        yref: None,
        showarrow: false,
        style: font,
    };

    let mut layout = Layout::base().with(json!({
        "title": title("Demographics Breakdown", 20),
        "showlegend": true,
        "legend": { "orientation": "v", "x": 1.02, "y": 0.5, "font": { "size": 11 } },
        "margin": { "t": 60, "b": 40, "l": 40, "r": 120 }
    }));
    layout.annotations = vec![center];

    Figure::new(vec![trace], layout)
}

/// Bar chart of personas per world region.
pub fn regions_chart(data: &RegionsData) -> Figure {
    let trace = Trace {
        x: Some(Series::Categories(data.names.clone())),
        y: Some(Series::Numbers(data.values.clone())),
        hovertemplate: Some(
            "<b>%{x}</b><br>Personas: %{y}<br>Percentage: %{text}%<extra></extra>".to_string(),
        ),
        ..Trace::new(TraceKind::Bar)
    }
    .with_style(json!({
        "marker": { "color": COLOR_PALETTE, "line": { "color": "#ffffff", "width": 2 }, "opacity": 0.8 },
        "text": data.values,
        "textposition": "outside",
        "textfont": { "size": 14, "color": "#1e293b" }
    }));

    let layout = Layout::base().with(json!({
        "title": title("Global Regions Distribution", 20),
        "xaxis": { "title": axis_title("Regions"), "tickangle": -45, "tickfont": { "size": 12 } },
        "yaxis": { "title": axis_title("Number of Personas"), "tickfont": { "size": 12 } },
        "bargap": 0.3,
        "plot_bgcolor": "rgba(248, 250, 252, 0.5)"
    }));

    Figure::new(vec![trace], layout)
}

/// Filled spline of persona creation activity over time.
pub fn timeline_chart(data: &TimelineData) -> Figure {
    let trace = Trace {
        mode: Some("lines+markers".to_string()),
        x: Some(Series::Categories(data.dates.clone())),
        y: Some(Series::Numbers(data.values.clone())),
        hovertemplate: Some("<b>%{x}</b><br>Personas Created: %{y}<extra></extra>".to_string()),
        ..Trace::new(TraceKind::Scatter)
    }
    .with_style(json!({
        "line": { "color": "#667eea", "width": 4, "shape": "spline" },
        "marker": { "color": COLOR_PALETTE[0], "size": 10, "line": { "color": "#ffffff", "width": 2 } },
        "fill": "tonexty",
        "fillcolor": "rgba(102, 126, 234, 0.1)"
    }));

    let layout = Layout::base().with(json!({
        "title": title("Cultural Trends Timeline", 20),
        "xaxis": { "title": axis_title("Time Period"), "tickfont": { "size": 12 } },
        "yaxis": { "title": axis_title("Activity Level"), "tickfont": { "size": 12 } },
        "plot_bgcolor": "rgba(248, 250, 252, 0.5)",
        "shapes": [{
            "type": "rect",
            "xref": "paper",
            "yref": "paper",
            "x0": 0, "y0": 0, "x1": 1, "y1": 1,
            "fillcolor": "rgba(102, 126, 234, 0.02)",
            "layer": "below",
            "line": { "width": 0 }
        }]
    }));

    Figure::new(vec![trace], layout)
}

/// Radar chart of taste category scores on a 0-100 scale.
pub fn taste_patterns_chart(data: &TastePatternsData) -> Figure {
    let trace = Trace {
        r: Some(data.values.clone()),
        theta: Some(data.categories.clone()),
        hovertemplate: Some("<b>%{theta}</b><br>Score: %{r}%<extra></extra>".to_string()),
        ..Trace::new(TraceKind::Scatterpolar)
    }
    .with_style(json!({
        "fill": "toself",
        "fillcolor": "rgba(240, 147, 251, 0.3)",
        "line": { "color": "#f093fb", "width": 3 },
        "marker": { "color": "#f093fb", "size": 8, "line": { "color": "#ffffff", "width": 2 } }
    }));

    let layout = Layout::base().with(json!({
        "title": title("Trending Taste Patterns", 18),
        "polar": {
            "radialaxis": { "visible": true, "range": [0, 100], "tickfont": { "size": 10 } },
            "angularaxis": { "tickfont": { "size": 12, "color": "#1e293b" } },
            "bgcolor": "rgba(248, 250, 252, 0.5)"
        },
        "showlegend": false
    }));

    Figure::new(vec![trace], layout)
}

/// World choropleth of persona density by country name.
pub fn geographic_heatmap(data: &GeographicData) -> Figure {
    let trace = Trace {
        locations: Some(data.countries.clone()),
        z: Some(ZValues::Flat(data.values.clone())),
        hovertemplate: Some("<b>%{location}</b><br>Personas: %{z}<extra></extra>".to_string()),
        ..Trace::new(TraceKind::Choropleth)
    }
    .with_style(json!({
        "locationmode": "country names",
        "colorscale": [
            [0, "#e2e8f0"], [0.2, "#cbd5e1"], [0.4, "#94a3b8"],
            [0.6, "#667eea"], [0.8, "#764ba2"], [1, "#f093fb"]
        ],
        "colorbar": { "title": "Persona Density", "titlefont": { "size": 14 }, "tickfont": { "size": 12 } }
    }));

    let layout = Layout::base().with(json!({
        "title": title("Global Distribution Heatmap", 18),
        "geo": {
            "showframe": false,
            "showcoastlines": true,
            "projection": { "type": "natural earth" },
            "bgcolor": "rgba(248, 250, 252, 0.5)"
        }
    }));

    Figure::new(vec![trace], layout)
}

/// Music, fashion and food trend lines over a shared time axis.
pub fn trends_timeline(data: &TrendsData) -> Figure {
    let line = |name: &str, values: &[f64], color: &str| {
        Trace {
            name: Some(name.to_string()),
            mode: Some("lines+markers".to_string()),
            x: Some(Series::Categories(data.dates.clone())),
            y: Some(Series::Numbers(values.to_vec())),
            ..Trace::new(TraceKind::Scatter)
        }
        .with_style(json!({
            "line": { "color": color, "width": 3 },
            "marker": { "size": 8, "color": color }
        }))
    };

    let traces = vec![
        line("Music Trends", &data.music, "#667eea"),
        line("Fashion Trends", &data.fashion, "#f093fb"),
        line("Food Trends", &data.food, "#10b981"),
    ];

    let layout = Layout::base().with(json!({
        "title": title("Cultural Trends Evolution", 18),
        "xaxis": { "title": axis_title("Time Period"), "tickfont": { "size": 12 } },
        "yaxis": { "title": axis_title("Trend Score"), "tickfont": { "size": 12 } },
        "plot_bgcolor": "rgba(248, 250, 252, 0.5)",
        "hovermode": "x unified"
    }));

    Figure::new(traces, layout)
}

/// Heatmap of pairwise taste category correlations.
pub fn correlation_matrix(data: &CorrelationData) -> Figure {
    let trace = Trace {
        x: Some(Series::Categories(data.categories.clone())),
        y: Some(Series::Categories(data.categories.clone())),
        z: Some(ZValues::Grid(data.matrix.clone())),
        hovertemplate: Some(
            "<b>%{y} ↔ %{x}</b><br>Correlation: %{z:.2f}<extra></extra>".to_string(),
        ),
        ..Trace::new(TraceKind::Heatmap)
    }
    .with_style(json!({
        "colorscale": [[0, "#e2e8f0"], [0.5, "#667eea"], [1, "#f093fb"]],
        "showscale": true,
        "colorbar": { "title": "Correlation", "titlefont": { "size": 14 }, "tickfont": { "size": 12 } }
    }));

    let layout = Layout::base().with(json!({
        "title": title("Taste Correlation Matrix", 18),
        "xaxis": { "tickfont": { "size": 12 }, "side": "bottom" },
        "yaxis": { "tickfont": { "size": 12 } }
    }));

    Figure::new(vec![trace], layout)
}

/// Bar chart of predicted trends with model confidence as a percentage.
pub fn predictive_analytics(data: &PredictionsData) -> Figure {
    let trace = Trace {
        x: Some(Series::Categories(data.trends.clone())),
        y: Some(Series::Numbers(data.confidence.clone())),
        hovertemplate: Some("<b>%{x}</b><br>Confidence: %{y}%<extra></extra>".to_string()),
        ..Trace::new(TraceKind::Bar)
    }
    .with_style(json!({
        "marker": {
            "color": palette(data.trends.len().min(5)),
            "line": { "color": "#ffffff", "width": 2 },
            "opacity": 0.8
        },
        "text": data.confidence,
        "texttemplate": "%{text}%",
        "textposition": "outside",
        "textfont": { "size": 14, "color": "#1e293b" }
    }));

    let layout = Layout::base().with(json!({
        "title": title("AI Predictive Analytics", 18),
        "xaxis": { "title": axis_title("Predicted Trends"), "tickangle": -45, "tickfont": { "size": 12 } },
        "yaxis": { "title": axis_title("Confidence (%)"), "tickfont": { "size": 12 }, "range": [0, 100] },
        "bargap": 0.3,
        "plot_bgcolor": "rgba(248, 250, 252, 0.5)"
    }));

    Figure::new(vec![trace], layout)
}

/// A validated chart payload that knows which builder draws it.
pub trait ChartPayload {
    fn validate_payload(&self) -> Result<(), PayloadError>;

    fn build(&self) -> Figure;

    fn to_figure(&self) -> Result<Figure, PayloadError> {
        self.validate_payload()?;
        Ok(self.build())
    }
}

macro_rules! chart_payload {
    ($data:ty, $builder:ident) => {
        impl ChartPayload for $data {
            fn validate_payload(&self) -> Result<(), PayloadError> {
                self.validate()
            }

            fn build(&self) -> Figure {
                $builder(self)
            }
        }
    };
}

chart_payload!(DemographicsData, demographics_chart);
chart_payload!(RegionsData, regions_chart);
chart_payload!(TimelineData, timeline_chart);
chart_payload!(TastePatternsData, taste_patterns_chart);
chart_payload!(GeographicData, geographic_heatmap);
chart_payload!(TrendsData, trends_timeline);
chart_payload!(CorrelationData, correlation_matrix);
chart_payload!(PredictionsData, predictive_analytics);
