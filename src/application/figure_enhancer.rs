// Interactive enhancements applied to every figure before it is drawn
use crate::application::figure_builders::COLOR_PALETTE;
use crate::domain::figure::{Annotation, Figure, Layout, Trace, TraceKind};
use serde_json::{json, Map, Value};

pub fn enhance_figure(figure: &Figure) -> (Vec<Trace>, Layout) {
    let data = figure.data.iter().map(enhance_trace).collect();
    (data, enhance_layout(figure))
}

fn enhance_layout(figure: &Figure) -> Layout {
    let mut layout = Layout::base().merge(figure.layout.clone());
    layout.extend(json!({
        "hoverlabel": {
            "bgcolor": "rgba(255,255,255,0.95)",
            "bordercolor": "#667eea",
            "font": { "size": 12, "color": "#1e293b" }
        }
    }));
    if let Some(score) = figure.cultural_intelligence_score {
        layout.annotations.push(score_annotation(score));
    }
    layout
}

fn score_annotation(score: f64) -> Annotation {
    let mut style = Map::new();
    style.insert("bgcolor".to_string(), json!("rgba(102, 126, 234, 0.1)"));
    style.insert("bordercolor".to_string(), json!("#667eea"));
    style.insert("borderwidth".to_string(), json!(1));
    style.insert("font".to_string(), json!({ "size": 12, "color": "#667eea" }));
    Annotation {
        text: format!("🧠 CI Score: {}", score),
        x: 0.95,
        y: 0.95,
        xref: Some("paper".to_string()),
        yref: Some("paper".to_string()),
        showarrow: false,
        style,
    }
}

fn enhance_trace(trace: &Trace) -> Trace {
    let mut enhanced = trace.clone();

    if enhanced.hovertemplate.is_none() {
        enhanced.hovertemplate = Some(hover_template(trace.kind).to_string());
    }

    if trace.is_markers_scatter() {
        let size = trace
            .style
            .get("marker")
            .and_then(|m| m.get("size"))
            .cloned()
            .unwrap_or(json!(8));
        enhanced.merge_style(
            "marker",
            json!({ "size": size, "line": { "width": 2, "color": "#ffffff" }, "opacity": 0.8 }),
        );
    }

    if trace.kind == TraceKind::Bar {
        let has_color = trace
            .style
            .get("marker")
            .is_some_and(|m| m.get("color").is_some());
        if !has_color {
            let values = trace
                .y
                .as_ref()
                .and_then(|s| s.numbers())
                .or_else(|| trace.x.as_ref().and_then(|s| s.numbers()))
                .unwrap_or(&[]);
            enhanced.merge_style(
                "marker",
                json!({
                    "color": gradient_colors(values),
                    "line": { "width": 1, "color": "rgba(255,255,255,0.3)" }
                }),
            );
        }
    }

    enhanced
}

fn hover_template(kind: TraceKind) -> &'static str {
    match kind {
        TraceKind::Scatter => {
            "<b>%{text}</b><br>Value: %{y}<br>Cultural Relevance: %{marker.size}<extra></extra>"
        }
        TraceKind::Bar => "<b>%{x}</b><br>Count: %{y}<br>Trend: ↗️<extra></extra>",
        TraceKind::Pie => "<b>%{label}</b><br>%{percent}<br>Cultural Impact: High<extra></extra>",
        _ => "<b>%{x}</b><br>Value: %{y}<extra></extra>",
    }
}

/// One palette colour per value, with alpha scaled by the value's share of the maximum.
pub fn gradient_colors(values: &[f64]) -> Value {
    if values.is_empty() {
        return json!(COLOR_PALETTE[0]);
    }
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let colors: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let intensity = if max > 0.0 { value / max } else { 1.0 };
            adjust_color_intensity(COLOR_PALETTE[index % COLOR_PALETTE.len()], intensity)
        })
        .collect();
    json!(colors)
}

/// Append an alpha channel to a `#rrggbb` colour; alpha never drops below 0.3.
fn adjust_color_intensity(color: &str, intensity: f64) -> String {
    let alpha = intensity.clamp(0.3, 1.0);
    format!("{}{:02x}", color, (alpha * 255.0).floor() as u8)
}
