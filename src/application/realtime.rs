// Simulated real-time data: small perturbations around the rendered baseline
use crate::domain::figure::{Series, Trace, TraceKind};
use rand::Rng;

/// Largest relative change applied to any value (±5%).
pub const MAX_RELATIVE_CHANGE: f64 = 0.05;

/// Perturb every numeric value series of `baseline`.
///
/// Changes are always relative to the baseline, never to the previous frame,
/// so values cannot drift further than `MAX_RELATIVE_CHANGE` from what was rendered.
pub fn perturb_traces<R: Rng + ?Sized>(baseline: &[Trace], now_ms: i64, rng: &mut R) -> Vec<Trace> {
    baseline
        .iter()
        .map(|trace| perturb_trace(trace, now_ms, rng))
        .collect()
}

fn perturb_trace<R: Rng + ?Sized>(trace: &Trace, now_ms: i64, rng: &mut R) -> Trace {
    let mut updated = trace.clone();
    match trace.kind {
        TraceKind::Bar => {
            if let Some(Series::Numbers(values)) = &trace.y {
                updated.y = Some(Series::Numbers(jitter(values, rng)));
            }
        }
        TraceKind::Scatter => {
            if let Some(Series::Numbers(values)) = &trace.y {
                updated.y = Some(Series::Numbers(trend(values, now_ms)));
            }
        }
        TraceKind::Pie => {
            if let Some(values) = &trace.values {
                updated.values = Some(jitter(values, rng));
            }
        }
        TraceKind::Scatterpolar => {
            if let Some(values) = &trace.r {
                updated.r = Some(jitter(values, rng));
            }
        }
        TraceKind::Choropleth | TraceKind::Heatmap => {}
    }
    updated
}

/// Scale `value` by up to `MAX_RELATIVE_CHANGE` in the direction of `factor`
/// (-1.0..=1.0). The result keeps the sign of `value`, so non-negative data
/// stays non-negative and negative baselines are preserved.
fn nudge(value: f64, factor: f64) -> f64 {
    value + factor * MAX_RELATIVE_CHANGE * value
}

fn jitter<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> Vec<f64> {
    values
        .iter()
        .map(|&value| nudge(value, rng.gen_range(-1.0_f64..=1.0)))
        .collect()
}

fn trend(values: &[f64], now_ms: i64) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let phase = now_ms as f64 / 10_000.0 + index as f64;
            nudge(value, phase.sin())
        })
        .collect()
}
