// Rendered chart bookkeeping and interaction events
use super::figure::{Layout, Trace};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One rendered chart, keyed by its container id.
#[derive(Debug, Clone)]
pub struct ChartInstance {
    pub generation: u64,
    /// Values as first rendered; real-time perturbations are computed from these.
    pub baseline: Vec<Trace>,
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub last_update_ms: i64,
}

/// Periodic refresh policy for one container.
#[derive(Debug, Clone)]
pub struct RefreshPolicy {
    pub enabled: bool,
    pub interval: Duration,
    pub last_update_ms: i64,
    pub cancel: CancellationToken,
}

impl RefreshPolicy {
    pub fn new(interval: Duration, now_ms: i64) -> Self {
        Self {
            enabled: true,
            interval,
            last_update_ms: now_ms,
            cancel: CancellationToken::new(),
        }
    }

    pub fn is_due(&self, now_ms: i64) -> bool {
        self.enabled
            && !self.cancel.is_cancelled()
            && now_ms.saturating_sub(self.last_update_ms) >= self.interval_ms()
    }

    /// Interval in milliseconds, saturating at `i64::MAX`.
    pub fn interval_ms(&self) -> i64 {
        i64::try_from(self.interval.as_millis()).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartState {
    Unrendered,
    Rendered,
    Destroyed,
}

/// A data point reported by a chart interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub point_number: Option<usize>,
}

impl ChartPoint {
    pub fn display_name(&self) -> String {
        self.x
            .clone()
            .or_else(|| self.label.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn display_value(&self) -> String {
        self.y
            .or(self.value)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartEvent {
    Click { points: Vec<ChartPoint> },
    Hover { points: Vec<ChartPoint> },
    Selected { points: Vec<ChartPoint> },
    DoubleClick,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InteractionOutcome {
    Ignored,
    PopupShown,
    Highlighted { point_number: usize },
    CrossDomainRequested,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_due_after_interval() {
        let policy = RefreshPolicy::new(Duration::from_millis(1000), 0);
        assert!(!policy.is_due(999));
        assert!(policy.is_due(1000));
    }

    #[test]
    fn test_huge_interval_is_never_due() {
        let policy = RefreshPolicy::new(Duration::from_millis(u64::MAX), 0);
        for now in [1, 2, 3, i64::MAX] {
            assert!(!policy.is_due(now));
        }
        assert_eq!(policy.interval_ms(), i64::MAX);
    }

    #[test]
    fn test_cancelled_policy_is_never_due() {
        let policy = RefreshPolicy::new(Duration::from_millis(10), 0);
        policy.cancel.cancel();
        assert!(!policy.is_due(10_000));
    }

    #[test]
    fn test_chart_event_parses_tagged_json() {
        let event: ChartEvent = serde_json::from_str(
            r#"{ "type": "click", "points": [{ "x": "Europe", "y": 24, "point_number": 1 }] }"#,
        )
        .unwrap();
        match event {
            ChartEvent::Click { points } => {
                assert_eq!(points[0].display_name(), "Europe");
                assert_eq!(points[0].display_value(), "24");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
