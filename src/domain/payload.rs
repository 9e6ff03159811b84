// Chart data payloads, one per chart family, plus the aggregate insights document
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PayloadError {
    #[error("{chart}: {left} has {left_len} entries but {right} has {right_len}")]
    LengthMismatch {
        chart: &'static str,
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },
    #[error("{chart}: no data points")]
    Empty { chart: &'static str },
    #[error("correlation matrix must be {expected}x{expected}, row {row} has {found} entries")]
    NotSquare {
        expected: usize,
        row: usize,
        found: usize,
    },
    #[error("{chart}: value {value} is not finite")]
    NotFinite { chart: &'static str, value: f64 },
}

fn check_pair(
    chart: &'static str,
    left: &'static str,
    left_len: usize,
    right: &'static str,
    right_len: usize,
) -> Result<(), PayloadError> {
    if left_len == 0 || right_len == 0 {
        return Err(PayloadError::Empty { chart });
    }
    if left_len != right_len {
        return Err(PayloadError::LengthMismatch {
            chart,
            left,
            left_len,
            right,
            right_len,
        });
    }
    Ok(())
}

fn check_finite(chart: &'static str, values: &[f64]) -> Result<(), PayloadError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(PayloadError::NotFinite { chart, value }),
        None => Ok(()),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn six_months() -> Vec<String> {
    strings(&["Jan 2024", "Feb 2024", "Mar 2024", "Apr 2024", "May 2024", "Jun 2024"])
}

fn taste_categories() -> Vec<String> {
    strings(&["Music", "Fashion", "Food", "Film", "Books", "Brands"])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicsData {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
    #[serde(default = "default_total")]
    pub total: f64,
}

fn default_total() -> f64 {
    100.0
}

impl Default for DemographicsData {
    fn default() -> Self {
        Self {
            values: vec![34.0, 28.0, 22.0, 16.0],
            labels: strings(&["Millennials", "Gen Z", "Gen X", "Baby Boomers"]),
            total: 100.0,
        }
    }
}

impl DemographicsData {
    pub fn validate(&self) -> Result<(), PayloadError> {
        check_pair("demographics", "labels", self.labels.len(), "values", self.values.len())?;
        check_finite("demographics", &self.values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionsData {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

impl Default for RegionsData {
    fn default() -> Self {
        Self {
            names: strings(&[
                "North America",
                "Europe",
                "Asia-Pacific",
                "Latin America",
                "Middle East",
                "Africa",
            ]),
            values: vec![28.0, 24.0, 22.0, 12.0, 8.0, 6.0],
        }
    }
}

impl RegionsData {
    pub fn validate(&self) -> Result<(), PayloadError> {
        check_pair("regions", "names", self.names.len(), "values", self.values.len())?;
        check_finite("regions", &self.values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

impl Default for TimelineData {
    fn default() -> Self {
        Self {
            dates: six_months(),
            values: vec![12.0, 19.0, 25.0, 31.0, 28.0, 35.0],
        }
    }
}

impl TimelineData {
    pub fn validate(&self) -> Result<(), PayloadError> {
        check_pair("timeline", "dates", self.dates.len(), "values", self.values.len())?;
        check_finite("timeline", &self.values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TastePatternsData {
    pub values: Vec<f64>,
    pub categories: Vec<String>,
}

impl Default for TastePatternsData {
    fn default() -> Self {
        Self {
            values: vec![85.0, 72.0, 94.0, 78.0, 89.0, 76.0],
            categories: strings(&["Music", "Food", "Fashion", "Film", "Books", "Brands"]),
        }
    }
}

impl TastePatternsData {
    pub fn validate(&self) -> Result<(), PayloadError> {
        check_pair(
            "taste patterns",
            "categories",
            self.categories.len(),
            "values",
            self.values.len(),
        )?;
        check_finite("taste patterns", &self.values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicData {
    pub countries: Vec<String>,
    pub values: Vec<f64>,
}

impl Default for GeographicData {
    fn default() -> Self {
        Self {
            countries: strings(&[
                "United States",
                "Canada",
                "United Kingdom",
                "Germany",
                "France",
                "Japan",
                "Australia",
                "Brazil",
                "India",
                "South Korea",
            ]),
            values: vec![127.0, 89.0, 76.0, 68.0, 64.0, 58.0, 55.0, 52.0, 48.0, 45.0],
        }
    }
}

impl GeographicData {
    pub fn validate(&self) -> Result<(), PayloadError> {
        check_pair("geographic", "countries", self.countries.len(), "values", self.values.len())?;
        check_finite("geographic", &self.values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendsData {
    pub dates: Vec<String>,
    pub music: Vec<f64>,
    pub fashion: Vec<f64>,
    pub food: Vec<f64>,
}

impl Default for TrendsData {
    fn default() -> Self {
        Self {
            dates: six_months(),
            music: vec![45.0, 52.0, 48.0, 61.0, 58.0, 67.0],
            fashion: vec![38.0, 42.0, 55.0, 49.0, 63.0, 71.0],
            food: vec![32.0, 38.0, 41.0, 45.0, 52.0, 59.0],
        }
    }
}

impl TrendsData {
    pub fn validate(&self) -> Result<(), PayloadError> {
        check_pair("trends", "dates", self.dates.len(), "music", self.music.len())?;
        check_pair("trends", "dates", self.dates.len(), "fashion", self.fashion.len())?;
        check_pair("trends", "dates", self.dates.len(), "food", self.food.len())?;
        check_finite("trends", &self.music)?;
        check_finite("trends", &self.fashion)?;
        check_finite("trends", &self.food)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationData {
    pub categories: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

impl Default for CorrelationData {
    fn default() -> Self {
        Self {
            categories: taste_categories(),
            matrix: vec![
                vec![1.0, 0.87, 0.65, 0.72, 0.58, 0.69],
                vec![0.87, 1.0, 0.71, 0.68, 0.62, 0.74],
                vec![0.65, 0.71, 1.0, 0.72, 0.59, 0.66],
                vec![0.72, 0.68, 0.72, 1.0, 0.81, 0.63],
                vec![0.58, 0.62, 0.59, 0.81, 1.0, 0.57],
                vec![0.69, 0.74, 0.66, 0.63, 0.57, 1.0],
            ],
        }
    }
}

impl CorrelationData {
    pub fn validate(&self) -> Result<(), PayloadError> {
        check_pair(
            "correlation",
            "categories",
            self.categories.len(),
            "matrix rows",
            self.matrix.len(),
        )?;
        let expected = self.categories.len();
        for (row, values) in self.matrix.iter().enumerate() {
            if values.len() != expected {
                return Err(PayloadError::NotSquare {
                    expected,
                    row,
                    found: values.len(),
                });
            }
            check_finite("correlation", values)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionsData {
    pub trends: Vec<String>,
    pub confidence: Vec<f64>,
}

impl Default for PredictionsData {
    fn default() -> Self {
        Self {
            trends: strings(&[
                "AI Art",
                "Sustainable Fashion",
                "Virtual Events",
                "Plant-Based Food",
                "Mindfulness Apps",
            ]),
            confidence: vec![94.0, 89.0, 87.0, 82.0, 78.0],
        }
    }
}

impl PredictionsData {
    pub fn validate(&self) -> Result<(), PayloadError> {
        check_pair(
            "predictions",
            "trends",
            self.trends.len(),
            "confidence",
            self.confidence.len(),
        )?;
        check_finite("predictions", &self.confidence)
    }
}

/// Summary numbers shown on the dashboard stat cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub trend_score: Option<f64>,
    pub diversity_index: Option<f64>,
    pub market_coverage: Option<f64>,
    pub total_personas: Option<f64>,
    pub total_campaigns: Option<f64>,
    pub total_regions: Option<f64>,
    pub avg_score: Option<f64>,
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            trend_score: Some(87.0),
            diversity_index: Some(92.0),
            market_coverage: Some(78.0),
            total_personas: Some(127.0),
            total_campaigns: Some(89.0),
            total_regions: Some(15.0),
            avg_score: Some(87.0),
        }
    }
}

impl DashboardStats {
    /// Stat card element id and display value, substituting the fallback for
    /// any missing or zero field.
    pub fn cards(&self) -> Vec<(&'static str, String)> {
        let fallback = DashboardStats::default();
        let pick = |value: Option<f64>, default: Option<f64>| {
            let value = value.filter(|v| *v != 0.0).or(default).unwrap_or_default();
            format_stat(value)
        };
        vec![
            ("trend-score", pick(self.trend_score, fallback.trend_score)),
            ("diversity-index", pick(self.diversity_index, fallback.diversity_index)),
            ("market-coverage", pick(self.market_coverage, fallback.market_coverage)),
            ("total-personas", pick(self.total_personas, fallback.total_personas)),
            ("total-campaigns", pick(self.total_campaigns, fallback.total_campaigns)),
            ("total-regions", pick(self.total_regions, fallback.total_regions)),
            ("avg-score", pick(self.avg_score, fallback.avg_score)),
            ("prediction-accuracy", "92%".to_string()),
        ]
    }
}

fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Aggregate document served by `/api/insights-data`. Every section is optional;
/// absent sections are filled from the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsData {
    #[serde(default)]
    pub demographics: Option<DemographicsData>,
    #[serde(default)]
    pub regions: Option<RegionsData>,
    #[serde(default)]
    pub timeline: Option<TimelineData>,
    #[serde(default)]
    pub taste_patterns: Option<TastePatternsData>,
    #[serde(default)]
    pub geographic: Option<GeographicData>,
    #[serde(default)]
    pub trends: Option<TrendsData>,
    #[serde(default)]
    pub correlation: Option<CorrelationData>,
    #[serde(default)]
    pub predictions: Option<PredictionsData>,
    #[serde(default)]
    pub stats: Option<DashboardStats>,
}

impl InsightsData {
    /// The complete offline data set used when the backend is unreachable.
    pub fn fallback() -> Self {
        Self {
            demographics: Some(DemographicsData::default()),
            regions: Some(RegionsData::default()),
            timeline: Some(TimelineData::default()),
            taste_patterns: Some(TastePatternsData::default()),
            geographic: Some(GeographicData::default()),
            trends: Some(TrendsData::default()),
            correlation: Some(CorrelationData::default()),
            predictions: Some(PredictionsData::default()),
            stats: Some(DashboardStats::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let data = InsightsData::fallback();
        assert!(data.demographics.unwrap().validate().is_ok());
        assert!(data.regions.unwrap().validate().is_ok());
        assert!(data.timeline.unwrap().validate().is_ok());
        assert!(data.taste_patterns.unwrap().validate().is_ok());
        assert!(data.geographic.unwrap().validate().is_ok());
        assert!(data.trends.unwrap().validate().is_ok());
        assert!(data.correlation.unwrap().validate().is_ok());
        assert!(data.predictions.unwrap().validate().is_ok());
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let data = RegionsData {
            names: vec!["Europe".to_string()],
            values: vec![1.0, 2.0],
        };
        assert_eq!(
            data.validate(),
            Err(PayloadError::LengthMismatch {
                chart: "regions",
                left: "names",
                left_len: 1,
                right: "values",
                right_len: 2,
            })
        );
    }

    #[test]
    fn test_non_square_matrix_is_rejected() {
        let mut data = CorrelationData::default();
        data.matrix[2].pop();
        assert!(matches!(
            data.validate(),
            Err(PayloadError::NotSquare { expected: 6, row: 2, found: 5 })
        ));
    }

    #[test]
    fn test_partial_insights_document_parses() {
        let raw = r#"{ "regions": { "names": ["Europe"], "values": [3] }, "stats": { "trendScore": 64 } }"#;
        let data: InsightsData = serde_json::from_str(raw).unwrap();

        assert_eq!(data.regions.unwrap().values, vec![3.0]);
        assert!(data.demographics.is_none());
        let stats = data.stats.unwrap();
        assert_eq!(stats.trend_score, Some(64.0));
        assert_eq!(stats.diversity_index, None);
    }

    #[test]
    fn test_stat_cards_fall_back_per_field() {
        let stats = DashboardStats {
            trend_score: Some(64.0),
            diversity_index: None,
            market_coverage: Some(0.0),
            total_personas: None,
            total_campaigns: None,
            total_regions: None,
            avg_score: Some(71.5),
        };
        let cards = stats.cards();

        assert_eq!(cards[0], ("trend-score", "64".to_string()));
        assert_eq!(cards[1], ("diversity-index", "92".to_string()));
        assert_eq!(cards[2], ("market-coverage", "78".to_string()));
        assert_eq!(cards[6], ("avg-score", "71.5".to_string()));
        assert_eq!(cards[7], ("prediction-accuracy", "92%".to_string()));
    }

    #[test]
    fn test_stat_cards_format_large_whole_numbers_exactly() {
        let stats = DashboardStats {
            trend_score: Some(1e20),
            total_personas: Some(-3.0),
            ..DashboardStats::default()
        };
        let cards = stats.cards();

        assert_eq!(cards[0].1, "100000000000000000000");
        assert_eq!(cards[3].1, "-3");
    }
}
