// Persona, campaign analysis and cross-domain insight domain models
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub id: Option<i64>,
    pub region: String,
    pub demographic: String,
    #[serde(default)]
    pub taste_data: Value,
    #[serde(default)]
    pub persona_description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRequest {
    pub region: String,
    pub demographic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub persona_id: i64,
    pub campaign_brief: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignAnalysis {
    #[serde(default)]
    pub id: Option<i64>,
    pub persona_id: i64,
    pub campaign_brief: String,
    #[serde(default)]
    pub taste_shock_score: Option<i64>,
    #[serde(default)]
    pub creative_suggestions: Vec<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossDomainRequest {
    pub region: String,
    pub demographic: String,
    pub primary_interest: String,
}

impl Default for CrossDomainRequest {
    fn default() -> Self {
        Self {
            region: "United States".to_string(),
            demographic: "Gen Z".to_string(),
            primary_interest: "music".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalBridge {
    pub from_domain: String,
    pub to_domain: String,
    pub affinity_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingOpportunity {
    #[serde(rename = "type")]
    pub kind: String,
    pub potential_reach: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossDomainInsights {
    #[serde(default)]
    pub cultural_bridges: Vec<CulturalBridge>,
    #[serde(default)]
    pub marketing_opportunities: Vec<MarketingOpportunity>,
    #[serde(default)]
    pub cross_domain_score: Option<f64>,
}

impl CrossDomainInsights {
    /// Canned insight set shown when the analysis endpoint cannot be reached.
    pub fn fallback() -> Self {
        Self {
            cultural_bridges: vec![
                CulturalBridge {
                    from_domain: "music".to_string(),
                    to_domain: "fashion".to_string(),
                    affinity_strength: 85.0,
                },
                CulturalBridge {
                    from_domain: "food".to_string(),
                    to_domain: "travel".to_string(),
                    affinity_strength: 78.0,
                },
            ],
            marketing_opportunities: vec![MarketingOpportunity {
                kind: "Cross-Domain Campaign".to_string(),
                potential_reach: "High".to_string(),
            }],
            cross_domain_score: Some(82.0),
        }
    }

    /// One display line per bridge, e.g. `Music → Fashion affinity strength: 85%`.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .cultural_bridges
            .iter()
            .map(|b| {
                format!(
                    "{} → {} affinity strength: {}%",
                    capitalize(&b.from_domain),
                    capitalize(&b.to_domain),
                    b.affinity_strength.round()
                )
            })
            .collect();
        if !self.marketing_opportunities.is_empty() {
            lines.push(format!(
                "{} marketing opportunities discovered",
                self.marketing_opportunities.len()
            ));
        }
        lines
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_summary() {
        let lines = CrossDomainInsights::fallback().summary_lines();
        assert_eq!(
            lines,
            vec![
                "Music → Fashion affinity strength: 85%".to_string(),
                "Food → Travel affinity strength: 78%".to_string(),
                "1 marketing opportunities discovered".to_string(),
            ]
        );
    }

    #[test]
    fn test_persona_parses_with_missing_optional_fields() {
        let persona: Persona =
            serde_json::from_str(r#"{ "region": "Japan", "demographic": "Gen Z" }"#).unwrap();
        assert_eq!(persona.id, None);
        assert_eq!(persona.taste_data, Value::Null);
    }
}
