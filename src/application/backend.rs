// Backend trait for the TasteShift analysis API
use crate::domain::analysis::{
    CampaignAnalysis, CampaignRequest, CrossDomainInsights, CrossDomainRequest, Persona,
    PersonaRequest,
};
use crate::domain::payload::InsightsData;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("{endpoint} rejected the request: {message}")]
    Rejected { endpoint: String, message: String },
    #[error("could not decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },
}

/// The assorted AI-backed analysis endpoints that share one request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisEndpoint {
    CulturalChat,
    CrossCulturalAdapt,
    CulturalTrends,
    QlooRiskAnalysis,
    GeminiRiskAnalysis,
    QlooRoiInsights,
    GeminiBusinessAnalysis,
    AdvancedCulturalIntelligence,
    GenerateCaseStudies,
}

impl AnalysisEndpoint {
    pub const ALL: [AnalysisEndpoint; 9] = [
        AnalysisEndpoint::CulturalChat,
        AnalysisEndpoint::CrossCulturalAdapt,
        AnalysisEndpoint::CulturalTrends,
        AnalysisEndpoint::QlooRiskAnalysis,
        AnalysisEndpoint::GeminiRiskAnalysis,
        AnalysisEndpoint::QlooRoiInsights,
        AnalysisEndpoint::GeminiBusinessAnalysis,
        AnalysisEndpoint::AdvancedCulturalIntelligence,
        AnalysisEndpoint::GenerateCaseStudies,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            AnalysisEndpoint::CulturalChat => "cultural-chat",
            AnalysisEndpoint::CrossCulturalAdapt => "cross-cultural-adapt",
            AnalysisEndpoint::CulturalTrends => "cultural-trends",
            AnalysisEndpoint::QlooRiskAnalysis => "qloo-risk-analysis",
            AnalysisEndpoint::GeminiRiskAnalysis => "gemini-risk-analysis",
            AnalysisEndpoint::QlooRoiInsights => "qloo-roi-insights",
            AnalysisEndpoint::GeminiBusinessAnalysis => "gemini-business-analysis",
            AnalysisEndpoint::AdvancedCulturalIntelligence => "advanced-cultural-intelligence",
            AnalysisEndpoint::GenerateCaseStudies => "generate-case-studies",
        }
    }

    pub fn path(&self) -> String {
        format!("/api/{}", self.slug())
    }

    /// Demo payload shown when the endpoint cannot be reached.
    pub fn fallback(&self) -> Value {
        match self {
            AnalysisEndpoint::CulturalChat => json!({
                "response": "Cultural intelligence is temporarily offline. Audiences in this segment respond best to authentic, community-driven storytelling.",
                "suggestions": ["Lead with local creators", "Reference shared rituals", "Keep tone conversational"]
            }),
            AnalysisEndpoint::CrossCulturalAdapt => json!({
                "adapted_message": "Adapt imagery, idioms and humour to the target culture before launch.",
                "cultural_considerations": ["Local holidays", "Colour symbolism", "Formality of address"],
                "adaptation_score": 75
            }),
            AnalysisEndpoint::CulturalTrends => json!({
                "trends": [
                    { "name": "Sustainable Fashion", "momentum": 89 },
                    { "name": "Plant-Based Food", "momentum": 82 },
                    { "name": "Virtual Events", "momentum": 87 }
                ]
            }),
            AnalysisEndpoint::QlooRiskAnalysis | AnalysisEndpoint::GeminiRiskAnalysis => json!({
                "risk_score": 35,
                "risk_level": "Medium",
                "risk_factors": ["Cultural sensitivity review recommended", "Limited regional testing"],
                "mitigations": ["Run a focus group in the target region", "Localize creative assets"]
            }),
            AnalysisEndpoint::QlooRoiInsights => json!({
                "projected_roi": 2.4,
                "confidence": 78,
                "drivers": ["Audience affinity", "Channel fit"]
            }),
            AnalysisEndpoint::GeminiBusinessAnalysis => json!({
                "summary": "Strong cultural alignment with moderate execution risk.",
                "opportunities": ["Cross-domain partnerships", "Creator collaborations"],
                "recommendations": ["Pilot in two regions before a global rollout"]
            }),
            AnalysisEndpoint::AdvancedCulturalIntelligence => json!({
                "cultural_intelligence_score": 82,
                "insights": ["Music → Fashion affinity strength: 85%", "Food → Travel cultural bridge identified"]
            }),
            AnalysisEndpoint::GenerateCaseStudies => json!({
                "case_studies": [
                    {
                        "title": "Gen Z streetwear launch",
                        "region": "Japan",
                        "outcome": "Campaign localized around music subcultures",
                        "taste_shock_score": 24
                    }
                ]
            }),
        }
    }
}

impl fmt::Display for AnalysisEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for AnalysisEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisEndpoint::ALL
            .iter()
            .copied()
            .find(|e| e.slug() == s)
            .ok_or_else(|| format!("unknown analysis endpoint '{}'", s))
    }
}

/// Unwrap a `{success, <key>: payload}` envelope.
///
/// `success: false` becomes [`BackendError::Rejected`]. When `key` is absent the
/// whole body is treated as the payload.
pub fn unwrap_envelope(endpoint: &str, body: Value, key: Option<&str>) -> Result<Value, BackendError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        return Err(BackendError::Rejected {
            endpoint: endpoint.to_string(),
            message,
        });
    }

    match key {
        Some(key) => match body {
            Value::Object(mut fields) if fields.contains_key(key) => {
                Ok(fields.remove(key).unwrap_or(Value::Null))
            }
            other => Ok(other),
        },
        None => Ok(body),
    }
}

#[async_trait]
pub trait TasteShiftBackend: Send + Sync {
    async fn generate_persona(&self, request: &PersonaRequest) -> Result<Persona, BackendError>;

    async fn list_personas(&self) -> Result<Vec<Persona>, BackendError>;

    async fn get_persona(&self, id: &str) -> Result<Persona, BackendError>;

    async fn persona_analyses(&self, persona_id: i64) -> Result<Vec<CampaignAnalysis>, BackendError>;

    /// Long-running; uses the campaign timeout.
    async fn analyze_campaign(&self, request: &CampaignRequest) -> Result<CampaignAnalysis, BackendError>;

    async fn insights_data(&self) -> Result<InsightsData, BackendError>;

    async fn cross_domain_insights(
        &self,
        request: &CrossDomainRequest,
    ) -> Result<CrossDomainInsights, BackendError>;

    async fn analyze(&self, endpoint: AnalysisEndpoint, body: Value) -> Result<Value, BackendError>;
}

/// Scripted backend for service and handler tests. `None` answers behave like
/// an HTTP 500.
#[cfg(test)]
pub mod fake {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct FakeBackend {
        pub insights: Option<InsightsData>,
        pub cross_domain: Option<CrossDomainInsights>,
        pub persona: Option<Persona>,
        pub analysis: Option<Value>,
        pub calls: AtomicUsize,
    }

    impl FakeBackend {
        pub fn failing() -> Self {
            Self::default()
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer<T: Clone>(&self, endpoint: &str, value: &Option<T>) -> Result<T, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            value.clone().ok_or_else(|| BackendError::Status {
                endpoint: endpoint.to_string(),
                status: 500,
                body: "Internal Server Error".to_string(),
            })
        }
    }

    #[async_trait]
    impl TasteShiftBackend for FakeBackend {
        async fn generate_persona(&self, request: &PersonaRequest) -> Result<Persona, BackendError> {
            let mut persona = self.answer("/api/generate-persona", &self.persona)?;
            persona.region = request.region.clone();
            persona.demographic = request.demographic.clone();
            Ok(persona)
        }

        async fn list_personas(&self) -> Result<Vec<Persona>, BackendError> {
            self.answer("/api/personas", &self.persona).map(|p| vec![p])
        }

        async fn get_persona(&self, _id: &str) -> Result<Persona, BackendError> {
            self.answer("/api/personas", &self.persona)
        }

        async fn persona_analyses(&self, persona_id: i64) -> Result<Vec<CampaignAnalysis>, BackendError> {
            self.answer("/api/persona/analyses", &self.analysis)?;
            Ok(vec![CampaignAnalysis {
                id: Some(1),
                persona_id,
                campaign_brief: "Earlier brief".to_string(),
                taste_shock_score: Some(42),
                creative_suggestions: Vec::new(),
                created_at: None,
            }])
        }

        async fn analyze_campaign(&self, request: &CampaignRequest) -> Result<CampaignAnalysis, BackendError> {
            self.answer("/api/analyze-campaign", &self.analysis)?;
            Ok(CampaignAnalysis {
                id: Some(1),
                persona_id: request.persona_id,
                campaign_brief: request.campaign_brief.clone(),
                taste_shock_score: Some(42),
                creative_suggestions: Vec::new(),
                created_at: None,
            })
        }

        async fn insights_data(&self) -> Result<InsightsData, BackendError> {
            self.answer("/api/insights-data", &self.insights)
        }

        async fn cross_domain_insights(
            &self,
            _request: &CrossDomainRequest,
        ) -> Result<CrossDomainInsights, BackendError> {
            self.answer("/api/cross-domain-insights", &self.cross_domain)
        }

        async fn analyze(&self, endpoint: AnalysisEndpoint, _body: Value) -> Result<Value, BackendError> {
            self.answer(&endpoint.path(), &self.analysis)
        }
    }
}
