// HTTP implementation of the TasteShift backend
use crate::application::backend::{unwrap_envelope, AnalysisEndpoint, BackendError, TasteShiftBackend};
use crate::domain::analysis::{
    CampaignAnalysis, CampaignRequest, CrossDomainInsights, CrossDomainRequest, Persona,
    PersonaRequest,
};
use crate::domain::payload::InsightsData;
use crate::infrastructure::config::BackendSettings;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    insights_timeout: Duration,
    analysis_timeout: Duration,
    campaign_timeout: Duration,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            insights_timeout: settings.insights_timeout(),
            analysis_timeout: settings.analysis_timeout(),
            campaign_timeout: settings.campaign_timeout(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Accept", "application/json")
            .timeout(timeout)
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<Value, BackendError> {
        tracing::debug!("Calling backend {}", path);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout {
                    endpoint: path.to_string(),
                }
            } else {
                BackendError::Transport {
                    endpoint: path.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                endpoint: path.to_string(),
                status,
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| BackendError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        key: Option<&str>,
        timeout: Duration,
    ) -> Result<T, BackendError> {
        let body = self
            .execute(path, self.request(Method::GET, path, timeout))
            .await?;
        decode(path, unwrap_envelope(path, body, key)?)
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
        key: Option<&str>,
        timeout: Duration,
    ) -> Result<T, BackendError> {
        let request = self.request(Method::POST, path, timeout).json(payload);
        let body = self.execute(path, request).await?;
        decode(path, unwrap_envelope(path, body, key)?)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, BackendError> {
    serde_json::from_value(value).map_err(|e| BackendError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl TasteShiftBackend for HttpBackend {
    async fn generate_persona(&self, request: &PersonaRequest) -> Result<Persona, BackendError> {
        self.post("/api/generate-persona", request, Some("persona"), self.analysis_timeout)
            .await
    }

    async fn list_personas(&self) -> Result<Vec<Persona>, BackendError> {
        self.get("/api/personas", Some("personas"), self.analysis_timeout)
            .await
    }

    async fn get_persona(&self, id: &str) -> Result<Persona, BackendError> {
        let path = format!("/api/personas/{}", urlencoding::encode(id));
        self.get(&path, Some("persona"), self.analysis_timeout).await
    }

    async fn persona_analyses(&self, persona_id: i64) -> Result<Vec<CampaignAnalysis>, BackendError> {
        let path = format!("/api/persona/{}/analyses", persona_id);
        self.get(&path, Some("analyses"), self.analysis_timeout).await
    }

    async fn analyze_campaign(&self, request: &CampaignRequest) -> Result<CampaignAnalysis, BackendError> {
        self.post("/api/analyze-campaign", request, Some("analysis"), self.campaign_timeout)
            .await
    }

    async fn insights_data(&self) -> Result<InsightsData, BackendError> {
        self.get("/api/insights-data", None, self.insights_timeout)
            .await
    }

    async fn cross_domain_insights(
        &self,
        request: &CrossDomainRequest,
    ) -> Result<CrossDomainInsights, BackendError> {
        self.post(
            "/api/cross-domain-insights",
            request,
            Some("insights"),
            self.analysis_timeout,
        )
        .await
    }

    async fn analyze(&self, endpoint: AnalysisEndpoint, body: Value) -> Result<Value, BackendError> {
        let path = endpoint.path();
        self.post(&path, &body, None, self.analysis_timeout).await
    }
}
