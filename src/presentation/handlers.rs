// HTTP request handlers
use crate::application::backend::AnalysisEndpoint;
use crate::application::chart_renderer::{RenderMetrics, RenderResult};
use crate::application::cross_domain::trigger_cross_domain_analysis;
use crate::application::figure_builders::ChartPayload;
use crate::application::insights_service::{load_insights_dashboard, DashboardReport};
use crate::application::persona_service::{self, AnalysisOutcome, PersonaError, PersonaExport};
use crate::application::session::SharedSession;
use crate::domain::analysis::{CampaignAnalysis, CrossDomainInsights, Persona, PersonaRequest};
use crate::domain::chart_instance::{ChartEvent, ChartState, InteractionOutcome};
use crate::domain::figure::{Figure, Layout};
use crate::domain::payload::{
    CorrelationData, DemographicsData, GeographicData, PayloadError, PredictionsData,
    RegionsData, TastePatternsData, TimelineData, TrendsData,
};
use crate::infrastructure::chunked_json::stream_from_subscription;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug)]
pub enum ApiError {
    SessionNotFound(Uuid),
    ContainerNotFound(String),
    InvalidPayload(PayloadError),
    BadRequest(String),
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::SessionNotFound(id) => (StatusCode::NOT_FOUND, format!("session {} not found", id)),
            ApiError::ContainerNotFound(id) => (StatusCode::NOT_FOUND, format!("container '{}' not found", id)),
            ApiError::InvalidPayload(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Upstream(message) => (StatusCode::BAD_GATEWAY, message),
        };
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

impl From<PersonaError> for ApiError {
    fn from(e: PersonaError) -> Self {
        match e {
            PersonaError::Backend(e) => ApiError::Upstream(e.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Chart data posted by a page, tagged by chart family. `figure` draws a
/// pre-built figure as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "chart", content = "data", rename_all = "snake_case")]
pub enum ChartRequest {
    Demographics(DemographicsData),
    Regions(RegionsData),
    Timeline(TimelineData),
    TastePatterns(TastePatternsData),
    Geographic(GeographicData),
    Trends(TrendsData),
    Correlation(CorrelationData),
    Predictions(PredictionsData),
    Figure(Figure),
}

impl ChartRequest {
    pub fn into_figure(self) -> Result<Figure, PayloadError> {
        match self {
            ChartRequest::Demographics(data) => data.to_figure(),
            ChartRequest::Regions(data) => data.to_figure(),
            ChartRequest::Timeline(data) => data.to_figure(),
            ChartRequest::TastePatterns(data) => data.to_figure(),
            ChartRequest::Geographic(data) => data.to_figure(),
            ChartRequest::Trends(data) => data.to_figure(),
            ChartRequest::Correlation(data) => data.to_figure(),
            ChartRequest::Predictions(data) => data.to_figure(),
            ChartRequest::Figure(figure) => Ok(figure),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RealtimeRequest {
    pub interval_ms: Option<u64>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CampaignBody {
    pub campaign_brief: String,
}

#[derive(Debug, Serialize)]
pub struct RealtimeStatus {
    pub enabled: bool,
    pub interval_ms: u64,
    pub last_update_ms: i64,
}

#[derive(Debug, Serialize)]
pub struct ChartStatus {
    pub container_id: String,
    pub state: ChartState,
    pub generation: Option<u64>,
    pub last_update_ms: Option<i64>,
    /// Layout of the drawn chart after enhancement.
    pub layout: Option<Layout>,
    pub realtime: Option<RealtimeStatus>,
}

async fn session(state: &AppState, id: Uuid) -> Result<SharedSession, ApiError> {
    state
        .sessions
        .get(&id)
        .await
        .ok_or(ApiError::SessionNotFound(id))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn create_session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let (id, _) = state.sessions.create().await;
    (StatusCode::CREATED, Json(json!({ "session_id": id })))
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

/// Full scene snapshot, Brotli-compressed when the client accepts it
pub async fn get_scene(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let snapshot = session(&state, id).await?.lock().await.renderer.surface().snapshot();
    Ok(match json_response(&snapshot, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    })
}

/// Stream scene changes (progressive updates) as length-prefixed JSON chunks
pub async fn stream_updates(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let rx = session(&state, id).await?.lock().await.renderer.surface().subscribe();
    Ok(stream_from_subscription(rx, accepts_brotli(&headers)))
}

pub async fn load_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<DashboardReport> {
    let session = session(&state, id).await?;
    Ok(Json(load_insights_dashboard(&session, state.backend.as_ref()).await))
}

pub async fn mount_container(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    session(&state, id)
        .await?
        .lock()
        .await
        .renderer
        .surface_mut()
        .mount(&container);
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a container from the page. Any chart in it stays registered until
/// destroyed, like a chart whose DOM node was removed.
pub async fn unmount_container(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    let removed = session(&state, id)
        .await?
        .lock()
        .await
        .renderer
        .surface_mut()
        .unmount(&container);
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::ContainerNotFound(container))
    }
}

pub async fn render_chart(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
    Json(request): Json<ChartRequest>,
) -> ApiResult<RenderResult> {
    let session = session(&state, id).await?;
    let mut session = session.lock().await;
    match request.into_figure() {
        Ok(figure) => Ok(Json(session.renderer.render(&container, &figure))),
        Err(e) => {
            session.renderer.reject_payload(&container, e.clone().into());
            Err(ApiError::InvalidPayload(e))
        }
    }
}

pub async fn chart_status(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
) -> ApiResult<ChartStatus> {
    let session = session(&state, id).await?;
    let session = session.lock().await;
    let renderer = &session.renderer;
    let chart = renderer.chart(&container);

    Ok(Json(ChartStatus {
        state: renderer.chart_state(&container),
        generation: chart.map(|c| c.generation),
        last_update_ms: chart.map(|c| c.last_update_ms),
        layout: chart.map(|c| c.layout.clone()),
        realtime: renderer.refresh_policy(&container).map(|p| RealtimeStatus {
            enabled: p.enabled,
            interval_ms: u64::try_from(p.interval.as_millis()).unwrap_or(u64::MAX),
            last_update_ms: p.last_update_ms,
        }),
        container_id: container,
    }))
}

pub async fn destroy_chart(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    session(&state, id).await?.lock().await.renderer.destroy(&container);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn destroy_all_charts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    session(&state, id).await?.lock().await.renderer.destroy_all();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_realtime(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
    Json(request): Json<RealtimeRequest>,
) -> ApiResult<Value> {
    let session = session(&state, id).await?;
    let mut session = session.lock().await;
    let active = if request.enabled {
        let interval = Duration::from_millis(request.interval_ms.unwrap_or(5_000));
        session.renderer.start_real_time_updates(&container, interval)
    } else {
        session.renderer.stop_real_time_updates(&container);
        false
    };
    Ok(Json(json!({ "container_id": container, "active": active })))
}

pub async fn refresh_chart(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
) -> ApiResult<Value> {
    let session = session(&state, id).await?;
    let result = session.lock().await.renderer.refresh(&container);
    Ok(Json(match result {
        Ok(()) => json!({ "refreshed": true }),
        Err(e) => json!({ "refreshed": false, "error": e.to_string() }),
    }))
}

/// Forward a charting-library event. Selections and double-clicks kick off a
/// cross-domain analysis in the background.
pub async fn chart_event(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
    Json(event): Json<ChartEvent>,
) -> ApiResult<InteractionOutcome> {
    let session = session(&state, id).await?;
    let outcome = session.lock().await.renderer.handle_event(&container, &event);

    if outcome == InteractionOutcome::CrossDomainRequested {
        let backend = state.backend.clone();
        tokio::spawn(async move {
            trigger_cross_domain_analysis(&session, backend.as_ref(), &container).await;
        });
    }
    Ok(Json(outcome))
}

pub async fn cross_domain(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
) -> ApiResult<CrossDomainInsights> {
    let session = session(&state, id).await?;
    trigger_cross_domain_analysis(&session, state.backend.as_ref(), &container)
        .await
        .map(Json)
        .ok_or(ApiError::ContainerNotFound(container))
}

pub async fn dismiss_overlay(
    State(state): State<Arc<AppState>>,
    Path((id, container)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    session(&state, id).await?.lock().await.renderer.dismiss_overlay(&container);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn preload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    Ok(Json(session(&state, id).await?.lock().await.preload.to_json()))
}

pub async fn metrics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<RenderMetrics> {
    Ok(Json(session(&state, id).await?.lock().await.renderer.metrics().clone()))
}

pub async fn generate_persona(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<PersonaRequest>,
) -> ApiResult<Persona> {
    let session = session(&state, id).await?;
    Ok(Json(
        persona_service::generate_persona(&session, state.backend.as_ref(), &request).await?,
    ))
}

pub async fn select_persona(
    State(state): State<Arc<AppState>>,
    Path((id, persona_id)): Path<(Uuid, String)>,
) -> ApiResult<Persona> {
    let session = session(&state, id).await?;
    Ok(Json(
        persona_service::select_persona(&session, state.backend.as_ref(), &persona_id).await?,
    ))
}

pub async fn export_persona(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<PersonaExport> {
    let session = session(&state, id).await?;
    Ok(Json(persona_service::export_persona(&session, chrono::Utc::now()).await?))
}

pub async fn persona_analyses(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<CampaignAnalysis>> {
    let session = session(&state, id).await?;
    Ok(Json(
        persona_service::persona_analyses(&session, state.backend.as_ref()).await?,
    ))
}

pub async fn analyze_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<CampaignBody>,
) -> ApiResult<CampaignAnalysis> {
    let session = session(&state, id).await?;
    Ok(Json(
        persona_service::analyze_campaign(&session, state.backend.as_ref(), &body.campaign_brief)
            .await?,
    ))
}

pub async fn run_analysis(
    State(state): State<Arc<AppState>>,
    Path((id, endpoint)): Path<(Uuid, String)>,
    Json(body): Json<Value>,
) -> ApiResult<AnalysisOutcome> {
    let endpoint: AnalysisEndpoint = endpoint.parse().map_err(ApiError::BadRequest)?;
    let session = session(&state, id).await?;
    Ok(Json(
        persona_service::run_analysis(&session, state.backend.as_ref(), endpoint, body).await,
    ))
}

pub async fn list_personas(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Persona>> {
    state
        .backend
        .list_personas()
        .await
        .map(Json)
        .map_err(|e| ApiError::Upstream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::backend::fake::FakeBackend;
    use crate::application::clock::SystemClock;
    use crate::application::figure_builders::REGIONS_CHART;
    use crate::application::session::SessionRegistry;
    use crate::domain::scene::ContainerContent;

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            sessions: SessionRegistry::new(Arc::new(SystemClock), Duration::from_secs(3)),
            backend: Arc::new(FakeBackend::failing()),
        })
    }

    #[test]
    fn test_chart_request_parses_family_tag() {
        let request: ChartRequest = serde_json::from_value(json!({
            "chart": "regions",
            "data": { "names": ["Europe", "Asia"], "values": [60, 40] }
        }))
        .unwrap();
        let figure = request.into_figure().unwrap();
        assert_eq!(figure.data.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let result = load_dashboard(State(state()), Path(Uuid::new_v4())).await;
        let response = result.err().unwrap().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_unprocessable_and_shows_placeholder() {
        let state = state();
        let (id, session) = state.sessions.create().await;
        let request = ChartRequest::Regions(RegionsData {
            names: vec!["Europe".to_string()],
            values: vec![],
        });

        let result = render_chart(
            State(state.clone()),
            Path((id, REGIONS_CHART.to_string())),
            Json(request),
        )
        .await;

        let response = result.err().unwrap().into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let session = session.lock().await;
        assert_eq!(
            session.renderer.surface().container(REGIONS_CHART).unwrap().content,
            ContainerContent::Placeholder {
                message: "Invalid chart data".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_render_into_missing_container_is_not_an_error() {
        let state = state();
        let (id, _) = state.sessions.create().await;

        let Json(result) = render_chart(
            State(state),
            Path((id, "nonexistent".to_string())),
            Json(ChartRequest::Regions(RegionsData::default())),
        )
        .await
        .unwrap();

        assert_eq!(
            result,
            RenderResult::MissingContainer {
                container_id: "nonexistent".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_chart_status_reports_drawn_layout() {
        let state = state();
        let (id, _) = state.sessions.create().await;
        render_chart(
            State(state.clone()),
            Path((id, REGIONS_CHART.to_string())),
            Json(ChartRequest::Regions(RegionsData::default())),
        )
        .await
        .unwrap();

        let Json(status) = chart_status(State(state), Path((id, REGIONS_CHART.to_string())))
            .await
            .unwrap();

        assert_eq!(status.state, ChartState::Rendered);
        assert_eq!(status.generation, Some(1));
        let layout = status.layout.unwrap();
        assert!(layout.title_text().is_some());
        assert_eq!(status.realtime.unwrap().interval_ms, 3_000);
    }

    #[tokio::test]
    async fn test_unknown_analysis_endpoint_is_bad_request() {
        let state = state();
        let (id, _) = state.sessions.create().await;

        let result = run_analysis(
            State(state),
            Path((id, "horoscope".to_string())),
            Json(json!({})),
        )
        .await;

        let response = result.err().unwrap().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
