// Persona and campaign workflows scoped to a session
use crate::application::backend::{AnalysisEndpoint, BackendError, TasteShiftBackend};
use crate::application::session::SharedSession;
use crate::domain::analysis::{CampaignAnalysis, CampaignRequest, Persona, PersonaRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("generate a persona first")]
    NoPersona,
    #[error("current persona has not been saved by the backend")]
    UnsavedPersona,
    #[error("campaign brief is empty")]
    EmptyBrief,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Downloadable summary of the current persona.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaExport {
    pub title: String,
    pub generated: Option<String>,
    pub description: Option<String>,
    pub exported: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub endpoint: String,
    pub used_fallback: bool,
    pub payload: Value,
}

pub async fn generate_persona(
    session: &SharedSession,
    backend: &dyn TasteShiftBackend,
    request: &PersonaRequest,
) -> Result<Persona, PersonaError> {
    let persona = backend.generate_persona(request).await?;
    tracing::info!("Generated persona for {} / {}", persona.region, persona.demographic);
    session.lock().await.current_persona = Some(persona.clone());
    Ok(persona)
}

/// Make a previously generated persona current.
pub async fn select_persona(
    session: &SharedSession,
    backend: &dyn TasteShiftBackend,
    persona_id: &str,
) -> Result<Persona, PersonaError> {
    let persona = backend.get_persona(persona_id).await?;
    session.lock().await.current_persona = Some(persona.clone());
    Ok(persona)
}

pub async fn analyze_campaign(
    session: &SharedSession,
    backend: &dyn TasteShiftBackend,
    campaign_brief: &str,
) -> Result<CampaignAnalysis, PersonaError> {
    let persona_id = {
        let session = session.lock().await;
        let persona = session.current_persona.as_ref().ok_or(PersonaError::NoPersona)?;
        persona.id.ok_or(PersonaError::UnsavedPersona)?
    };
    let campaign_brief = campaign_brief.trim();
    if campaign_brief.is_empty() {
        return Err(PersonaError::EmptyBrief);
    }

    tracing::info!("Starting campaign analysis for persona {}", persona_id);
    let request = CampaignRequest {
        persona_id,
        campaign_brief: campaign_brief.to_string(),
    };
    Ok(backend.analyze_campaign(&request).await?)
}

/// Campaign analyses previously run against the current persona.
pub async fn persona_analyses(
    session: &SharedSession,
    backend: &dyn TasteShiftBackend,
) -> Result<Vec<CampaignAnalysis>, PersonaError> {
    let persona_id = {
        let session = session.lock().await;
        let persona = session.current_persona.as_ref().ok_or(PersonaError::NoPersona)?;
        persona.id.ok_or(PersonaError::UnsavedPersona)?
    };
    Ok(backend.persona_analyses(persona_id).await?)
}

pub async fn export_persona(session: &SharedSession, now: DateTime<Utc>) -> Result<PersonaExport, PersonaError> {
    let session = session.lock().await;
    let persona = session.current_persona.as_ref().ok_or(PersonaError::NoPersona)?;

    let generated = persona
        .created_at
        .as_deref()
        .and_then(|created| DateTime::parse_from_rfc3339(created).ok())
        .map(|created| created.format("%Y-%m-%d").to_string());

    Ok(PersonaExport {
        title: format!("{} - {}", persona.region, persona.demographic),
        generated,
        description: persona.persona_description.clone(),
        exported: now.to_rfc3339(),
        file_name: format!(
            "persona-{}-{}-{}.json",
            persona.region,
            persona.demographic,
            now.timestamp_millis()
        ),
    })
}

/// Call one of the analysis endpoints, tagging the request with the current
/// persona and substituting demo content when the backend cannot answer.
pub async fn run_analysis(
    session: &SharedSession,
    backend: &dyn TasteShiftBackend,
    endpoint: AnalysisEndpoint,
    mut body: Value,
) -> AnalysisOutcome {
    let persona_id = session
        .lock()
        .await
        .current_persona
        .as_ref()
        .and_then(|p| p.id);
    if let Value::Object(fields) = &mut body {
        fields
            .entry("current_persona")
            .or_insert_with(|| persona_id.map(Value::from).unwrap_or(Value::Null));
    }

    match backend.analyze(endpoint, body).await {
        Ok(payload) => AnalysisOutcome {
            endpoint: endpoint.slug().to_string(),
            used_fallback: false,
            payload,
        },
        Err(e) => {
            tracing::warn!("{} unavailable, using demo content: {}", endpoint, e);
            AnalysisOutcome {
                endpoint: endpoint.slug().to_string(),
                used_fallback: true,
                payload: endpoint.fallback(),
            }
        }
    }
}
