//! Route handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use tracing::info;

use super::dto::{AnalysisResponse, AnalyzeBody, AnalyzeQuery, BatchAnalyzeBody, HealthResponse};
use super::error::ApiError;
use super::state::AppState;
use crate::domain::analysis::{AnalysisId, Transcript};

/// Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /v1/analyze?transcript=...`
pub async fn analyze_query(
    State(state): State<AppState>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Query(query) = query?;
    analyze_and_store(&state, &query.transcript).await.map(Json)
}

/// `POST /v1/analyze`
pub async fn analyze_body(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(body) = body?;
    analyze_and_store(&state, &body.transcript).await.map(Json)
}

/// `GET /v1/analyses/:id`
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    // A malformed id can never have been issued, so it is simply unknown
    let id: AnalysisId = id
        .parse()
        .map_err(|_| ApiError::not_found("Analysis not found"))?;

    let analysis = state
        .repository
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found("Analysis not found"))?;

    Ok(Json(AnalysisResponse::from(&analysis)))
}

/// `POST /v1/analyze/batch`
pub async fn analyze_batch(
    State(state): State<AppState>,
    body: Result<Json<BatchAnalyzeBody>, JsonRejection>,
) -> Result<Json<Vec<AnalysisResponse>>, ApiError> {
    let Json(body) = body?;
    let transcripts: Vec<&str> = body
        .transcripts
        .iter()
        .map(String::as_str)
        .filter(|t| Transcript::is_valid(t))
        .collect();

    if transcripts.is_empty() {
        return Err(ApiError::bad_request(
            "Provide at least one non-empty transcript",
        ));
    }

    let analyses = state.analyzer.analyze_many(&transcripts).await?;

    let mut responses = Vec::with_capacity(analyses.len());
    for analysis in analyses {
        responses.push(AnalysisResponse::from(&analysis));
        state.repository.save(analysis).await;
    }

    info!(
        submitted = body.transcripts.len(),
        analyzed = responses.len(),
        "batch analyzed"
    );
    Ok(Json(responses))
}

async fn analyze_and_store(
    state: &AppState,
    transcript: &str,
) -> Result<AnalysisResponse, ApiError> {
    let analysis = state.analyzer.analyze(transcript).await?;
    let response = AnalysisResponse::from(&analysis);
    state.repository.save(analysis).await;

    info!(id = %response.id, "analysis stored");
    Ok(response)
}
