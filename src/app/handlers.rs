use crate::app::AppState;
use crate::domain::model::AnalysisReport;
use crate::utils::error::{Result, ReviewError};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

pub const STATUS_MESSAGE: &str = "Resumo Honesto de Reviews API - MVP (até 20 reviews)";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub hotel_name: String,
}

pub async fn index() -> impl IntoResponse {
    Json(json!({ "message": STATUS_MESSAGE }))
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// Body rejections (bad JSON, missing `hotel_name`, wrong content type) are
/// answered as 400 with the usual `detail` body.
pub async fn analyze(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>> {
    let Json(request) = payload.map_err(|rejection| {
        ReviewError::InvalidInput(format!("Pedido inválido: {}", rejection.body_text()))
    })?;
    let report = state.analyzer.analyze(&request.hotel_name).await?;
    Ok(Json(report))
}
