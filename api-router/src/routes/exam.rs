use axum::{extract::State, response::IntoResponse, Json};
use exam_pipeline::{
    evaluator::evaluate_exam_paper,
    generator::generate_exam_paper,
    types::{EvaluationRequest, ExamPaperRequest},
};
use serde_json::json;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

pub async fn generate_paper(
    State(state): State<ApiState>,
    Json(input): Json<ExamPaperRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(subject = %input.subject, "Received exam generation request");

    let exam = generate_exam_paper(
        &state.chunk_store,
        &state.openai_client,
        &state.config,
        &input,
    )
    .await?;

    Ok(Json(json!({
        "message": "Exam paper generated successfully",
        "examPaper": exam,
    })))
}

pub async fn evaluate_exam(
    State(state): State<ApiState>,
    Json(input): Json<EvaluationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = evaluate_exam_paper(
        &state.chunk_store,
        &state.openai_client,
        &state.config,
        &input,
    )
    .await?;

    Ok(Json(json!({
        "message": "Exam evaluated successfully",
        "evaluationResult": result,
    })))
}
