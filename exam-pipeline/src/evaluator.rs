use async_openai::types::{
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
};
use common::{error::AppError, storage::chunk_store::ChunkStore, utils::config::AppConfig};
use retrieval_pipeline::{assemble_context, ContextMode};
use tracing::{info, instrument};

use crate::{
    instructions::{
        build_evaluation_user_message, get_evaluation_response_schema,
        EXAM_EVALUATION_SYSTEM_MESSAGE,
    },
    types::{EvaluationRequest, EvaluationResult, QuestionEvaluation, SubmittedAnswer},
};

/// Search width per question; only the closest hit feeds the context.
const RESULTS_PER_QUESTION: usize = 4;
const EVALUATION_TEMPERATURE: f32 = 0.3;

/// Grades a submitted answer sheet.
///
/// Either answer list may be empty. The grading policy (mark bounds, zero
/// for missing or irrelevant answers, partial credit for correct logic with
/// broken syntax) travels in the prompt; the one bound enforced here is the
/// post-parse clamp of awarded marks to each question's maximum.
#[instrument(skip_all, fields(
    subjective = req.subjective_answers.len(),
    code = req.code_answers.len()
))]
pub async fn evaluate_exam_paper(
    store: &ChunkStore,
    openai_client: &async_openai::Client<async_openai::config::OpenAIConfig>,
    config: &AppConfig,
    req: &EvaluationRequest,
) -> Result<EvaluationResult, AppError> {
    let code_questions: Vec<String> = req
        .code_answers
        .iter()
        .map(|answer| answer.question.clone())
        .collect();
    let subjective_questions: Vec<String> = req
        .subjective_answers
        .iter()
        .map(|answer| answer.question.clone())
        .collect();

    let code_context = assemble_context(
        store,
        &code_questions,
        RESULTS_PER_QUESTION,
        ContextMode::TopHit,
    )
    .await?;
    let subjective_context = assemble_context(
        store,
        &subjective_questions,
        RESULTS_PER_QUESTION,
        ContextMode::TopHit,
    )
    .await?;

    let user_message = build_evaluation_user_message(req, &code_context, &subjective_context);

    let response_format = ResponseFormat::JsonSchema {
        json_schema: ResponseFormatJsonSchema {
            description: Some("Per-question marks and overall feedback".into()),
            name: "exam_evaluation".into(),
            schema: Some(get_evaluation_response_schema()),
            strict: Some(true),
        },
    };

    let request = CreateChatCompletionRequestArgs::default()
        .model(&config.evaluation_model)
        .temperature(EVALUATION_TEMPERATURE)
        .messages([
            ChatCompletionRequestSystemMessage::from(EXAM_EVALUATION_SYSTEM_MESSAGE).into(),
            ChatCompletionRequestUserMessage::from(user_message).into(),
        ])
        .response_format(response_format)
        .build()?;

    let response = openai_client.chat().create(request).await?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(AppError::LLMParsing(
            "No content found in LLM response".into(),
        ))?;

    let mut result = parse_evaluation(&content)?;
    clamp_awarded_marks(&mut result, req);

    info!(category = ?result.other.category, "Evaluation complete");

    Ok(result)
}

/// Fails closed on malformed grading output.
pub(crate) fn parse_evaluation(content: &str) -> Result<EvaluationResult, AppError> {
    serde_json::from_str::<EvaluationResult>(content)
        .map_err(|e| AppError::LLMParsing(format!("Failed to parse evaluation: {e}")))
}

/// The grading model is instructed to stay within each question's maximum,
/// but its output is not trusted: awarded marks are clamped to the maximum
/// of the matching submitted question before results leave the pipeline.
pub(crate) fn clamp_awarded_marks(result: &mut EvaluationResult, req: &EvaluationRequest) {
    clamp_against(&mut result.code, &req.code_answers);
    clamp_against(&mut result.subjective, &req.subjective_answers);
}

fn clamp_against(evaluations: &mut [QuestionEvaluation], answers: &[SubmittedAnswer]) {
    for evaluation in evaluations {
        let max = answers
            .iter()
            .find(|answer| answer.question_id == evaluation.question_id)
            .map(|answer| answer.marks);
        if let Some(max) = max {
            evaluation.marks_awarded = evaluation.marks_awarded.min(max);
        }
    }
}
