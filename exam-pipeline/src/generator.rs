use async_openai::types::{
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
};
use common::{error::AppError, storage::chunk_store::ChunkStore, utils::config::AppConfig};
use retrieval_pipeline::{assemble_context, ContextMode};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    instructions::{
        build_generation_user_message, get_exam_response_schema, EXAM_GENERATION_SYSTEM_MESSAGE,
    },
    types::{ExamPaperRequest, GeneratedExam, SyllabusChapter},
    validator::validate_exam,
};

/// Similar chunks retrieved per syllabus topic.
const RESULTS_PER_TOPIC: usize = 9;
const GENERATION_TEMPERATURE: f32 = 0.5;

/// Generates an exam paper for the requested schema.
///
/// Fails with a validation error before any model call when the syllabus
/// carries no usable topic context. The generated output is checked by the
/// schema validator before being returned; a rejected paper aborts the
/// whole call.
#[instrument(skip_all, fields(subject = %req.subject))]
pub async fn generate_exam_paper(
    store: &ChunkStore,
    openai_client: &async_openai::Client<async_openai::config::OpenAIConfig>,
    config: &AppConfig,
    req: &ExamPaperRequest,
) -> Result<GeneratedExam, AppError> {
    if req.syllabus.is_empty() {
        return Err(AppError::Validation(
            "Syllabus chapters must be provided in the request.".into(),
        ));
    }

    let topics: Vec<String> = req
        .syllabus
        .iter()
        .filter(|chapter| !chapter.important_topics.trim().is_empty())
        .map(|chapter| chapter.important_topics.clone())
        .collect();

    if topics.is_empty() {
        return Err(AppError::Validation(
            "No important topics found in the syllabus chapters.".into(),
        ));
    }

    let context =
        assemble_context(store, &topics, RESULTS_PER_TOPIC, ContextMode::AllHits).await?;

    // Fresh nonce per call so repeated identical requests still produce
    // distinct papers. Carries no meaning beyond that.
    let nonce = Uuid::new_v4().to_string();

    let user_message = build_generation_user_message(
        req,
        &chapter_marks_listing(&req.syllabus),
        &context,
        &nonce,
    );
    debug!(context_bytes = context.len(), "Prepared generation prompt");

    let response_format = ResponseFormat::JsonSchema {
        json_schema: ResponseFormatJsonSchema {
            description: Some("Generated exam paper".into()),
            name: "exam_paper".into(),
            schema: Some(get_exam_response_schema()),
            strict: Some(true),
        },
    };

    let request = CreateChatCompletionRequestArgs::default()
        .model(&config.generation_model)
        .temperature(GENERATION_TEMPERATURE)
        .messages([
            ChatCompletionRequestSystemMessage::from(EXAM_GENERATION_SYSTEM_MESSAGE).into(),
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

    let exam = parse_generated_exam(&content)?;
    validate_exam(&exam, req)?;

    info!(
        mcqs = exam.mcq_questions.len(),
        subjective = exam.subjective_questions.len(),
        coding = exam.coding_questions.len(),
        "Generated exam paper accepted"
    );

    Ok(exam)
}

/// `chapter: marks` lines in syllabus order, for the prompt.
pub(crate) fn chapter_marks_listing(syllabus: &[SyllabusChapter]) -> String {
    syllabus
        .iter()
        .map(|chapter| format!("{}: {}", chapter.chapter, chapter.marks))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fails closed: a response that does not deserialize into the expected
/// shape is an LLM parsing error, never a best-effort guess.
pub(crate) fn parse_generated_exam(content: &str) -> Result<GeneratedExam, AppError> {
    serde_json::from_str::<GeneratedExam>(content)
        .map_err(|e| AppError::LLMParsing(format!("Failed to parse generated exam: {e}")))
}
