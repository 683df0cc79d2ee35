use async_openai::types::{
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequestArgs,
};
use common::error::AppError;
use tracing::debug;

/// Returned when the model produces nothing usable. Downstream consumers
/// treat the whole summary as opaque text, so the sentinel is just another
/// value to them.
pub const NO_TOPICS_SENTINEL: &str = "No important topics found.";

const TOPIC_SYSTEM_MESSAGE: &str = "You are an expert question paper maker who identifies important topics from academic notes. \
Analyze the provided content and extract the 3-6 most important topics. \
Each topic must include a short heading and a brief 1-2 line description. \
Return only a plain string with one topic per line; no additional text or formatting.";

/// Asks the topic model for a short "important topics" summary of the
/// ingested document. Free text, no schema; an empty answer maps to
/// [`NO_TOPICS_SENTINEL`].
pub async fn find_important_topics(
    openai_client: &async_openai::Client<async_openai::config::OpenAIConfig>,
    model: &str,
    document: &str,
) -> Result<String, AppError> {
    let request = CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages([
            ChatCompletionRequestSystemMessage::from(TOPIC_SYSTEM_MESSAGE).into(),
            ChatCompletionRequestUserMessage::from(format!("Content:\n{document}")).into(),
        ])
        .build()?;

    let response = openai_client.chat().create(request).await?;

    let summary = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();
    let summary = summary.trim();

    if summary.is_empty() {
        debug!("Topic extraction produced no output; using sentinel");
        return Ok(NO_TOPICS_SENTINEL.to_string());
    }

    Ok(summary.to_string())
}
