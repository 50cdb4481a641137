use crate::config::Endpoints;
use crate::error::ProviderError;
use crate::http::post_json;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Query};
use reqwest::Client;
use tracing::info;

pub const SYSTEM_PROMPT: &str = "You are Genie, a helpful AI. Provide concise, accurate answers with bullet points when helpful.";
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 300;

pub fn completions_url(endpoints: &Endpoints) -> String {
    format!(
        "{}/chat/completions",
        endpoints.openai_base_url.as_str().trim_end_matches('/')
    )
}

pub fn completion_request<'a>(model: &'a str, query: &'a Query) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: query.as_str(),
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

/// One completion request for `query`; returns the answer text.
pub async fn summarize(
    client: &Client,
    endpoints: &Endpoints,
    query: &Query,
    api_key: &str,
) -> Result<String, ProviderError> {
    info!("AI summary for: {}", query);
    let request = completion_request(&endpoints.openai_model, query);
    let body = post_json(client, &completions_url(endpoints), api_key, &request).await?;

    let response: ChatCompletionResponse = serde_json::from_value(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("completion: {}", e)))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ProviderError::MalformedResponse("completion has no content".to_string()))
}
