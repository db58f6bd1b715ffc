use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, Role},
    services::{chat_engine::determine_assistant_tool_messages, clock::current_epoch_time},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let request: ChatRequest =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;

    let messages = state.engine.chat_function_call(&request.message).await?;
    debug!(?messages, "messages");

    let (bot_message, tool_message) = determine_assistant_tool_messages(&messages)?;
    debug!(%bot_message, "bot message");
    debug!(%tool_message, "tool message");

    Ok(Json(ChatResponse {
        chat_id: request.chat_id.to_string(),
        timestamp: current_epoch_time(),
        content: bot_message,
        role: Role::Assistant,
        source_documents: tool_message,
        audio_file_url: None,
    }))
}
