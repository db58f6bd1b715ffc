// src/services/chat_engine.rs
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::{llm_client::CompletionClient, tools::ToolRegistry};
use crate::{
    error::AppError,
    message::{ChatMessage, Role},
};

/// Produces the conversation for a single user message.
#[async_trait]
pub trait ChatEngine: Send + Sync {
    async fn chat_function_call(&self, user_msg: &str) -> Result<Vec<ChatMessage>, AppError>;
}

/// Runs a function-calling loop: the model may request tools, their results
/// are appended, and the model is asked again until it answers in text.
pub struct FunctionCallingEngine<C> {
    client: C,
    tools: ToolRegistry,
    system_prompt: String,
    max_tool_rounds: usize,
}

impl<C: CompletionClient> FunctionCallingEngine<C> {
    pub fn new(client: C, tools: ToolRegistry, system_prompt: impl Into<String>, max_tool_rounds: usize) -> Self {
        Self {
            client,
            tools,
            system_prompt: system_prompt.into(),
            max_tool_rounds,
        }
    }
}

#[async_trait]
impl<C: CompletionClient> ChatEngine for FunctionCallingEngine<C> {
    async fn chat_function_call(&self, user_msg: &str) -> Result<Vec<ChatMessage>, AppError> {
        let definitions = self.tools.definitions();
        let mut messages = vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(user_msg),
        ];

        // One initial completion plus one per tool round.
        for round in 0..=self.max_tool_rounds {
            let reply = self.client.complete(&messages, &definitions).await?;
            let calls = reply.requested_tools().to_vec();
            messages.push(reply);

            if calls.is_empty() {
                return Ok(messages);
            }
            if round == self.max_tool_rounds {
                break;
            }

            for call in calls {
                info!(tool = %call.function.name, round, "model requested tool");
                let result = self.tools.dispatch(&call.function.name, &call.function.arguments);
                messages.push(ChatMessage::tool(call.id, result.to_string()));
            }
        }

        Err(AppError::Collaborator(format!(
            "model still requesting tools after {} rounds",
            self.max_tool_rounds
        )))
    }
}

/// Split a conversation into the assistant's final reply and the collected
/// tool results.
///
/// The reply is the last assistant message with non-empty content. Tool
/// results are returned as a JSON array in call order; contents that are not
/// valid JSON are kept as strings. An empty array means no tool ran.
pub fn determine_assistant_tool_messages(messages: &[ChatMessage]) -> Result<(String, Value), AppError> {
    let bot_message = messages
        .iter()
        .rev()
        .filter(|m| m.role == Role::Assistant)
        .find_map(|m| m.content.as_deref().filter(|c| !c.trim().is_empty()))
        .ok_or_else(|| AppError::Collaborator("no assistant reply in conversation".to_string()))?
        .to_string();

    let tool_results: Vec<Value> = messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .map(|m| {
            let raw = m.content.as_deref().unwrap_or_default();
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        })
        .collect();

    debug!(tool_results = tool_results.len(), "split assistant and tool messages");
    Ok((bot_message, Value::Array(tool_results)))
}
