// src/state.rs
use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::services::chat_engine::{ChatEngine, FunctionCallingEngine};
use crate::services::directory::TherapistDirectory;
use crate::services::llm_client::LlmClient;
use crate::services::tools::{SearchTherapists, ToolRegistry};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub engine: Arc<dyn ChatEngine>,
}

impl AppState {
    pub fn new(engine: impl ChatEngine + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Wire the production collaborators: the completion client, and the
    /// therapist search tool when a directory file is configured.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = LlmClient::from_config(config).context("failed to build completion client")?;

        let mut tools = ToolRegistry::new();
        if let Some(path) = &config.directory_path {
            let directory = TherapistDirectory::load(path)
                .await
                .with_context(|| format!("failed to load {}", path.display()))?;
            tools.register(SearchTherapists::new(Arc::new(directory)));
        }

        Ok(Self::new(FunctionCallingEngine::new(
            client,
            tools,
            config.system_prompt.clone(),
            config.max_tool_rounds,
        )))
    }
}
