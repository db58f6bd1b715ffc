// src/services/tools.rs
use std::{collections::BTreeMap, fmt::Debug, sync::Arc};

use serde_json::{Value, json};
use tracing::{debug, warn};

use super::directory::{TherapistDirectory, TherapistQuery};
use crate::error::AppError;

/// A capability the model may invoke through function calling.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;
    fn call(&self, args: Value) -> Result<Value, AppError>;
}

#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    /// Tool definitions in the chat-completions `tools` format.
    pub fn definitions(&self) -> Vec<Value> {
        self.tools
            .values()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.parameters(),
                    }
                })
            })
            .collect()
    }

    /// Run a tool by name. Failures come back as `{"error": ..}` so the model
    /// can see them and recover.
    pub fn dispatch(&self, name: &str, raw_arguments: &str) -> Value {
        let Some(tool) = self.tools.get(name) else {
            warn!(tool = name, "model requested an unknown tool");
            return json!({ "error": format!("unknown tool: {}", name) });
        };

        let args = if raw_arguments.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(raw_arguments) {
                Ok(args) => args,
                Err(e) => {
                    warn!(tool = name, "invalid tool arguments: {}", e);
                    return json!({ "error": format!("invalid arguments for {}: {}", name, e) });
                }
            }
        };

        debug!(tool = name, %args, "dispatching tool call");
        match tool.call(args) {
            Ok(result) => result,
            Err(e) => json!({ "error": e.to_string() }),
        }
    }
}

/// Searches the therapist directory; results surface as source documents.
#[derive(Debug, Clone)]
pub struct SearchTherapists {
    directory: Arc<TherapistDirectory>,
}

impl SearchTherapists {
    pub const NAME: &'static str = "search_therapists";

    pub fn new(directory: Arc<TherapistDirectory>) -> Self {
        Self { directory }
    }
}

impl Tool for SearchTherapists {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Find therapists in the directory by specialty, location, language, or online availability."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "specialty": { "type": "string", "description": "Area of focus, e.g. anxiety or trauma" },
                "location": { "type": "string", "description": "City or country" },
                "language": { "type": "string", "description": "Language spoken in sessions" },
                "available_online": { "type": "boolean" },
                "limit": { "type": "integer", "minimum": 1, "maximum": 20 }
            }
        })
    }

    fn call(&self, args: Value) -> Result<Value, AppError> {
        let query: TherapistQuery = serde_json::from_value(args)
            .map_err(|e| AppError::Validation(format!("invalid search_therapists arguments: {}", e)))?;
        let hits = self.directory.search(&query);
        serde_json::to_value(hits).map_err(|e| AppError::Collaborator(e.to_string()))
    }
}
