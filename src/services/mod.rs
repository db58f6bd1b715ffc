pub mod chat_engine;
pub mod clock;
pub mod directory;
pub mod llm_client;
pub mod tools;
