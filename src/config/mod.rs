//! Configuration management for Granske.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts, INSUFFICIENT_CONTEXT_ANSWER};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, FetchSettings, GeneralSettings, PromptSettings,
    RagSettings, SearchSettings, Settings, VectorStoreSettings,
};
