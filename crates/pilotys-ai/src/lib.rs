//! LLM layer: OpenAI/Anthropic providers, prompts, deduplication and the
//! heuristic fallback chain.

mod anthropic;
pub mod config;
mod decode;
mod error;
mod extractor;
mod openai;
pub mod prompts;
mod provider;

pub use anthropic::AnthropicProvider;
pub use config::{LlmConfig, ProviderKind};
pub use decode::parse_analysis;
pub use error::LlmError;
pub use extractor::{Extractor, analyze_meeting, analyze_with_llm};
pub use openai::OpenAiProvider;
pub use provider::{LlmProvider, NullProvider, provider_from_config};
