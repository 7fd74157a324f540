pub mod anthropic;
pub mod generator;

pub use anthropic::{AnthropicClient, AnthropicClientConfig, LlmClientError};
pub use generator::TextGenerator;
