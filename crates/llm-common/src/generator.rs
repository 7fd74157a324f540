use futures::future::BoxFuture;

use crate::anthropic::{LlmClientError, MessagesRequest, MessagesResponse};

/// Seam between callers and the generative-text backend.
///
/// Production code holds an `Arc<dyn TextGenerator>` backed by
/// [`AnthropicClient`](crate::anthropic::AnthropicClient); tests substitute a fake.
pub trait TextGenerator: Send + Sync {
    fn create_message(
        &self,
        request: MessagesRequest,
    ) -> BoxFuture<'_, Result<MessagesResponse, LlmClientError>>;
}
