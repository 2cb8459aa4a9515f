pub mod openai;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

pub use openai::OpenAiProvider;
pub use types::*;

/// Shown to the visitor whenever the completion endpoint cannot answer.
pub const APOLOGY: &str = "I'm having trouble connecting to my knowledge base right now. Please try again later or contact us directly at (949) 555-1234.";

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

/// Chat-completion collaborator for the site assistant.
///
/// Never fails: any provider error is logged and replaced by [`APOLOGY`].
#[derive(Clone)]
pub struct ChatCompletionClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
    system_prompt: String,
    max_tokens: u32,
}

impl ChatCompletionClient {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            system_prompt: system_prompt.into(),
            max_tokens,
        }
    }

    pub async fn generate_reply(&self, messages: &[CompletionMessage]) -> String {
        let request = CompletionRequest {
            model: self.model.clone(),
            system: Some(self.system_prompt.clone()),
            messages: messages.to_vec(),
            max_tokens: self.max_tokens,
        };

        match self.provider.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "chat completion failed");
                APOLOGY.to_string()
            }
        }
    }
}
