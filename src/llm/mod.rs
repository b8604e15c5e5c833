pub mod client;
pub mod openai;
pub mod perplexity;

pub use client::LlmClient;

/// One text-completion request. The model is chosen by the provider
/// adapter, not the caller; from the pipeline's view all providers answer
/// the same request shape.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stage: String,
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub provider: String,
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, req: &CompletionRequest) -> anyhow::Result<CompletionResponse>;
    fn name(&self) -> &str;
}
