use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use super::{CompletionRequest, CompletionResponse, Provider};

/// Registry of the providers that actually have credentials, in
/// registration order. Providers without a credential are never
/// registered, so they are never attempted.
///
/// Failure is a first-class outcome at this boundary: any provider error
/// (transport, auth, empty completion) is logged and surfaces as `None`,
/// never as an `Err` the pipeline has to handle.
#[derive(Default)]
pub struct LlmClient {
    providers: Vec<Arc<dyn Provider>>,
}

impl LlmClient {
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.push(provider);
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Names of all registered providers, in registration order.
    pub fn available(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    fn get(&self, name: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// Asks one named provider. Unregistered names and provider failures
    /// both come back as `None`.
    pub async fn complete_via(
        &self,
        provider_name: &str,
        req: &CompletionRequest,
    ) -> Option<CompletionResponse> {
        let provider = self.get(provider_name)?;
        self.complete_once(provider.as_ref(), req).await.ok()
    }

    /// Tries providers in the given preference order, skipping any that
    /// are not registered, and returns the first non-empty completion.
    pub async fn complete_first(
        &self,
        preference: &[&str],
        req: &CompletionRequest,
    ) -> Option<CompletionResponse> {
        for name in preference {
            let Some(provider) = self.get(name) else {
                continue;
            };
            if let Ok(resp) = self.complete_once(provider.as_ref(), req).await {
                return Some(resp);
            }
        }
        None
    }

    /// One bounded request to one provider. No retry: a failed call is a
    /// failed call, and the caller decides whether anyone else gets asked.
    async fn complete_once(
        &self,
        provider: &dyn Provider,
        req: &CompletionRequest,
    ) -> anyhow::Result<CompletionResponse> {
        let provider_name = provider.name();
        let start = Instant::now();

        let span = tracing::info_span!(
            "llm.complete",
            llm.provider = %provider_name,
            llm.stage = %req.stage,
            llm.temperature = req.temperature,
            llm.max_tokens = req.max_tokens as i64,
            llm.response.model = tracing::field::Empty,
            llm.response.chars = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        tracing::debug!(
            parent: &span,
            prompt = %truncate(&req.prompt, 500),
            "sending completion request"
        );

        let result = provider.complete(req).instrument(span.clone()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(resp) if resp.content.trim().is_empty() => {
                span.record("error.type", "empty_completion");
                tracing::warn!(
                    provider = provider_name,
                    stage = %req.stage,
                    duration_ms,
                    "provider returned an empty completion"
                );
                Err(anyhow::anyhow!("empty completion from {provider_name}"))
            }
            Ok(resp) => {
                span.record("llm.response.model", resp.model.as_str());
                span.record("llm.response.chars", resp.content.len());
                tracing::debug!(
                    provider = provider_name,
                    stage = %req.stage,
                    duration_ms,
                    completion = %truncate(&resp.content, 500),
                    "completion received"
                );
                Ok(resp)
            }
            Err(err) => {
                span.record("error.type", classify_error(&err));
                tracing::warn!(
                    provider = provider_name,
                    stage = %req.stage,
                    duration_ms,
                    error = %err,
                    "provider call failed"
                );
                Err(err)
            }
        }
    }
}

fn classify_error(err: &anyhow::Error) -> &'static str {
    let msg = err.to_string().to_lowercase();
    if msg.contains("rate limit") || msg.contains("429") {
        "rate_limit"
    } else if msg.contains("timeout") || msg.contains("timed out") || msg.contains("deadline") {
        "timeout"
    } else if msg.contains("401")
        || msg.contains("403")
        || msg.contains("auth")
        || msg.contains("api key")
    {
        "auth_error"
    } else if msg.contains("400") || msg.contains("422") || msg.contains("invalid") {
        "invalid_request"
    } else if msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("server")
    {
        "server_error"
    } else if msg.contains("connect")
        || msg.contains("dns")
        || msg.contains("network")
        || msg.contains("reset")
    {
        "network_error"
    } else if msg.contains("empty completion") {
        "empty_completion"
    } else {
        "unknown_error"
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < max)
            .map(|(_, c)| c)
            .collect()
    }
}
