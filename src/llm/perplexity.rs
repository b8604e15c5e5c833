use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{CompletionRequest, CompletionResponse, Provider};

/// Perplexity speaks a chat-completions dialect but is called by hand: a
/// raw POST with a bearer token and a JSON body.
pub struct PerplexityProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl PerplexityProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct PerplexityRequest {
    model: String,
    messages: Vec<PerplexityMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct PerplexityMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct PerplexityResponse {
    choices: Vec<PerplexityChoice>,
    model: String,
}

#[derive(Deserialize)]
struct PerplexityChoice {
    message: PerplexityResponseMessage,
}

#[derive(Deserialize)]
struct PerplexityResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct PerplexityError {
    error: PerplexityErrorDetail,
}

#[derive(Deserialize)]
struct PerplexityErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl Provider for PerplexityProvider {
    async fn complete(&self, req: &CompletionRequest) -> anyhow::Result<CompletionResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut messages = Vec::with_capacity(2);
        if !req.system.is_empty() {
            messages.push(PerplexityMessage {
                role: "system".to_string(),
                content: req.system.clone(),
            });
        }
        messages.push(PerplexityMessage {
            role: "user".to_string(),
            content: req.prompt.clone(),
        });

        let body = PerplexityRequest {
            model: self.model.clone(),
            messages,
            temperature: req.temperature,
        };

        let response = self
            .client
            .post("https://api.perplexity.ai/chat/completions")
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<PerplexityError>(&error_body) {
                return Err(anyhow::anyhow!(
                    "Perplexity API error ({}): {}",
                    status,
                    err.error.message
                ));
            }
            return Err(anyhow::anyhow!(
                "Perplexity API error ({}): {}",
                status,
                error_body
            ));
        }

        let resp: PerplexityResponse = response.json().await?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: resp.model,
            provider: "perplexity".to_string(),
        })
    }

    fn name(&self) -> &str {
        "perplexity"
    }
}
