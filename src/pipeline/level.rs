use crate::llm::{CompletionRequest, LlmClient};

/// Level reported when no provider can weigh the soul.
pub const FALLBACK_LEVEL: u32 = 15;

const LEVEL_PROVIDERS: [&str; 2] = ["gemini", "openai"];

/// Derives the soul level from the whole narrative. The first provider
/// to answer wins; its reply only needs to contain a run of digits
/// somewhere. Always returns a value in 1..=100.
#[tracing::instrument(
    name = "stage level",
    skip(llm, initial_statement, answers),
    fields(level.value, level.fallback)
)]
pub async fn derive_level(
    llm: &LlmClient,
    initial_statement: &str,
    answers: &[(String, String)],
) -> u32 {
    let mut context = format!("Initial Statement: {initial_statement}\n\n");
    for (question, answer) in answers {
        context.push_str(&format!("Q: {question}\nA: {answer}\n\n"));
    }

    let prompt = format!(
        "You are a wise, ancient being judging the soul of the Bearer of the Curse.\n\
        Based on the following life summary, determine their Soul Level.\n\n\
        Consider these factors:\n\
        - Happiness and well-being: Happier, more content individuals should have a higher level.\n\
        - Strength and resilience: Answers showing strength or overcoming adversity should result in a higher level.\n\
        - Weakness and sadness: Answers that seem weak, sad, or resigned should result in a lower level.\n\
        - Apathy or lack of detail: Non-answers or very short answers might indicate a lower level of engagement with life.\n\n\
        The level should be between 1 and 100. A completely average person might be level 20-30. \
        A truly exceptional and self-actualized person might be level 70+. \
        Someone struggling deeply might be level 5-10.\n\n\
        Life Summary:\n---\n{context}---\n\n\
        Based on this, what is their Soul Level? Return ONLY the integer number. For example: 25"
    );

    let req = CompletionRequest {
        system: String::new(),
        prompt,
        temperature: 0.5,
        max_tokens: 64,
        stage: "level".to_string(),
    };

    let span = tracing::Span::current();

    let level = match llm.complete_first(&LEVEL_PROVIDERS, &req).await {
        Some(resp) => parse_level(&resp.content),
        None => None,
    };

    match level {
        Some(level) => {
            span.record("level.value", level);
            span.record("level.fallback", false);
            level
        }
        None => {
            span.record("level.value", FALLBACK_LEVEL);
            span.record("level.fallback", true);
            FALLBACK_LEVEL
        }
    }
}

/// First run of decimal digits anywhere in the text, clamped to 1..=100.
fn parse_level(content: &str) -> Option<u32> {
    let run: String = content
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if run.is_empty() {
        return None;
    }

    // A run too long for u64 is still far above the cap.
    let value = run.parse::<u64>().unwrap_or(u64::MAX);
    Some(value.clamp(1, 100) as u32)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm::client::tests::FakeProvider;

    #[test]
    fn test_parse_level_bare_number() {
        assert_eq!(parse_level("42"), Some(42));
    }

    #[test]
    fn test_parse_level_first_digit_run_wins() {
        assert_eq!(parse_level("Soul Level: 42 (confidence 90%)"), Some(42));
    }

    #[test]
    fn test_parse_level_clamps_low() {
        assert_eq!(parse_level("Your soul is worth 0."), Some(1));
    }

    #[test]
    fn test_parse_level_clamps_high() {
        assert_eq!(parse_level("Level 9001, easily."), Some(100));
    }

    #[test]
    fn test_parse_level_huge_digit_run() {
        assert_eq!(parse_level("999999999999999999999999999"), Some(100));
    }

    #[test]
    fn test_parse_level_no_digits() {
        assert_eq!(parse_level("An unknowable soul."), None);
        assert_eq!(parse_level(""), None);
    }

    #[tokio::test]
    async fn test_derive_level_in_range_for_any_reply() {
        for reply in ["17", "level unclear", "maybe -5?", "666 or so"] {
            let mut client = LlmClient::default();
            client.register(Arc::new(FakeProvider::replying("gemini", reply)));
            let level = derive_level(&client, "statement", &[]).await;
            assert!((1..=100).contains(&level), "reply {reply:?} gave {level}");
        }
    }

    #[tokio::test]
    async fn test_derive_level_fallback_when_no_providers() {
        let client = LlmClient::default();
        let answers = vec![("Q?".to_string(), "A".to_string())];
        assert_eq!(derive_level(&client, "statement", &answers).await, FALLBACK_LEVEL);
    }

    #[tokio::test]
    async fn test_derive_level_prefers_gemini_over_openai() {
        let gemini = Arc::new(FakeProvider::replying("gemini", "30"));
        let openai = Arc::new(FakeProvider::replying("openai", "90"));
        let mut client = LlmClient::default();
        client.register(openai.clone());
        client.register(gemini.clone());

        let level = derive_level(&client, "statement", &[]).await;
        assert_eq!(level, 30);
        assert_eq!(openai.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
