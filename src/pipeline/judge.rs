use serde::Deserialize;

use crate::llm::{CompletionRequest, LlmClient};
use crate::stats::{Attribute, StatVector};

/// Asks one named provider to judge a single question/answer pair as a
/// full stat vector. Any deviation from the expected reply shape counts
/// as a failed judgment for that provider, never a partial one.
pub async fn judge_answer(
    llm: &LlmClient,
    question: &str,
    answer: &str,
    provider_name: &str,
) -> Option<StatVector> {
    let system = "You are an expert at assigning Dark Souls 2 stats based on personality \
        insights. Address the user as 'Bearer of the Curse'."
        .to_string();

    let prompt = format!(
        "Bearer of the Curse answered: \"{answer}\" to the question: \"{question}\"\n\n\
        Based on this response, assign Dark Souls 2 stats with values between 1-99. \
        Consider what this reveals about their character, personality, and life approach.\n\n\
        Stats to assign:\n\
        - Vigor (health/vitality)\n\
        - Endurance (stamina/persistence)\n\
        - Vitality (equipment load/burden capacity)\n\
        - Attunement (magic slots/spiritual awareness)\n\
        - Strength (physical power)\n\
        - Dexterity (agility/finesse)\n\
        - Adaptability (flexibility/learning)\n\
        - Intelligence (analytical thinking)\n\
        - Faith (belief/trust)\n\n\
        Return ONLY a JSON object in this exact format:\n\
        {{\"Vigor\": 25, \"Endurance\": 30, \"Vitality\": 20, \"Attunement\": 15, \
        \"Strength\": 35, \"Dexterity\": 40, \"Adaptability\": 25, \"Intelligence\": 45, \
        \"Faith\": 30}}"
    );

    let req = CompletionRequest {
        system,
        prompt,
        temperature: 0.7,
        max_tokens: 256,
        stage: "judge".to_string(),
    };

    let resp = llm.complete_via(provider_name, &req).await?;
    let judgment = parse_judgment(&resp.content);
    if judgment.is_none() {
        tracing::warn!(
            provider = provider_name,
            "judgment reply did not decode as a full stat vector"
        );
    }
    judgment
}

#[derive(Deserialize)]
struct RawJudgment {
    #[serde(rename = "Vigor")]
    vigor: u32,
    #[serde(rename = "Endurance")]
    endurance: u32,
    #[serde(rename = "Vitality")]
    vitality: u32,
    #[serde(rename = "Attunement")]
    attunement: u32,
    #[serde(rename = "Strength")]
    strength: u32,
    #[serde(rename = "Dexterity")]
    dexterity: u32,
    #[serde(rename = "Adaptability")]
    adaptability: u32,
    #[serde(rename = "Intelligence")]
    intelligence: u32,
    #[serde(rename = "Faith")]
    faith: u32,
}

impl From<RawJudgment> for StatVector {
    fn from(raw: RawJudgment) -> Self {
        [
            (Attribute::Vigor, raw.vigor),
            (Attribute::Endurance, raw.endurance),
            (Attribute::Vitality, raw.vitality),
            (Attribute::Attunement, raw.attunement),
            (Attribute::Strength, raw.strength),
            (Attribute::Dexterity, raw.dexterity),
            (Attribute::Adaptability, raw.adaptability),
            (Attribute::Intelligence, raw.intelligence),
            (Attribute::Faith, raw.faith),
        ]
        .into_iter()
        .collect()
    }
}

/// Best-effort extraction from free text: the substring from the first
/// `{` to the last `}` must decode as an object carrying all nine
/// attributes. Missing keys reject the judgment; extra keys are ignored.
fn parse_judgment(content: &str) -> Option<StatVector> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }

    serde_json::from_str::<RawJudgment>(&content[start..=end])
        .ok()
        .map(StatVector::from)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm::client::tests::FakeProvider;

    const FULL_JUDGMENT: &str = r#"{"Vigor": 25, "Endurance": 30, "Vitality": 20,
        "Attunement": 15, "Strength": 35, "Dexterity": 40, "Adaptability": 25,
        "Intelligence": 45, "Faith": 30}"#;

    #[test]
    fn test_parse_judgment_plain_json() {
        let stats = parse_judgment(FULL_JUDGMENT).unwrap();
        assert_eq!(stats.get(Attribute::Vigor), 25);
        assert_eq!(stats.get(Attribute::Intelligence), 45);
        assert_eq!(stats.get(Attribute::Faith), 30);
    }

    #[test]
    fn test_parse_judgment_embedded_in_chatter() {
        let content = format!(
            "Very well, Bearer of the Curse. Here is my judgment:\n{FULL_JUDGMENT}\nMay it serve you."
        );
        let stats = parse_judgment(&content).unwrap();
        assert_eq!(stats.get(Attribute::Dexterity), 40);
    }

    #[test]
    fn test_parse_judgment_missing_key_is_rejected() {
        let content = r#"{"Vigor": 25, "Endurance": 30}"#;
        assert!(parse_judgment(content).is_none());
    }

    #[test]
    fn test_parse_judgment_extra_keys_are_ignored() {
        let content = FULL_JUDGMENT.replace(
            "\"Faith\": 30}",
            "\"Faith\": 30, \"Humanity\": 1}",
        );
        assert!(parse_judgment(&content).is_some());
    }

    #[test]
    fn test_parse_judgment_no_braces() {
        assert!(parse_judgment("I cannot judge this soul.").is_none());
    }

    #[test]
    fn test_parse_judgment_reversed_braces() {
        assert!(parse_judgment("} backwards {").is_none());
    }

    #[test]
    fn test_parse_judgment_malformed_json() {
        assert!(parse_judgment("{\"Vigor\": not a number}").is_none());
    }

    #[tokio::test]
    async fn test_judge_answer_success() {
        let mut client = LlmClient::default();
        client.register(Arc::new(FakeProvider::replying("openai", FULL_JUDGMENT)));

        let stats = judge_answer(&client, "Do you have a cat?", "Two of them.", "openai")
            .await
            .unwrap();
        assert_eq!(stats.get(Attribute::Strength), 35);
    }

    #[tokio::test]
    async fn test_judge_answer_unknown_provider_is_absent() {
        let client = LlmClient::default();
        assert!(
            judge_answer(&client, "Do you have a cat?", "No response", "gemini")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_judge_answer_unparsable_reply_is_absent() {
        let mut client = LlmClient::default();
        client.register(Arc::new(FakeProvider::replying("gemini", "forty-two")));
        assert!(
            judge_answer(&client, "Is soup a drink?", "Sometimes.", "gemini")
                .await
                .is_none()
        );
    }
}
