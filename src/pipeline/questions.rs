use crate::llm::{CompletionRequest, LlmClient};

/// Asked verbatim when every provider fails or nothing in the reply
/// qualifies as a question.
pub const FALLBACK_QUESTIONS: [&str; 7] = [
    "Do you have a cat?",
    "When did you last eat pickles?",
    "Have you ever talked to a houseplant?",
    "Do you prefer stairs or elevators?",
    "What's your favorite type of cheese?",
    "How much is too much when buying underwear?",
    "When did you last find money on the floor?",
];

const QUESTION_PROVIDERS: [&str; 3] = ["gemini", "openai", "deepseek"];

/// Generates up to `count` quirky interview questions, riffing on the
/// user's opening statement. Always returns at least one question: the
/// first provider with a usable reply wins, and the fixed fallback list
/// covers a total blackout.
#[tracing::instrument(
    name = "stage questions",
    skip(llm, initial_statement),
    fields(questions.count, questions.fallback)
)]
pub async fn generate_questions(
    llm: &LlmClient,
    initial_statement: &str,
    count: usize,
) -> Vec<String> {
    let prompt = format!(
        "Generate {count} quirky, fun, and seemingly irrelevant questions for the Bearer of the Curse, \
        who described their life like this: \"{initial_statement}\"\n\n\
        The questions should be unexpected and playful, like:\n\
        - \"Do you have a cat?\"\n\
        - \"When did you last eat pickles?\"\n\
        - \"Have you ever talked to a houseplant?\"\n\
        - \"Do you prefer stairs or elevators?\"\n\
        - \"How much is too much when buying underwear?\"\n\
        - \"When did you last find money on the floor?\"\n\n\
        Make them answerable in 1-2 sentences. Return only the questions, one per line."
    );

    let req = CompletionRequest {
        system: String::new(),
        prompt,
        temperature: 0.9,
        max_tokens: 512,
        stage: "questions".to_string(),
    };

    let span = tracing::Span::current();

    if let Some(resp) = llm.complete_first(&QUESTION_PROVIDERS, &req).await {
        let questions = parse_questions(&resp.content, count);
        if !questions.is_empty() {
            span.record("questions.count", questions.len());
            span.record("questions.fallback", false);
            return questions;
        }
        tracing::warn!(
            provider = %resp.provider,
            "completion contained no questions, using fallback list"
        );
    }

    span.record("questions.count", FALLBACK_QUESTIONS.len());
    span.record("questions.fallback", true);
    FALLBACK_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

/// Keeps the lines that look like questions: trimmed, non-empty,
/// containing a `?`, capped at `count`.
fn parse_questions(content: &str, count: usize) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains('?'))
        .map(str::to_string)
        .take(count)
        .collect()
}
