pub mod judge;
pub mod level;
pub mod questions;

pub use level::FALLBACK_LEVEL;
pub use questions::{FALLBACK_QUESTIONS, generate_questions};

use crate::classes::{ClassTable, DEFAULT_CLASS};
use crate::llm::LlmClient;
use crate::stats::{StatVector, combine_or_empty, combine_or_zero};

/// Everything the final sheet needs: the averaged stats, the matched
/// starting class, and the soul level.
#[derive(Debug, Clone)]
pub struct FinalResult {
    pub stats: StatVector,
    pub class_name: String,
    pub level: u32,
    /// How many questions produced at least one judgment.
    pub judged_questions: usize,
}

/// Runs the judgment half of the session: every registered provider votes
/// on every answer, votes are averaged per question and then across
/// questions, the class is matched and the soul level derived.
///
/// Provider failure never escalates past here. With no judgments at all
/// the result degrades to a zeroed sheet, the default class, and the
/// fallback level.
#[tracing::instrument(
    name = "pipeline forge",
    skip(llm, table, initial_statement, answers),
    fields(
        forge.questions = answers.len(),
        forge.judged_questions,
        forge.class,
        forge.level,
    )
)]
pub async fn forge_character(
    llm: &LlmClient,
    table: &ClassTable,
    initial_statement: &str,
    answers: &[(String, String)],
) -> FinalResult {
    let providers = llm.available();

    let mut per_question = Vec::with_capacity(answers.len());
    for (question, answer) in answers {
        let mut votes = Vec::with_capacity(providers.len());
        for provider in &providers {
            if let Some(judgment) = judge::judge_answer(llm, question, answer, provider).await {
                votes.push(judgment);
            }
        }

        tracing::info!(
            question = %question,
            votes = votes.len(),
            providers = providers.len(),
            "question judged"
        );

        // A question nobody judged contributes nothing; pushing the
        // zero-filled shape here would drag the averages down.
        if !votes.is_empty() {
            per_question.push(combine_or_zero(&votes));
        }
    }

    let judged_questions = per_question.len();
    let (stats, class_name) = match combine_or_empty(&per_question) {
        Some(stats) => {
            let class_name = table.match_class(&stats).to_string();
            (stats, class_name)
        }
        // No judgment anywhere: don't match a zero vector, take the
        // documented default class outright.
        None => (StatVector::zeroed(), DEFAULT_CLASS.to_string()),
    };

    let level = level::derive_level(llm, initial_statement, answers).await;

    let span = tracing::Span::current();
    span.record("forge.judged_questions", judged_questions);
    span.record("forge.class", class_name.as_str());
    span.record("forge.level", level);

    FinalResult {
        stats,
        class_name,
        level,
        judged_questions,
    }
}
