use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod classes;
mod config;
mod error;
mod llm;
mod pipeline;
mod sheet;
mod stats;

use classes::ClassTable;
use config::Config;
use error::AppResult;
use llm::LlmClient;
use llm::openai::OpenAIProvider;
use llm::perplexity::PerplexityProvider;

#[derive(Parser, Debug)]
#[command(name = "soulsheet", about = "Dark Souls 2 character sheet, judged by a panel of LLMs")]
struct Args {
    /// Number of interview questions to generate
    #[arg(long, default_value_t = 5)]
    questions: usize,

    /// Path to a class table overriding the built-in one
    #[arg(long)]
    class_table: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("soulsheet=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    let llm_client = build_llm_client(&config);

    println!("╔══════════════════════════════════════╗");
    println!("║     DARK SOULS 2 STAT GENERATOR      ║");
    println!("║        Bearer of the Curse           ║");
    println!("╚══════════════════════════════════════╝");
    println!();

    if llm_client.is_empty() {
        println!("⚠ No AI API keys found. The panel is empty; every judgment");
        println!("  will fall back to its default. Set at least one of:");
        println!("  OPENAI_API_KEY, DEEPSEEK_API_KEY, GOOGLE_API_KEY, PERPLEXITY_API_KEY");
        tracing::warn!("no provider credentials configured, running degraded");
    } else {
        println!(
            "🤖 Available AI APIs: {}",
            llm_client.available().join(", ").to_uppercase()
        );
    }
    println!();

    let table_path = args.class_table.or(config.class_table_path.clone());
    let table = ClassTable::load(table_path.as_deref());
    if table.is_empty() {
        tracing::warn!("class table is empty, the default class will be used");
    } else {
        tracing::debug!(classes = table.len(), "class table loaded");
    }

    let initial_statement =
        prompt_line("Describe your current life situation or a recent significant event: ")?;
    if initial_statement.is_empty() {
        // The one early ending: nothing to judge.
        println!("...");
        return Ok(());
    }

    println!("\n🔮 Analyzing your essence: '{initial_statement}'");
    println!("🎲 Generating questions...");

    let questions =
        pipeline::generate_questions(&llm_client, &initial_statement, args.questions).await;

    println!(
        "\n📝 Bearer of the curse, if you are to be the next monarch, answer these {} questions:",
        questions.len()
    );
    println!("{}", "=".repeat(60));

    let mut answers = Vec::with_capacity(questions.len());
    for (i, question) in questions.iter().enumerate() {
        println!("\n{}. {question}", i + 1);
        let answer = prompt_line("Your answer: ")?;
        let answer = if answer.is_empty() {
            "No response".to_string()
        } else {
            answer
        };
        answers.push((question.clone(), answer));
    }

    println!("\n{}", "=".repeat(60));
    println!(
        "🧙 Like a moth drawn to a flame, your wings will burn in anguish. \
        Time after time. For that is your fate. The fate of the cursed."
    );
    println!("{}", "=".repeat(60));
    println!("\n🔮 The panel is deliberating...");

    let result = pipeline::forge_character(&llm_client, &table, &initial_statement, &answers).await;

    if result.judged_questions == 0 {
        println!("\n❌ No judgment could be obtained; your sheet is forged from defaults.");
    }

    println!("\n{}", "=".repeat(60));
    println!("🎉 YOUR DARK SOULS 2 CHARACTER HAS BEEN FORGED!");
    println!("{}", "=".repeat(60));
    println!("{}", sheet::render(&result, &table));
    println!("\n{}", "=".repeat(60));
    println!("✨ Young Hollow, knowing this, do you still desire peace? ✨");
    println!("{}", "=".repeat(60));

    Ok(())
}

/// Registers one adapter per configured credential. A provider without a
/// key is never constructed, so it can never be called.
fn build_llm_client(config: &Config) -> LlmClient {
    let mut client = LlmClient::default();

    if let Some(key) = &config.openai_api_key {
        client.register(Arc::new(OpenAIProvider::new(key, &config.openai_model)));
    }
    if let Some(key) = &config.deepseek_api_key {
        client.register(Arc::new(OpenAIProvider::new_deepseek(
            key,
            &config.deepseek_model,
        )));
    }
    if let Some(key) = &config.google_api_key {
        client.register(Arc::new(OpenAIProvider::new_gemini(
            key,
            &config.gemini_model,
        )));
    }
    if let Some(key) = &config.perplexity_api_key {
        client.register(Arc::new(PerplexityProvider::new(
            key,
            &config.perplexity_model,
        )));
    }

    tracing::info!(providers = ?client.available(), "LLM panel assembled");
    client
}

fn prompt_line(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
