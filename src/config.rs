use std::env;
use std::path::PathBuf;

/// Process configuration, built once in `main` and passed down. Nothing
/// else in the crate reads the environment; tests construct this struct
/// directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub openai_model: String,
    pub deepseek_model: String,
    pub gemini_model: String,
    pub perplexity_model: String,
    pub class_table_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            deepseek_api_key: env::var("DEEPSEEK_API_KEY").ok(),
            google_api_key: env::var("GOOGLE_API_KEY").ok(),
            perplexity_api_key: env::var("PERPLEXITY_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            deepseek_model: env::var("DEEPSEEK_MODEL")
                .unwrap_or_else(|_| "deepseek-chat".to_string()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            perplexity_model: env::var("PERPLEXITY_MODEL")
                .unwrap_or_else(|_| "llama-3.1-sonar-small-128k-online".to_string()),
            class_table_path: env::var("CLASS_STATS_PATH").ok().map(PathBuf::from),
        }
    }
}
