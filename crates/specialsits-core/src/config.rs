use std::env;
use std::path::PathBuf;

/// Which LLM backend serves embedding and generation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    /// Local Ollama instance
    Local,
    /// Hosted OpenAI API
    OpenAi,
}

/// Runtime settings loaded from environment variables.
///
/// There is no process-wide cached instance: callers load `Settings` once at
/// startup and pass it by reference into component constructors.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base directory holding `db_oddlots/` and `db_spinoffs/`
    pub base_path: PathBuf,

    /// LLM backend selection
    pub backend: LlmBackend,

    /// Ollama base URL (local backend)
    pub ollama_url: String,

    /// OpenAI API key (hosted backend)
    pub openai_api_key: Option<String>,

    /// Embedding model name
    pub embed_model: String,

    /// Chat/completion model name
    pub chat_model: String,

    /// Maximum chunk size in characters
    pub chunk_size: usize,

    /// Chunk overlap in characters
    pub chunk_overlap: usize,

    /// Default number of chunks retrieved per query
    pub top_k: usize,

    /// Worker pool size for document loading
    pub load_workers: usize,

    /// Mail relay credentials. Read for deployment parity with the ingestion
    /// environment; the extraction pipeline itself never sends mail.
    pub mail: Option<MailSettings>,
}

/// SMTP credentials carried through the environment
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: u16,
}

impl Settings {
    /// Load settings from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let base_path = env::var("SPECIALSITS_BASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let backend = match env::var("SPECIALSITS_LLM_BACKEND").as_deref() {
            Ok("openai") => LlmBackend::OpenAi,
            _ => LlmBackend::Local,
        };

        let ollama_url = env::var("SPECIALSITS_OLLAMA_URL")
            .unwrap_or_else(|_| "http://localhost:11434".to_string());

        let openai_api_key = env::var("OPENAI_API_KEY").ok();

        let embed_model = env::var("SPECIALSITS_EMBED_MODEL").unwrap_or_else(|_| match backend {
            LlmBackend::Local => "llama3".to_string(),
            LlmBackend::OpenAi => "text-embedding-3-small".to_string(),
        });

        let chat_model = env::var("SPECIALSITS_CHAT_MODEL").unwrap_or_else(|_| match backend {
            LlmBackend::Local => "llama3".to_string(),
            LlmBackend::OpenAi => "gpt-4o-mini".to_string(),
        });

        let chunk_size = parse_env("SPECIALSITS_CHUNK_SIZE", 2000);
        let chunk_overlap = parse_env("SPECIALSITS_CHUNK_OVERLAP", 300);
        let top_k = parse_env("SPECIALSITS_TOP_K", 4);
        let load_workers = parse_env("SPECIALSITS_LOAD_WORKERS", 8);

        let mail = MailSettings::from_env();

        Self {
            base_path,
            backend,
            ollama_url,
            openai_api_key,
            embed_model,
            chat_model,
            chunk_size,
            chunk_overlap,
            top_k,
            load_workers,
            mail,
        }
    }
}

impl MailSettings {
    fn from_env() -> Option<Self> {
        let host = env::var("MAIL_HOST").ok()?;
        let username = env::var("MAIL_USERNAME").ok()?;
        let password = env::var("MAIL_PASSWORD").ok()?;
        let port = env::var("MAIL_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(587);
        Some(Self { host, username, password, port })
    }
}

fn parse_env(key: &str, default: usize) -> usize {
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid {} value '{}': expected integer", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
