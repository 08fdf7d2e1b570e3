use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the ApplicantBuddy server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the Qdrant instance that stores resume vectors.
    pub qdrant_url: String,
    /// Name of the Qdrant collection used for resume chunks.
    pub qdrant_collection_name: String,
    /// Optional API key required to access Qdrant.
    pub qdrant_api_key: Option<String>,
    /// Dimensionality of the produced embedding vectors.
    pub embedding_dimension: usize,
    /// Optional token budget override for semantic chunking.
    pub chunk_token_budget: Option<usize>,
    /// Base URL of the OCR service used for text extraction.
    pub ocr_url: String,
    /// Optional API key for the OCR service.
    pub ocr_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible chat completions endpoint.
    pub llm_url: String,
    /// Optional API key for the LLM endpoint.
    pub llm_api_key: Option<String>,
    /// Model identifier passed on summarization and extraction requests.
    pub llm_model: String,
    /// Directory where uploaded resume files are persisted.
    pub storage_dir: String,
    /// Number of pipeline workers pulling from the job queue.
    pub worker_count: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Result cap applied when a search request omits a limit.
    pub search_default_limit: usize,
    /// Hard upper bound on search result counts.
    pub search_max_limit: usize,
    /// Minimum similarity score applied when a search request omits one.
    pub search_default_score_threshold: f32,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            qdrant_url: load_env("QDRANT_URL")?,
            qdrant_collection_name: load_env("QDRANT_COLLECTION_NAME")?,
            qdrant_api_key: load_env_optional("QDRANT_API_KEY"),
            embedding_dimension: load_env("EMBEDDING_DIMENSION")?
                .parse()
                .map_err(|_| ConfigError::InvalidValue("EMBEDDING_DIMENSION".to_string()))?,
            chunk_token_budget: parse_optional("CHUNK_TOKEN_BUDGET")?,
            ocr_url: load_env("OCR_URL")?,
            ocr_api_key: load_env_optional("OCR_API_KEY"),
            llm_url: load_env("LLM_URL")?,
            llm_api_key: load_env_optional("LLM_API_KEY"),
            llm_model: load_env("LLM_MODEL")?,
            storage_dir: load_env_optional("STORAGE_DIR")
                .unwrap_or_else(|| "public/resumes".to_string()),
            worker_count: parse_optional("WORKER_COUNT")?.unwrap_or(4),
            server_port: parse_optional("SERVER_PORT")?,
            search_default_limit: parse_optional("SEARCH_DEFAULT_LIMIT")?.unwrap_or(10),
            search_max_limit: parse_optional("SEARCH_MAX_LIMIT")?.unwrap_or(50),
            search_default_score_threshold: parse_optional("SEARCH_DEFAULT_SCORE_THRESHOLD")?
                .unwrap_or(0.7),
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        qdrant_url = %config.qdrant_url,
        collection = %config.qdrant_collection_name,
        storage_dir = %config.storage_dir,
        workers = config.worker_count,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
