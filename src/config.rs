use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::splitter::SplitStrategy;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_INDEX_NAME: &str = "quickstart";
pub const DEFAULT_DATA_DIR: &str = "Data/";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Number of chunks handed to the prompt for each question.
pub const RETRIEVAL_K: u64 = 3;
pub const TEMPERATURE: f32 = 0.4;
pub const MAX_TOKENS: u32 = 500;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub qdrant_url: String,
    pub qdrant_api_key: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub index_name: String,
    pub data_dir: PathBuf,
    pub split_strategy: SplitStrategy,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(Error::MissingEnv(key));

        let qdrant_api_key = required("QDRANT_API_KEY")?;
        let openai_api_key = required("OPENAI_API_KEY")?;

        let split_strategy = match get("SPLIT_STRATEGY") {
            Some(s) => s.parse()?,
            None => SplitStrategy::default(),
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("BIND_ADDR: {}", e)))?;

        Ok(Self {
            qdrant_url: get("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string()),
            qdrant_api_key,
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            index_name: get("INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
            data_dir: PathBuf::from(get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            split_strategy,
            bind_addr,
        })
    }
}
