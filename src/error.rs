use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} not found in environment variables")]
    MissingEnv(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("PDF error in {path}: {message}")]
    Pdf { path: String, message: String },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("embedding dimension mismatch: model reports {model}, index '{index}' expects {expected}")]
    DimensionMismatch {
        index: String,
        model: usize,
        expected: u64,
    },

    #[error("Qdrant error: {0}")]
    Qdrant(String),

    #[error("upstream returned {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("completion response contained no choices")]
    EmptyCompletion,

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<qdrant_client::QdrantError> for Error {
    fn from(err: qdrant_client::QdrantError) -> Self {
        Error::Qdrant(err.to_string())
    }
}
