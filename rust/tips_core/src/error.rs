//! Error type shared by the core and the browser bindings.

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("decode tips data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("hidden set storage: {0}")]
    Storage(String),
    #[error("load {url}: {reason}")]
    Load { url: String, reason: String },
    #[error("dom: {0}")]
    Dom(String),
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
