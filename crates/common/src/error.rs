use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatehouseError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("session store error: {0}")]
    SessionStore(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type GatehouseResult<T> = Result<T, GatehouseError>;
