use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReqconvError {
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("配置文件错误: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for ReqconvError {
    fn from(err: anyhow::Error) -> Self {
        ReqconvError::Other(err.to_string())
    }
}

impl From<toml::de::Error> for ReqconvError {
    fn from(err: toml::de::Error) -> Self {
        ReqconvError::ConfigError(err.to_string())
    }
}

/// Result type for reqconv crate
pub type Result<T> = std::result::Result<T, ReqconvError>;
