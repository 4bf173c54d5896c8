use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlugmapError>;

#[derive(Error, Debug)]
pub enum PlugmapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Station data error: {0}")]
    Data(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PlugmapError {
    fn from(err: serde_json::Error) -> Self {
        PlugmapError::Data(err.to_string())
    }
}
