use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    Status(u16),
    #[error("Parsing error")]
    Parse,
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Settings error: {0}")]
    Settings(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(value: std::num::ParseIntError) -> Self {
        Self::Settings(value.to_string())
    }
}
