use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ReelError {
    fn from(err: reqwest::Error) -> Self {
        ReelError::Api(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReelError>;
