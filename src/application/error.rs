use thiserror::Error;

use crate::domain::{ParseError, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid record log")]
    Csv(#[from] csv::Error),

    #[error("Invalid snapshot")]
    Json(#[from] serde_json::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration")]
    Config(#[from] config::ConfigError),
}
