use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpendsortError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required column: {0}")]
    MissingColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid rule set: {0}")]
    InvalidRuleSet(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("User input error: {0}")]
    UserInput(String),
}

impl From<dialoguer::Error> for SpendsortError {
    fn from(err: dialoguer::Error) -> Self {
        SpendsortError::UserInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpendsortError>;
