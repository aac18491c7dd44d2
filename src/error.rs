use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Invalid risk rate: {0}")]
    InvalidRiskRate(String),

    #[error("Risk rate must be greater than 0 and at most 100, got {0}")]
    RiskRateOutOfRange(f64),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    #[error("Trade store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JournalError>;
