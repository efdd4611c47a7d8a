use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorrectorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read workbook: {0}")]
    InputRead(String),

    #[error("Failed to write workbook: {0}")]
    Export(String),

    #[error("Oracle call failed: {0}")]
    Oracle(String),

    #[error("Could not parse corrected output: {reason}\n--- normalized text ---\n{text}")]
    ResponseParse { reason: String, text: String },

    #[error("No sheet in the workbook has a '{0}' column")]
    NoTargetColumn(String),

    #[error("Brand directory scrape failed: {0}")]
    Scrape(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, CorrectorError>;
