use thiserror::Error;

pub type RoiResult<T> = Result<T, RoiError>;

#[derive(Error, Debug)]
pub enum RoiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse {table} CSV: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column `{column}` in {table} CSV")]
    MissingColumn {
        table: &'static str,
        column: String,
    },

    #[error("Invalid value {value:?} in {table} column `{column}`")]
    InvalidValue {
        table: &'static str,
        column: &'static str,
        value: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
