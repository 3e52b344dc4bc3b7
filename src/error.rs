use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The specified data folder does not exist: {0}")]
    Config(String),

    #[error("Could not read {file}: {reason}")]
    Load { file: String, reason: String },

    #[error("{0}")]
    Structure(String),

    #[error("Invalid amount {raw:?}")]
    Value { raw: String },

    #[error("Write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
