use thiserror::Error;

/// Errors that can occur while reading workbook sources
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid column reference: '{0}'")]
    InvalidColumnReference(String),

    #[error("Workbook contains no sheets")]
    NoSheetsAvailable,

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Sheet already exists: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for SheetError {
    fn from(err: calamine::Error) -> Self {
        SheetError::Workbook(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
