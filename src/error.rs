use thiserror::Error;

/// Failure to turn a raw CSV field into a typed value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid amount: {0:?}")]
    Amount(String),

    #[error("Invalid date: {0:?} (expected YYYY-MM-DD or YYYY.MM.DD)")]
    Date(String),

    #[error("Line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

#[derive(Error, Debug)]
pub enum MonsteraError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Column not found in CSV header: {0}")]
    MissingColumn(String),

    #[error("Unknown column for table {table}: {column}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MonsteraError>;
