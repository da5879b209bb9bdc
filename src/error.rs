use thiserror::Error;

/// Errors raised by the EDGAR data layer and the workbook writer
#[derive(Debug, Error)]
pub enum EdgarError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing field `{0}` in EDGAR payload")]
    MissingField(&'static str),

    #[error("invalid CIK: {0:?}")]
    InvalidCik(String),

    #[error("invalid cell reference: {0:?}")]
    InvalidCell(String),

    #[error("cell out of range: column {column}, row {row} (columns 1..=16384, rows 1..=1048576)")]
    CellOutOfRange { column: i64, row: i64 },

    #[error("sheet {0:?} does not exist in the workbook")]
    UnknownSheet(String),

    #[error("{cells} cells given for {values} values")]
    LengthMismatch { cells: usize, values: usize },
}

pub type EdgarResult<T> = std::result::Result<T, EdgarError>;
