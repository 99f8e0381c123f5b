//! Shared error type across SalesPulse crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// File extension is not csv/xlsx/xls.
    UnsupportedFormat,
    /// File could not be parsed into a table.
    LoadFailed,
    /// A column required by the operation is absent.
    MissingColumn,
    /// Metrics requested before any successful upload.
    NoData,
    /// Invalid input (query parameters, multipart form).
    BadRequest,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ClientCode::LoadFailed => "LOAD_FAILED",
            ClientCode::MissingColumn => "MISSING_COLUMN",
            ClientCode::NoData => "NO_DATA",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SalesError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum SalesError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("failed to load file: {0}")]
    Load(String),
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("No data uploaded yet")]
    NoData,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SalesError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            SalesError::UnsupportedFormat(_) => ClientCode::UnsupportedFormat,
            SalesError::Load(_) => ClientCode::LoadFailed,
            SalesError::MissingColumn(_) => ClientCode::MissingColumn,
            SalesError::NoData => ClientCode::NoData,
            SalesError::BadRequest(_) => ClientCode::BadRequest,
            SalesError::Internal(_) => ClientCode::Internal,
        }
    }

    /// True for failures that reject an upload (bad or unsupported file).
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            SalesError::UnsupportedFormat(_) | SalesError::Load(_) | SalesError::MissingColumn(_)
        )
    }
}

impl From<csv::Error> for SalesError {
    fn from(err: csv::Error) -> Self {
        SalesError::Load(format!("csv: {err}"))
    }
}

impl From<calamine::Error> for SalesError {
    fn from(err: calamine::Error) -> Self {
        SalesError::Load(format!("spreadsheet: {err}"))
    }
}
