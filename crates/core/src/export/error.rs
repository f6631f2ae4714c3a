//! Export error types.

use sgbooks_shared::AppError;
use thiserror::Error;

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum ExportError {
    /// PDF construction failed.
    #[error("PDF export failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Workbook construction failed.
    #[error("Excel export failed: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    /// CSV writing failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Buffer flushing failed.
    #[error("Export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The requested format name is unknown.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

impl ExportError {
    /// Returns the error code for display and logging.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Pdf(_) => "PDF_EXPORT_FAILED",
            Self::Excel(_) => "EXCEL_EXPORT_FAILED",
            Self::Csv(_) => "CSV_EXPORT_FAILED",
            Self::Json(_) => "JSON_EXPORT_FAILED",
            Self::Io(_) => "EXPORT_IO_FAILED",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnsupportedFormat(_) => Self::validation(err.to_string()),
            _ => Self::Export(err.to_string()),
        }
    }
}
