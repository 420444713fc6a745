use thiserror::Error;

/// Centralized error types for the application
///
/// All errors in the application are converted to this enum for consistent
/// error handling. Uses `thiserror` for automatic conversion and display
/// formatting. Storage errors are never retried; they fail the single
/// request that hit them and are logged by the dispatcher.
#[derive(Error, Debug)]
pub enum AppError {
    /// IO errors (per-user state files, sheet files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Workbook write errors
    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Archive errors while opening a workbook for reading
    #[error("Spreadsheet archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Malformed worksheet XML encountered while reading a workbook back
    #[error("Spreadsheet parse error: {0}")]
    SheetParse(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
