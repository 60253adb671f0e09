use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by sheet stores regardless of where the workbook lives.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The workbook has no sheet with this name.
    #[error("sheet `{sheet}` not found")]
    SheetNotFound {
        /// Name that was looked up.
        sheet: String,
    },
}

impl StorageError {
    /// Construct a not-found error for the given sheet.
    pub fn sheet_not_found(sheet: impl Into<String>) -> Self {
        StorageError::SheetNotFound {
            sheet: sheet.into(),
        }
    }
}
