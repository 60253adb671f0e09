/// In-memory workbook.
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::{
    models::{CellRange, CellRef, CellValue},
    storage::StorageResult,
};

pub use memory::{MemorySheetStore, SeedError};

/// Abstraction over the workbook that holds one sheet per game.
///
/// Implementations must offer read-your-writes: a read issued after a completed
/// `write_cell` observes the written value.
pub trait SheetStore: Send + Sync {
    /// Names of every sheet, in workbook order.
    fn list_sheets(&self) -> BoxFuture<'static, StorageResult<Vec<String>>>;
    /// Raw value of one cell; blank cells read as [`CellValue::Empty`].
    fn read_cell(&self, sheet: &str, cell: CellRef) -> BoxFuture<'static, StorageResult<CellValue>>;
    /// Overwrite one cell.
    fn write_cell(
        &self,
        sheet: &str,
        cell: CellRef,
        value: CellValue,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Values of a rectangle, one inner vector per row.
    fn read_range(
        &self,
        sheet: &str,
        range: CellRange,
    ) -> BoxFuture<'static, StorageResult<Vec<Vec<CellValue>>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;

    /// Whether a sheet with this name exists.
    fn has_sheet(&self, sheet: &str) -> BoxFuture<'static, StorageResult<bool>> {
        let sheets = self.list_sheets();
        let sheet = sheet.to_string();
        Box::pin(async move { Ok(sheets.await?.contains(&sheet)) })
    }
}
