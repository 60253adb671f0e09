//! In-process workbook used by the service and by tests.

use std::{collections::HashMap, fs, path::Path, sync::Arc};

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::dao::{
    models::{AddressError, CellRange, CellRef, CellValue},
    sheet_store::SheetStore,
    storage::{StorageError, StorageResult},
};

type Sheet = HashMap<CellRef, CellValue>;

/// Failures while loading a seed workbook from disk.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed workbook `{path}`")]
    Read {
        /// Seed file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The seed file is not valid seed JSON.
    #[error("failed to parse seed workbook `{path}`")]
    Parse {
        /// Seed file path, or `<inline>` for in-memory seeds.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A cell key is not an A1 address.
    #[error("invalid cell in sheet `{sheet}` of the seed workbook")]
    InvalidCell {
        /// Sheet holding the bad key.
        sheet: String,
        /// Why the address was rejected.
        #[source]
        source: AddressError,
    },
}

/// JSON layout of a seed file: sheet name -> A1 address -> raw value.
#[derive(Debug, Deserialize)]
struct SeedFile {
    sheets: IndexMap<String, IndexMap<String, CellValue>>,
}

/// Workbook kept in memory. Cloning shares the same sheets.
#[derive(Clone, Default)]
pub struct MemorySheetStore {
    sheets: Arc<RwLock<IndexMap<String, Sheet>>>,
}

impl MemorySheetStore {
    /// Empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a workbook from a JSON seed file, keeping the sheet order of the file.
    pub fn from_seed_file(path: &Path) -> Result<Self, SeedError> {
        let contents = fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_seed_json(&contents).map_err(|err| match err {
            SeedError::Parse { source, .. } => SeedError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Load a workbook from seed JSON held in memory.
    pub fn from_seed_json(contents: &str) -> Result<Self, SeedError> {
        let seed: SeedFile = serde_json::from_str(contents).map_err(|source| SeedError::Parse {
            path: "<inline>".into(),
            source,
        })?;

        let mut sheets = IndexMap::with_capacity(seed.sheets.len());
        for (name, cells) in seed.sheets {
            let mut sheet = Sheet::with_capacity(cells.len());
            for (address, value) in cells {
                let cell = address
                    .parse::<CellRef>()
                    .map_err(|source| SeedError::InvalidCell {
                        sheet: name.clone(),
                        source,
                    })?;
                sheet.insert(cell, value);
            }
            sheets.insert(name, sheet);
        }

        Ok(Self {
            sheets: Arc::new(RwLock::new(sheets)),
        })
    }

    /// Add a sheet (or replace an existing one) with the given cells.
    pub async fn insert_sheet<I>(&self, name: impl Into<String>, cells: I)
    where
        I: IntoIterator<Item = (CellRef, CellValue)>,
    {
        let sheet = cells.into_iter().collect::<Sheet>();
        self.sheets.write().await.insert(name.into(), sheet);
    }
}

impl SheetStore for MemorySheetStore {
    fn list_sheets(&self) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.sheets.read().await.keys().cloned().collect()) })
    }

    fn read_cell(&self, sheet: &str, cell: CellRef) -> BoxFuture<'static, StorageResult<CellValue>> {
        let store = self.clone();
        let sheet = sheet.to_string();
        Box::pin(async move {
            let guard = store.sheets.read().await;
            let cells = guard
                .get(&sheet)
                .ok_or_else(|| StorageError::sheet_not_found(&sheet))?;
            Ok(cells.get(&cell).cloned().unwrap_or_default())
        })
    }

    fn write_cell(
        &self,
        sheet: &str,
        cell: CellRef,
        value: CellValue,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let sheet = sheet.to_string();
        Box::pin(async move {
            let mut guard = store.sheets.write().await;
            let cells = guard
                .get_mut(&sheet)
                .ok_or_else(|| StorageError::sheet_not_found(&sheet))?;
            match value {
                CellValue::Empty => cells.remove(&cell),
                value => cells.insert(cell, value),
            };
            Ok(())
        })
    }

    fn read_range(
        &self,
        sheet: &str,
        range: CellRange,
    ) -> BoxFuture<'static, StorageResult<Vec<Vec<CellValue>>>> {
        let store = self.clone();
        let sheet = sheet.to_string();
        Box::pin(async move {
            let guard = store.sheets.read().await;
            let cells = guard
                .get(&sheet)
                .ok_or_else(|| StorageError::sheet_not_found(&sheet))?;
            Ok(range
                .rows()
                .map(|row| {
                    range
                        .row_cells(row)
                        .map(|cell| cells.get(&cell).cloned().unwrap_or_default())
                        .collect()
                })
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::col;

    #[tokio::test]
    async fn reads_back_written_values() {
        let store = MemorySheetStore::new();
        store.insert_sheet("Darts", []).await;

        let cell = CellRef::new(col::A, 3);
        assert_eq!(store.read_cell("Darts", cell).await.unwrap(), CellValue::Empty);

        store
            .write_cell("Darts", cell, CellValue::Number(440.0))
            .await
            .unwrap();
        assert_eq!(
            store.read_cell("Darts", cell).await.unwrap(),
            CellValue::Number(440.0)
        );
    }

    #[tokio::test]
    async fn missing_sheet_is_reported() {
        let store = MemorySheetStore::new();
        let err = store
            .read_cell("Ghost", CellRef::new(col::A, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::SheetNotFound { sheet } if sheet == "Ghost"));
        assert!(!store.has_sheet("Ghost").await.unwrap());
    }

    #[tokio::test]
    async fn range_reads_fill_blanks() {
        let store = MemorySheetStore::new();
        store
            .insert_sheet(
                "Ring Toss",
                [(CellRef::new(col::E, 24), CellValue::Number(7.0))],
            )
            .await;

        let range = "E23:F24".parse::<CellRange>().unwrap();
        let rows = store.read_range("Ring Toss", range).await.unwrap();
        assert_eq!(
            rows,
            vec![
                vec![CellValue::Empty, CellValue::Empty],
                vec![CellValue::Number(7.0), CellValue::Empty],
            ]
        );
    }

    #[tokio::test]
    async fn seed_preserves_sheet_order() {
        let store = MemorySheetStore::from_seed_json(
            r#"{ "sheets": { "Ring Toss": { "A3": 500, "D1": false }, "Darts": {} } }"#,
        )
        .unwrap();

        assert_eq!(store.list_sheets().await.unwrap(), vec!["Ring Toss", "Darts"]);
        assert_eq!(
            store
                .read_cell("Ring Toss", CellRef::new(col::D, 1))
                .await
                .unwrap(),
            CellValue::Bool(false)
        );
    }

    #[test]
    fn seed_rejects_bad_addresses() {
        let err = MemorySheetStore::from_seed_json(r#"{ "sheets": { "Darts": { "3A": 1 } } }"#)
            .err()
            .unwrap();
        assert!(matches!(err, SeedError::InvalidCell { sheet, .. } if sheet == "Darts"));
    }
}
