/// Cell addresses and raw cell values.
pub mod models;
/// Workbook access used by the sync pipeline.
pub mod sheet_store;
/// Storage error types shared by every sheet store.
pub mod storage;
