use crate::{
    dao::{models::CellRef, sheet_store::SheetStore},
    error::SyncError,
};

/// Edit relevance decisions.
pub mod classifier;
/// Webhook delivery to the dashboard.
pub mod dispatcher;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Balance updates driven by checkbox toggles.
pub mod ledger;
/// Per-game snapshot assembly.
pub mod snapshot_service;
/// Edit and periodic sync pipelines.
pub mod sync_service;
/// Fallback periodic sync loop.
pub mod ticker;
/// Ticket total recomputation.
pub mod tickets;

/// Read a cell that must hold a number, reporting anything else as [`SyncError::NonNumericState`].
pub(crate) async fn read_number(
    store: &dyn SheetStore,
    sheet: &str,
    cell: CellRef,
) -> Result<f64, SyncError> {
    let value = store.read_cell(sheet, cell).await?;
    value.as_number().ok_or_else(|| SyncError::NonNumericState {
        game: sheet.to_string(),
        cell: cell.to_string(),
        value: serde_json::to_string(&value).unwrap_or_else(|_| format!("{value:?}")),
    })
}
