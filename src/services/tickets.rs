use tracing::debug;

use crate::{
    dao::{models::CellValue, sheet_store::SheetStore},
    error::SyncError,
    state::layout::SheetLayout,
};

/// Ticket totals written to the sheet after a recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketTotals {
    /// Total written to team one's tickets cell.
    pub team1: i64,
    /// Total written to team two's tickets cell.
    pub team2: i64,
}

/// Sum each team's ticket region and write both totals to their output cells.
///
/// Safe to call repeatedly: identical inputs produce identical totals and writes.
pub async fn recompute(
    store: &dyn SheetStore,
    layout: &SheetLayout,
    sheet: &str,
) -> Result<TicketTotals, SyncError> {
    let [team1, team2] = layout.tracks();

    let team1_rows = store.read_range(sheet, team1.ticket_region).await?;
    let team2_rows = store.read_range(sheet, team2.ticket_region).await?;
    let totals = TicketTotals {
        team1: sum_region(&team1_rows),
        team2: sum_region(&team2_rows),
    };

    store
        .write_cell(sheet, team1.tickets_cell, CellValue::from(totals.team1))
        .await?;
    store
        .write_cell(sheet, team2.tickets_cell, CellValue::from(totals.team2))
        .await?;

    debug!(game = %sheet, team1 = totals.team1, team2 = totals.team2, "recomputed ticket totals");
    Ok(totals)
}

/// Sum of every cell read as a leading integer; blanks and text count as zero.
pub fn sum_region(rows: &[Vec<CellValue>]) -> i64 {
    rows.iter()
        .flatten()
        .map(CellValue::leading_integer)
        .fold(0i64, i64::saturating_add)
}
