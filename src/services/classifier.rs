use crate::{
    config::SyncMode,
    dao::models::CellRef,
    state::{game::EditEvent, layout::SheetLayout},
};

/// What an edit touches. An edit touching nothing is simply ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relevance {
    /// A balance may change.
    pub affects_balance: bool,
    /// A ticket total may change.
    pub affects_tickets: bool,
}

impl Relevance {
    /// Edit outside every tracked cell.
    pub const fn none() -> Self {
        Self {
            affects_balance: false,
            affects_tickets: false,
        }
    }

    /// Whether the edit matters at all.
    pub fn any(&self) -> bool {
        self.affects_balance || self.affects_tickets
    }
}

/// Decide whether `edit` affects balances, tickets, both or neither.
pub fn classify(layout: &SheetLayout, mode: SyncMode, edit: &EditEvent) -> Relevance {
    match mode {
        SyncMode::Ledger if layout.is_output_cell(edit.cell) => {
            classify_output(layout, edit.cell)
        }
        SyncMode::Ledger => classify_cell(layout, edit.cell),
        SyncMode::Mirror => classify_output(layout, edit.cell),
    }
}

fn classify_cell(layout: &SheetLayout, cell: CellRef) -> Relevance {
    Relevance {
        affects_balance: layout.toggle_targets(cell).next().is_some(),
        affects_tickets: layout.trigger_rows().contains(&cell.row),
    }
}

// Balance and ticket cells edited by hand; mirror mode watches nothing else.
fn classify_output(layout: &SheetLayout, cell: CellRef) -> Relevance {
    if !layout.is_output_cell(cell) {
        return Relevance::none();
    }
    Relevance {
        affects_balance: layout
            .tracks()
            .iter()
            .any(|track| track.balance_cell == cell),
        affects_tickets: layout
            .tracks()
            .iter()
            .any(|track| track.tickets_cell == cell),
    }
}
