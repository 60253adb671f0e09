use tracing::debug;

use crate::{
    dao::{models::CellValue, sheet_store::SheetStore},
    error::SyncError,
    services::read_number,
    state::{
        game::EditEvent,
        layout::{SheetLayout, Team},
        toggles::ToggleMemory,
    },
};

/// Balance written back after a toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceChange {
    /// Team whose balance moved.
    pub team: Team,
    /// Balance before the toggle.
    pub previous: f64,
    /// Balance written back.
    pub balance: f64,
}

/// Apply the delta carried by a checkbox edit to the owning team's balance.
///
/// Checking a box spends its magnitude, unchecking refunds it. Returns the balances that
/// were written; an empty vector means the edit was a no-op (not a toggle cell, not a
/// boolean, or the same state as the one already applied). Every target balance is read
/// and validated before anything is written, so a non-numeric balance leaves the sheet
/// untouched.
pub async fn apply_toggle(
    store: &dyn SheetStore,
    layout: &SheetLayout,
    memory: &ToggleMemory,
    edit: &EditEvent,
) -> Result<Vec<BalanceChange>, SyncError> {
    let targets = layout.toggle_targets(edit.cell).collect::<Vec<_>>();
    if targets.is_empty() {
        return Ok(Vec::new());
    }

    let Some(checked) = edit.value.as_toggle() else {
        debug!(game = %edit.sheet, cell = %edit.cell, "toggle edit carries no boolean; ignoring");
        return Ok(Vec::new());
    };

    if is_repeat(memory, edit, checked) {
        debug!(
            game = %edit.sheet,
            cell = %edit.cell,
            checked,
            "toggle already in this state; not applying delta again"
        );
        return Ok(Vec::new());
    }

    let mut planned = Vec::with_capacity(targets.len());
    for (track, magnitude) in targets {
        let previous = read_number(store, &edit.sheet, track.balance_cell).await?;
        let balance = if checked {
            previous - magnitude
        } else {
            previous + magnitude
        };
        planned.push((track, previous, balance));
    }

    let mut changes = Vec::with_capacity(planned.len());
    for (track, previous, balance) in planned {
        store
            .write_cell(&edit.sheet, track.balance_cell, CellValue::Number(balance))
            .await?;
        changes.push(BalanceChange {
            team: track.team,
            previous,
            balance,
        });
    }

    memory.record(&edit.sheet, edit.cell, checked);
    Ok(changes)
}

fn is_repeat(memory: &ToggleMemory, edit: &EditEvent, checked: bool) -> bool {
    if let Some(previous) = edit.old_value.as_ref().and_then(CellValue::as_toggle) {
        return previous == checked;
    }
    memory.last_applied(&edit.sheet, edit.cell) == Some(checked)
}
