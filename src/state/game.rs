use crate::dao::models::CellRef;
use crate::dao::models::CellValue;

/// One cell mutation reported by the host workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct EditEvent {
    /// Sheet (game) the edit happened on.
    pub sheet: String,
    /// Edited cell.
    pub cell: CellRef,
    /// Value the cell holds after the edit.
    pub value: CellValue,
    /// Value the cell held before the edit, when the host reports it.
    pub old_value: Option<CellValue>,
}

impl EditEvent {
    /// Edit without a reported previous value.
    pub fn new(sheet: impl Into<String>, cell: CellRef, value: impl Into<CellValue>) -> Self {
        Self {
            sheet: sheet.into(),
            cell,
            value: value.into(),
            old_value: None,
        }
    }

    /// Attach the value the cell held before the edit.
    pub fn with_old_value(mut self, old_value: impl Into<CellValue>) -> Self {
        self.old_value = Some(old_value.into());
        self
    }
}

/// Point-in-time copy of a game's derived state.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    /// Game (sheet) name.
    pub game: String,
    /// Team one balance.
    pub team1_balance: f64,
    /// Team two balance.
    pub team2_balance: f64,
    /// Team one ticket total.
    pub team1_tickets: f64,
    /// Team two ticket total.
    pub team2_tickets: f64,
}
