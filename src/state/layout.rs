//! Fixed cell layout shared by every game sheet.

use indexmap::IndexMap;

use crate::dao::models::{CellRange, CellRef, col};

/// One of the two teams tracked on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    /// Left-hand team (column `A` outputs).
    One,
    /// Right-hand team (column `B` outputs).
    Two,
}

/// Toggle cell -> balance magnitude for one team.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeltaTable {
    entries: IndexMap<CellRef, f64>,
}

impl DeltaTable {
    /// Magnitude attached to `cell`, if it is a toggle of this table.
    pub fn magnitude(&self, cell: CellRef) -> Option<f64> {
        self.entries.get(&cell).copied()
    }

    /// Every toggle cell with its magnitude.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, f64)> + '_ {
        self.entries.iter().map(|(cell, magnitude)| (*cell, *magnitude))
    }

    fn insert(&mut self, cell: CellRef, magnitude: f64) {
        self.entries.insert(cell, magnitude);
    }
}

/// Cells owned by one team: where its balance and tickets live and what feeds them.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamTrack {
    /// Owning team.
    pub team: Team,
    /// Cell holding the balance.
    pub balance_cell: CellRef,
    /// Cell holding the ticket total.
    pub tickets_cell: CellRef,
    /// Toggles that move the balance.
    pub deltas: DeltaTable,
    /// Cells summed into the ticket total.
    pub ticket_region: CellRange,
}

/// Static description of a game sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    tracks: [TeamTrack; 2],
    trigger_rows: Vec<u32>,
}

/// Toggle columns and the balance change each one carries.
const TOGGLE_COLUMNS: [(u32, f64); 5] = [
    (col::D, 60.0),
    (col::G, 70.0),
    (col::I, 120.0),
    (col::L, 80.0),
    (col::O, 90.0),
];

impl SheetLayout {
    /// Build a layout from explicit tracks and ticket trigger rows.
    pub fn new(team1: TeamTrack, team2: TeamTrack, trigger_rows: Vec<u32>) -> Self {
        Self {
            tracks: [team1, team2],
            trigger_rows,
        }
    }

    /// Both team tracks, team one first.
    pub fn tracks(&self) -> &[TeamTrack; 2] {
        &self.tracks
    }

    /// Track for a given team.
    pub fn track(&self, team: Team) -> &TeamTrack {
        match team {
            Team::One => &self.tracks[0],
            Team::Two => &self.tracks[1],
        }
    }

    /// Rows whose edits force a ticket recomputation.
    pub fn trigger_rows(&self) -> &[u32] {
        &self.trigger_rows
    }

    /// Tracks whose delta table contains `cell`, with the magnitude to apply.
    pub fn toggle_targets(&self, cell: CellRef) -> impl Iterator<Item = (&TeamTrack, f64)> + '_ {
        self.tracks
            .iter()
            .filter_map(move |track| track.deltas.magnitude(cell).map(|m| (track, m)))
    }

    /// Whether `cell` is a balance or ticket output cell.
    pub fn is_output_cell(&self, cell: CellRef) -> bool {
        self.tracks
            .iter()
            .any(|track| track.balance_cell == cell || track.tickets_cell == cell)
    }
}

impl Default for SheetLayout {
    /// Carnival layout: balances in `A3:B3`, tickets in `A10:B10`, team one toggles on rows
    /// 1-2, team two toggles on rows 3-4, ticket inputs in `E23:O24` and `E27:O28`.
    fn default() -> Self {
        let team1 = TeamTrack {
            team: Team::One,
            balance_cell: CellRef::new(col::A, 3),
            tickets_cell: CellRef::new(col::A, 10),
            deltas: toggle_table(&[1, 2]),
            ticket_region: CellRange::new(CellRef::new(col::E, 23), CellRef::new(col::O, 24)),
        };
        let team2 = TeamTrack {
            team: Team::Two,
            balance_cell: CellRef::new(col::B, 3),
            tickets_cell: CellRef::new(col::B, 10),
            deltas: toggle_table(&[3, 4]),
            ticket_region: CellRange::new(CellRef::new(col::E, 27), CellRef::new(col::O, 28)),
        };

        Self::new(team1, team2, vec![23, 24, 27, 28])
    }
}

fn toggle_table(rows: &[u32]) -> DeltaTable {
    let mut table = DeltaTable::default();
    for (column, magnitude) in TOGGLE_COLUMNS {
        for row in rows {
            table.insert(CellRef::new(column, *row), magnitude);
        }
    }
    table
}
