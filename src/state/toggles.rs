use dashmap::DashMap;

use crate::dao::models::CellRef;

/// Last checkbox state applied to the ledger, per game and toggle cell.
///
/// Lets the ledger drop a second edit that reports the same state as the previous one
/// instead of applying its delta twice.
#[derive(Debug, Default)]
pub struct ToggleMemory {
    applied: DashMap<(String, CellRef), bool>,
}

impl ToggleMemory {
    /// Empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// State last applied for `cell` on `game`, if any.
    pub fn last_applied(&self, game: &str, cell: CellRef) -> Option<bool> {
        self.applied
            .get(&(game.to_string(), cell))
            .map(|entry| *entry.value())
    }

    /// Remember that `state` was applied for `cell` on `game`.
    pub fn record(&self, game: &str, cell: CellRef, state: bool) {
        self.applied.insert((game.to_string(), cell), state);
    }

    /// Keep only the entries of games listed in `games`.
    pub fn retain_games(&self, games: &[String]) {
        self.applied
            .retain(|(game, _), _| games.iter().any(|known| known == game));
    }
}
