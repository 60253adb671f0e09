/// Edit and snapshot types.
pub mod game;
/// Fixed sheet layout.
pub mod layout;
/// Applied checkbox states.
pub mod toggles;

use std::{sync::Arc, time::SystemTime};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::{
    config::SyncMode,
    dao::sheet_store::SheetStore,
    services::dispatcher::SyncDispatcher,
    state::{layout::SheetLayout, toggles::ToggleMemory},
};

/// Handle to the application state shared by handlers and tasks.
pub type SharedState = Arc<AppState>;

/// Central application state: the workbook, the webhook client and per-game bookkeeping.
pub struct AppState {
    store: Arc<dyn SheetStore>,
    dispatcher: SyncDispatcher,
    layout: SheetLayout,
    mode: SyncMode,
    toggles: ToggleMemory,
    game_locks: DashMap<String, Arc<Mutex<()>>>,
    last_full_sync: RwLock<Option<SystemTime>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        store: Arc<dyn SheetStore>,
        dispatcher: SyncDispatcher,
        layout: SheetLayout,
        mode: SyncMode,
    ) -> SharedState {
        Arc::new(Self {
            store,
            dispatcher,
            layout,
            mode,
            toggles: ToggleMemory::new(),
            game_locks: DashMap::new(),
            last_full_sync: RwLock::new(None),
        })
    }

    /// Workbook backing every game.
    pub fn store(&self) -> &dyn SheetStore {
        self.store.as_ref()
    }

    /// Client used to push updates to the dashboard.
    pub fn dispatcher(&self) -> &SyncDispatcher {
        &self.dispatcher
    }

    /// Cell layout shared by every game.
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Whether derived cells are maintained or only mirrored.
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Checkbox states already applied to the balances.
    pub fn toggles(&self) -> &ToggleMemory {
        &self.toggles
    }

    /// Serialize work on one game: the returned guard must be held for the whole
    /// mutate, snapshot and publish sequence.
    pub async fn lock_game(&self, game: &str) -> OwnedMutexGuard<()> {
        let gate = self
            .game_locks
            .entry(game.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        gate.lock_owned().await
    }

    /// Drop lock and toggle bookkeeping for games no longer in `games`.
    pub fn retain_games(&self, games: &[String]) {
        self.game_locks
            .retain(|game, _| games.iter().any(|known| known == game));
        self.toggles.retain_games(games);
    }

    #[cfg(test)]
    pub(crate) fn has_game_lock(&self, game: &str) -> bool {
        self.game_locks.contains_key(game)
    }

    /// When the last full sync finished, if one has run.
    pub async fn last_full_sync(&self) -> Option<SystemTime> {
        *self.last_full_sync.read().await
    }

    /// Record the completion time of a full sync.
    pub async fn mark_full_sync(&self, at: SystemTime) {
        *self.last_full_sync.write().await = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{config::RetryPolicy, dao::sheet_store::MemorySheetStore};

    fn state() -> SharedState {
        let dispatcher =
            SyncDispatcher::new("http://127.0.0.1:9", Duration::from_secs(1), RetryPolicy::none())
                .unwrap();
        AppState::new(
            Arc::new(MemorySheetStore::new()),
            dispatcher,
            SheetLayout::default(),
            SyncMode::Ledger,
        )
    }

    #[tokio::test]
    async fn game_locks_are_exclusive_per_game() {
        let state = state();

        let darts = state.lock_game("Darts").await;
        assert!(state.game_locks.get("Darts").unwrap().try_lock().is_err());

        // Other games are unaffected.
        let _ring_toss = state.lock_game("Ring Toss").await;

        drop(darts);
        assert!(state.game_locks.get("Darts").unwrap().try_lock().is_ok());
    }

    #[tokio::test]
    async fn retain_games_prunes_vanished_games() {
        let state = state();
        let d1 = crate::dao::models::CellRef::new(crate::dao::models::col::D, 1);

        drop(state.lock_game("Darts").await);
        drop(state.lock_game("Ring Toss").await);
        state.toggles().record("Darts", d1, true);
        state.toggles().record("Ring Toss", d1, true);

        state.retain_games(&["Ring Toss".to_string()]);

        assert!(state.game_locks.get("Darts").is_none());
        assert!(state.game_locks.get("Ring Toss").is_some());
        assert_eq!(state.toggles().last_applied("Darts", d1), None);
        assert_eq!(state.toggles().last_applied("Ring Toss", d1), Some(true));
    }
}
