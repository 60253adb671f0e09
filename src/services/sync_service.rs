use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::{
    config::SyncMode,
    error::{SyncError, TransportError},
    services::{
        classifier::{self, Relevance},
        ledger,
        snapshot_service::{self, SnapshotBatch},
        tickets,
    },
    state::{
        SharedState,
        game::{EditEvent, GameSnapshot},
    },
};

/// What happened to an edit notification.
#[derive(Debug)]
pub enum EditOutcome {
    /// The edit is outside every tracked cell.
    Ignored,
    /// The edit touched a tracked cell but changed nothing derived.
    Unchanged {
        /// What the edit touched.
        relevance: Relevance,
    },
    /// Derived state was updated and delivered.
    Published {
        /// What the edit touched.
        relevance: Relevance,
        /// State that was sent.
        snapshot: GameSnapshot,
    },
    /// Derived state was updated but the dashboard could not be reached.
    PublishFailed {
        /// What the edit touched.
        relevance: Relevance,
        /// State that could not be sent.
        snapshot: GameSnapshot,
        /// Delivery failure.
        error: TransportError,
    },
}

/// Per-game failure recorded during a full sync.
#[derive(Debug)]
pub struct GameFailure {
    /// Game that failed.
    pub game: String,
    /// Why it failed.
    pub error: SyncError,
}

/// Summary of a full sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Game names in workbook order.
    pub games: Vec<String>,
    /// Outcome of publishing the game list; `None` when it was not part of this run.
    pub game_list: Option<Result<(), TransportError>>,
    /// Games whose snapshot reached the dashboard.
    pub published: Vec<String>,
    /// Games that could not be read or delivered.
    pub failures: Vec<GameFailure>,
}

/// React to one edit: classify it, record it, update derived cells, then publish.
///
/// Edits outside tracked cells return before anything is written. Relevant edits are
/// written to the workbook first so the pipeline reads the post-edit state; when the host
/// did not report the previous value, the one held by the workbook stands in for it.
/// Direct edits of balance or ticket cells are recorded and republished as they are.
/// Transport failures do not fail the call; they are returned as
/// [`EditOutcome::PublishFailed`] and left for the next trigger.
pub async fn handle_edit(
    state: &SharedState,
    mut edit: EditEvent,
) -> Result<EditOutcome, SyncError> {
    let relevance = classifier::classify(state.layout(), state.mode(), &edit);
    if !relevance.any() {
        debug!(game = %edit.sheet, cell = %edit.cell, "edit outside tracked cells");
        return Ok(EditOutcome::Ignored);
    }

    let store = state.store();
    ensure_game(state, &edit.sheet).await?;
    let _guard = state.lock_game(&edit.sheet).await;

    if edit.old_value.is_none() {
        edit.old_value = Some(store.read_cell(&edit.sheet, edit.cell).await?);
    }
    store
        .write_cell(&edit.sheet, edit.cell, edit.value.clone())
        .await?;

    let changed = match state.mode() {
        SyncMode::Mirror => true,
        SyncMode::Ledger if state.layout().is_output_cell(edit.cell) => {
            info!(game = %edit.sheet, cell = %edit.cell, "output cell edited directly");
            true
        }
        SyncMode::Ledger => {
            let mut changed = false;
            if relevance.affects_balance {
                let changes =
                    ledger::apply_toggle(store, state.layout(), state.toggles(), &edit).await?;
                changed |= !changes.is_empty();
            }
            if relevance.affects_tickets {
                tickets::recompute(store, state.layout(), &edit.sheet).await?;
                changed = true;
            }
            changed
        }
    };

    if !changed {
        debug!(game = %edit.sheet, cell = %edit.cell, "edit left derived state unchanged");
        return Ok(EditOutcome::Unchanged { relevance });
    }

    info!(game = %edit.sheet, cell = %edit.cell, "data changed; sending update");
    let snapshot = snapshot_service::build_snapshot(store, state.layout(), &edit.sheet).await?;
    match state.dispatcher().publish_snapshot(&snapshot).await {
        Ok(()) => Ok(EditOutcome::Published {
            relevance,
            snapshot,
        }),
        Err(error) => Ok(EditOutcome::PublishFailed {
            relevance,
            snapshot,
            error,
        }),
    }
}

/// Snapshot and publish one game on demand.
pub async fn sync_game(state: &SharedState, game: &str) -> Result<GameSnapshot, SyncError> {
    ensure_game(state, game).await?;
    let _guard = state.lock_game(game).await;
    let snapshot = snapshot_service::build_snapshot(state.store(), state.layout(), game).await?;
    state.dispatcher().publish_snapshot(&snapshot).await?;
    Ok(snapshot)
}

// Lock and toggle bookkeeping is only created for games the workbook knows.
async fn ensure_game(state: &SharedState, game: &str) -> Result<(), SyncError> {
    if state.store().has_sheet(game).await? {
        Ok(())
    } else {
        Err(SyncError::NotFound {
            game: game.to_string(),
        })
    }
}

/// Publish every game (and optionally the game list), isolating failures per game.
///
/// Only failing to enumerate the games is an error; everything else lands in the report.
pub async fn full_sync(state: &SharedState, include_game_list: bool) -> Result<SyncReport, SyncError> {
    let games = state.store().list_sheets().await?;
    state.retain_games(&games);
    let mut report = SyncReport {
        games: games.clone(),
        ..SyncReport::default()
    };

    if include_game_list {
        report.game_list = Some(state.dispatcher().publish_game_list(&games).await);
    }

    for game in &games {
        let _guard = state.lock_game(game).await;
        let SnapshotBatch {
            snapshots,
            failures,
        } = snapshot_service::snapshot_games(
            state.store(),
            state.layout(),
            std::slice::from_ref(game),
        )
        .await;

        for (game, error) in failures {
            report.failures.push(GameFailure { game, error });
        }
        for snapshot in snapshots {
            match state.dispatcher().publish_snapshot(&snapshot).await {
                Ok(()) => report.published.push(snapshot.game),
                Err(err) => report.failures.push(GameFailure {
                    game: snapshot.game,
                    error: err.into(),
                }),
            }
        }
    }

    state.mark_full_sync(SystemTime::now()).await;
    if report.failures.is_empty() {
        info!(games = report.games.len(), "full sync complete");
    } else {
        warn!(
            games = report.games.len(),
            failed = report.failures.len(),
            "full sync finished with failures"
        );
    }
    Ok(report)
}
