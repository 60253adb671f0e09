use tracing::warn;

use crate::{
    dao::sheet_store::SheetStore,
    error::SyncError,
    services::read_number,
    state::{game::GameSnapshot, layout::SheetLayout},
};

/// Outcome of snapshotting every game: what could be read plus what could not.
#[derive(Debug, Default)]
pub struct SnapshotBatch {
    /// Games read successfully.
    pub snapshots: Vec<GameSnapshot>,
    /// Games that could not be read, with the reason.
    pub failures: Vec<(String, SyncError)>,
}

/// Read the current balances and ticket totals of one game.
///
/// Reads each output cell once; it does not recompute anything.
pub async fn build_snapshot(
    store: &dyn SheetStore,
    layout: &SheetLayout,
    game: &str,
) -> Result<GameSnapshot, SyncError> {
    if !store.has_sheet(game).await? {
        return Err(SyncError::NotFound {
            game: game.to_string(),
        });
    }

    let [team1, team2] = layout.tracks();
    Ok(GameSnapshot {
        game: game.to_string(),
        team1_balance: read_number(store, game, team1.balance_cell).await?,
        team2_balance: read_number(store, game, team2.balance_cell).await?,
        team1_tickets: read_number(store, game, team1.tickets_cell).await?,
        team2_tickets: read_number(store, game, team2.tickets_cell).await?,
    })
}

/// Snapshot every known game, carrying on past games that fail.
///
/// Only a failure to list the games aborts the batch.
pub async fn build_all_snapshots(
    store: &dyn SheetStore,
    layout: &SheetLayout,
) -> Result<SnapshotBatch, SyncError> {
    let games = store.list_sheets().await?;
    Ok(snapshot_games(store, layout, &games).await)
}

/// Snapshot the named games in order, collecting per-game failures.
pub async fn snapshot_games(
    store: &dyn SheetStore,
    layout: &SheetLayout,
    games: &[String],
) -> SnapshotBatch {
    let mut batch = SnapshotBatch::default();
    for game in games {
        match build_snapshot(store, layout, game).await {
            Ok(snapshot) => batch.snapshots.push(snapshot),
            Err(err) => {
                warn!(game = %game, error = %err, "skipping game snapshot");
                batch.failures.push((game.clone(), err));
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::{CellRef, CellValue, col},
        test_support::carnival_store,
    };

    #[tokio::test]
    async fn reads_the_four_output_cells() {
        let store = carnival_store("Darts").await;
        store
            .write_cell("Darts", CellRef::new(col::B, 10), CellValue::from("12"))
            .await
            .unwrap();

        let snapshot = build_snapshot(&store, &SheetLayout::default(), "Darts")
            .await
            .unwrap();

        assert_eq!(
            snapshot,
            GameSnapshot {
                game: "Darts".into(),
                team1_balance: 500.0,
                team2_balance: 300.0,
                team1_tickets: 0.0,
                team2_tickets: 12.0,
            }
        );
    }

    #[tokio::test]
    async fn unknown_game_is_not_found() {
        let store = carnival_store("Darts").await;
        let err = build_snapshot(&store, &SheetLayout::default(), "Ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::NotFound { ref game } if game == "Ghost"));
    }

    #[tokio::test]
    async fn batch_skips_corrupt_games() {
        let store = carnival_store("Ring Toss").await;
        for game in ["Darts", "Duck Pond"] {
            store
                .insert_sheet(game, [(CellRef::new(col::A, 3), CellValue::Number(100.0))])
                .await;
        }
        store
            .write_cell("Darts", CellRef::new(col::B, 3), CellValue::from("broken"))
            .await
            .unwrap();

        let batch = build_all_snapshots(&store, &SheetLayout::default())
            .await
            .unwrap();

        let names = batch
            .snapshots
            .iter()
            .map(|snapshot| snapshot.game.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Ring Toss", "Duck Pond"]);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].0, "Darts");
        assert!(matches!(batch.failures[0].1, SyncError::NonNumericState { .. }));
    }

    #[tokio::test]
    async fn batch_records_games_that_vanished() {
        let store = carnival_store("Ring Toss").await;
        let games = vec!["Ring Toss".to_string(), "Removed".to_string()];

        let batch = snapshot_games(&store, &SheetLayout::default(), &games).await;

        assert_eq!(batch.snapshots.len(), 1);
        assert!(matches!(batch.failures[0].1, SyncError::NotFound { .. }));
    }
}
