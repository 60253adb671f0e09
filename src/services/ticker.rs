use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{error, info};

use crate::{services::sync_service, state::SharedState};

/// Initial sync: publish the game list, then every game.
pub async fn run_setup(state: &SharedState) {
    info!("running initial sync");
    match sync_service::full_sync(state, true).await {
        Ok(report) => {
            if let Some(Err(err)) = &report.game_list {
                error!(error = %err, "failed to publish game list during setup");
            }
        }
        Err(err) => error!(error = %err, "initial sync failed"),
    }
}

/// Spawn the fallback loop that republishes every game each `period`.
///
/// The loop stops on its own once the application state is dropped.
pub fn spawn(state: &SharedState, period: Duration) -> JoinHandle<()> {
    let weak = Arc::downgrade(state);
    tokio::spawn(async move {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; setup already covered it.
        interval.tick().await;

        loop {
            interval.tick().await;

            let Some(state) = weak.upgrade() else {
                break;
            };

            if let Err(err) = sync_service::full_sync(&state, false).await {
                error!(error = %err, "periodic sync failed; will retry next tick");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::{
        config::{RetryPolicy, SyncMode},
        services::dispatcher::SyncDispatcher,
        state::{AppState, layout::SheetLayout},
        test_support::{carnival_store, spawn_receiver},
    };

    #[tokio::test]
    async fn ticks_republish_every_game() {
        let store = carnival_store("Darts").await;
        let receiver = spawn_receiver(StatusCode::OK).await;
        let dispatcher =
            SyncDispatcher::new(&receiver.base_url, Duration::from_secs(2), RetryPolicy::none())
                .unwrap();
        let state = AppState::new(
            Arc::new(store),
            dispatcher,
            SheetLayout::default(),
            SyncMode::Ledger,
        );

        let handle = spawn(&state, Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.abort();

        let requests = receiver.requests();
        assert!(!requests.is_empty());
        assert!(
            requests
                .iter()
                .all(|request| request.path == "/webhook/update_game")
        );
        assert!(state.last_full_sync().await.is_some());
    }

    #[tokio::test]
    async fn setup_sends_game_list_first() {
        let store = carnival_store("Darts").await;
        let receiver = spawn_receiver(StatusCode::OK).await;
        let dispatcher =
            SyncDispatcher::new(&receiver.base_url, Duration::from_secs(2), RetryPolicy::none())
                .unwrap();
        let state = AppState::new(
            Arc::new(store),
            dispatcher,
            SheetLayout::default(),
            SyncMode::Ledger,
        );

        run_setup(&state).await;

        let paths = receiver
            .requests()
            .into_iter()
            .map(|request| request.path)
            .collect::<Vec<_>>();
        assert_eq!(paths, vec!["/webhook/update_sheets", "/webhook/update_game"]);
    }
}
