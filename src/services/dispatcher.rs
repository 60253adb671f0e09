use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, RetryPolicy},
    dto::webhook::{GameUpdatePayload, SheetListPayload},
    error::TransportError,
    state::game::GameSnapshot,
};

const UPDATE_GAME_PATH: &str = "/webhook/update_game";
const UPDATE_SHEETS_PATH: &str = "/webhook/update_sheets";

/// Pushes game snapshots and the game list to the dashboard webhooks.
///
/// Failures come back as [`TransportError`] values; nothing here panics or aborts the
/// caller, so the next edit or periodic tick is free to try again.
#[derive(Clone)]
pub struct SyncDispatcher {
    client: Client,
    base_url: Arc<str>,
    retry: RetryPolicy,
}

impl SyncDispatcher {
    /// Build a dispatcher targeting `base_url` with a per-request timeout.
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|source| TransportError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(base_url.trim_end_matches('/')),
            retry,
        })
    }

    /// Build a dispatcher from the application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        Self::new(
            &config.webhook_base_url,
            config.request_timeout,
            config.retry,
        )
    }

    /// Send one game's balances and ticket totals.
    pub async fn publish_snapshot(&self, snapshot: &GameSnapshot) -> Result<(), TransportError> {
        let payload = GameUpdatePayload::from(snapshot);
        self.post_json(UPDATE_GAME_PATH, &payload).await?;
        info!(
            game = %payload.game,
            team1_balance = %payload.team1_balance,
            team2_balance = %payload.team2_balance,
            team1_tickets = %payload.team1_tickets,
            team2_tickets = %payload.team2_tickets,
            "game snapshot published"
        );
        Ok(())
    }

    /// Send the names of every known game.
    pub async fn publish_game_list(&self, names: &[String]) -> Result<(), TransportError> {
        self.post_json(UPDATE_SHEETS_PATH, &SheetListPayload { sheet_names: names })
            .await?;
        info!(count = names.len(), "game list published");
        Ok(())
    }

    async fn post_json<T>(&self, path: &str, payload: &T) -> Result<(), TransportError>
    where
        T: ?Sized + Serialize,
    {
        let mut attempt = 1;
        loop {
            match self.post_once(path, payload).await {
                Ok(()) => return Ok(()),
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        path,
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %err,
                        "webhook delivery failed; retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(path, attempt, error = %err, "webhook delivery failed");
                    return Err(err);
                }
            }
        }
    }

    async fn post_once<T>(&self, path: &str, payload: &T) -> Result<(), TransportError>
    where
        T: ?Sized + Serialize,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    TransportError::Timeout {
                        path: path.to_string(),
                    }
                } else {
                    TransportError::RequestSend {
                        path: path.to_string(),
                        source,
                    }
                }
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(TransportError::RequestStatus {
                path: path.to_string(),
                status: response.status(),
            })
        }
    }
}
