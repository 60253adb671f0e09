use serde::Serialize;
use utoipa::ToSchema;

use crate::{dto::webhook::GameUpdatePayload, services::sync_service::SyncReport};

/// One game that could not be published.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameFailureDto {
    /// Game that failed.
    pub game: String,
    /// Why it failed.
    pub message: String,
}

/// Result of a forced full sync.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncResponse {
    /// Number of games found in the workbook.
    pub games: usize,
    /// Whether the game list reached the dashboard; absent when it was not sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_list_published: Option<bool>,
    /// Games whose snapshot was delivered.
    pub published: Vec<String>,
    /// Games that could not be read or delivered.
    pub failures: Vec<GameFailureDto>,
}

impl From<SyncReport> for SyncResponse {
    fn from(report: SyncReport) -> Self {
        Self {
            games: report.games.len(),
            game_list_published: report.game_list.map(|result| result.is_ok()),
            published: report.published,
            failures: report
                .failures
                .into_iter()
                .map(|failure| GameFailureDto {
                    game: failure.game,
                    message: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

/// Names of every game in the workbook.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameListResponse {
    /// Game names in workbook order.
    pub sheet_names: Vec<String>,
}

/// Snapshot that was just delivered for one game.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct GameSyncResponse(pub GameUpdatePayload);
