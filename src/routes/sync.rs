use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::{
        sync::{GameListResponse, GameSyncResponse, SyncResponse},
        webhook::GameUpdatePayload,
    },
    error::{AppError, SyncError},
    services::sync_service,
    state::SharedState,
};

/// Routes forcing synchronisation and listing games.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games))
        .route("/sync", post(sync_all))
        .route("/sync/{game}", post(sync_game))
}

/// List every game known to the workbook.
#[utoipa::path(
    get,
    path = "/games",
    tag = "sync",
    responses((status = 200, description = "Game names in workbook order", body = GameListResponse))
)]
pub async fn list_games(
    State(state): State<SharedState>,
) -> Result<Json<GameListResponse>, AppError> {
    let sheet_names = state
        .store()
        .list_sheets()
        .await
        .map_err(SyncError::from)?;
    Ok(Json(GameListResponse { sheet_names }))
}

/// Publish the game list and every game snapshot.
#[utoipa::path(
    post,
    path = "/sync",
    tag = "sync",
    responses((status = 200, description = "Sync report", body = SyncResponse))
)]
pub async fn sync_all(State(state): State<SharedState>) -> Result<Json<SyncResponse>, AppError> {
    let report = sync_service::full_sync(&state, true).await?;
    Ok(Json(report.into()))
}

/// Publish one game snapshot.
#[utoipa::path(
    post,
    path = "/sync/{game}",
    tag = "sync",
    params(("game" = String, Path, description = "Name of the game sheet")),
    responses(
        (status = 200, description = "Snapshot delivered", body = GameSyncResponse),
        (status = 404, description = "Unknown game"),
        (status = 503, description = "Dashboard unreachable")
    )
)]
pub async fn sync_game(
    State(state): State<SharedState>,
    Path(game): Path<String>,
) -> Result<Json<GameSyncResponse>, AppError> {
    let snapshot = sync_service::sync_game(&state, &game).await?;
    Ok(Json(GameSyncResponse(GameUpdatePayload::from(&snapshot))))
}
