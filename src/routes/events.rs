use axum::{Json, Router, extract::State, routing::post};
use tracing::warn;
use validator::Validate;

use crate::{
    dto::edit::{EditEventRequest, EditResponse},
    error::AppError,
    services::sync_service,
    state::{SharedState, game::EditEvent},
};

/// Routes receiving edit notifications from the host workbook.
pub fn router() -> Router<SharedState> {
    Router::new().route("/events/edit", post(edit_event))
}

/// Run the sync pipeline for one cell edit.
#[utoipa::path(
    post,
    path = "/events/edit",
    tag = "events",
    request_body = EditEventRequest,
    responses(
        (status = 200, description = "Edit processed", body = EditResponse),
        (status = 400, description = "Malformed edit"),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Balance cell is not numeric")
    )
)]
pub async fn edit_event(
    State(state): State<SharedState>,
    Json(payload): Json<EditEventRequest>,
) -> Result<Json<EditResponse>, AppError> {
    payload.validate()?;
    let edit = EditEvent::try_from(payload)?;
    let game = edit.sheet.clone();

    let outcome = sync_service::handle_edit(&state, edit)
        .await
        .inspect_err(|err| warn!(game = %game, error = %err, "edit pipeline failed"))?;
    Ok(Json(outcome.into()))
}
