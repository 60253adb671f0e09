use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the scoreboard sync service.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::events::edit_event,
        crate::routes::sync::list_games,
        crate::routes::sync::sync_all,
        crate::routes::sync::sync_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::edit::CellLocation,
            crate::dto::edit::EditEventRequest,
            crate::dto::edit::EditResponse,
            crate::dto::sync::SyncResponse,
            crate::dto::sync::GameFailureDto,
            crate::dto::sync::GameListResponse,
            crate::dto::sync::GameSyncResponse,
            crate::dto::webhook::GameUpdatePayload,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "events", description = "Edit notifications from the workbook"),
        (name = "sync", description = "Forced synchronisation with the dashboard"),
    )
)]
pub struct ApiDoc;
