use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::payload::Payload,
    models::announcement::{row_id, AnnouncementPayload, DeletePayload},
    services::metrics,
    AppState,
};

/// Render the outcome and count it under `operation`.
fn respond<T: IntoResponse>(operation: &'static str, result: Result<T, AppError>) -> Response {
    let response = result.into_response();
    metrics::record(operation, response.status());
    response
}

/// GET /announcements — every row, unordered.
pub async fn list_announcements(State(state): State<AppState>) -> Response {
    let result = state
        .store
        .list()
        .await
        .map(Json)
        .map_err(|e| {
            AppError::store("Error al obtener anuncios", e, state.config.expose_error_details)
        });
    respond("list", result)
}

/// POST /announcements
pub async fn create_announcement(
    State(state): State<AppState>,
    body: Result<Payload<AnnouncementPayload>, AppError>,
) -> Response {
    respond("create", create(&state, body).await)
}

async fn create(
    state: &AppState,
    body: Result<Payload<AnnouncementPayload>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Payload(body) = body?;
    let input = body.validate()?;

    let announcement = state.store.create(&input).await.map_err(|e| {
        AppError::store("Error al crear anuncio", e, state.config.expose_error_details)
    })?;
    tracing::info!("Announcement {} created", announcement.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Anuncio creado correctamente",
            "announcement": announcement,
        })),
    ))
}

/// PUT /announcements/{id} — replaces title, description and date.
pub async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Payload<AnnouncementPayload>, AppError>,
) -> Response {
    respond("update", update(&state, &id, body).await)
}

async fn update(
    state: &AppState,
    id: &str,
    body: Result<Payload<AnnouncementPayload>, AppError>,
) -> Result<Json<Value>, AppError> {
    let Payload(body) = body?;
    let input = body.validate()?;
    // A path segment that is not an integer cannot match any row.
    let id = row_id(&Value::String(id.to_owned())).ok_or(AppError::NotFound)?;

    let announcement = state.store.update(id, &input).await.map_err(|e| {
        AppError::store("Error al actualizar anuncio", e, state.config.expose_error_details)
    })?;
    tracing::info!("Announcement {} updated", id);

    Ok(Json(json!({
        "message": "Anuncio actualizado correctamente",
        "announcement": announcement,
    })))
}

/// DELETE /announcements — the id travels in the body, not the path.
pub async fn delete_announcement(
    State(state): State<AppState>,
    body: Result<Payload<DeletePayload>, AppError>,
) -> Response {
    respond("delete", delete(&state, body).await)
}

async fn delete(
    state: &AppState,
    body: Result<Payload<DeletePayload>, AppError>,
) -> Result<Json<Value>, AppError> {
    let Payload(body) = body?;
    tracing::info!("Announcement to delete: {:?}", body.id);

    let id = body.target()?.ok_or(AppError::NotFound)?;

    state.store.delete(id).await.map_err(|e| {
        AppError::store("Error al eliminar el anuncio", e, state.config.expose_error_details)
    })?;

    Ok(Json(json!({ "message": "Anuncio eliminado correctamente" })))
}
