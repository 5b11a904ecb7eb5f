use crate::error::{ApiError, ErrorResponse};
use crate::models::{AddEntryRequest, AddEntryResponse, RemoveEntryRequest, RemoveEntryResponse, UrlList};
use crate::routes;
use crate::state::AppState;
use axum::{Json, body::Bytes, extract::Path, extract::State, http::StatusCode};

/// Reject the request unless `code` is the configured access code
fn authorize(state: &AppState, code: &str) -> Result<(), ApiError> {
    if state.gate.allows(code) {
        Ok(())
    } else {
        tracing::warn!("Rejected API request with invalid access code");
        Err(ApiError::Forbidden)
    }
}

/// GET /api/{code} handler - Return the whole list
#[utoipa::path(
    get,
    path = routes::API,
    params(
        ("code" = String, Path, description = "Shared access code")
    ),
    responses(
        (status = 200, description = "Current list in insertion order", body = UrlList),
        (status = 403, description = "Invalid access code", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "list"
)]
pub async fn list_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<(StatusCode, Json<UrlList>), ApiError> {
    authorize(&state, &code)?;

    let list = state.list_service.list_entries().await?;
    tracing::debug!("Listed {} entries", list.urls.len());
    Ok((StatusCode::OK, Json(list)))
}

/// POST /api/{code} handler - Append an entry
///
/// The body is parsed as JSON whatever its `Content-Type`.
#[utoipa::path(
    post,
    path = routes::API,
    params(
        ("code" = String, Path, description = "Shared access code")
    ),
    request_body = AddEntryRequest,
    responses(
        (status = 200, description = "Entry appended", body = AddEntryResponse),
        (status = 400, description = "Missing url or name, or malformed JSON", body = ErrorResponse),
        (status = 403, description = "Invalid access code", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "list"
)]
pub async fn add_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<AddEntryResponse>), ApiError> {
    authorize(&state, &code)?;

    let request: AddEntryRequest = serde_json::from_slice(&body)?;
    let entry = state
        .list_service
        .append_entry(
            request.url.as_deref().unwrap_or_default(),
            request.name.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(AddEntryResponse {
            success: true,
            data: entry,
        }),
    ))
}

/// DELETE /api/{code} handler - Remove every entry with the given url
#[utoipa::path(
    delete,
    path = routes::API,
    params(
        ("code" = String, Path, description = "Shared access code")
    ),
    request_body = RemoveEntryRequest,
    responses(
        (status = 200, description = "Matching entries removed", body = RemoveEntryResponse),
        (status = 400, description = "Missing url or malformed JSON", body = ErrorResponse),
        (status = 403, description = "Invalid access code", body = ErrorResponse),
        (status = 404, description = "List is empty or no entry matches", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "list"
)]
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<RemoveEntryResponse>), ApiError> {
    authorize(&state, &code)?;

    let request: RemoveEntryRequest = serde_json::from_slice(&body)?;
    let removed = state
        .list_service
        .remove_entry(request.url.as_deref().unwrap_or_default())
        .await?;

    Ok((
        StatusCode::OK,
        Json(RemoveEntryResponse {
            success: true,
            message: format!("Removed {} entries", removed),
        }),
    ))
}

/// Any other method on /api/{code}
pub async fn unsupported_method_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiError {
    match authorize(&state, &code) {
        Ok(()) => ApiError::MethodNotSupported,
        Err(e) => e,
    }
}
