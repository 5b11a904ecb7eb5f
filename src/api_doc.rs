use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{
    AddEntryRequest, AddEntryResponse, Entry, RemoveEntryRequest, RemoveEntryResponse, UrlList,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "tv-list API",
        version = "1.0.0",
        description = "A shared list of named TV interface URLs behind a single access code"
    ),
    paths(
        handlers::health::health_handler,
        handlers::api::list_handler,
        handlers::api::add_handler,
        handlers::api::remove_handler
    ),
    components(
        schemas(
            Entry,
            UrlList,
            AddEntryRequest,
            AddEntryResponse,
            RemoveEntryRequest,
            RemoveEntryResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "list", description = "URL list operations")
    )
)]
pub struct ApiDoc;
