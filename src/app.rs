use axum::{
    Router,
    http::{
        HeaderValue,
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN},
    },
    routing::{MethodRouter, any, get},
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::routes;
use crate::state::AppState;

fn api_methods() -> MethodRouter<AppState> {
    get(handlers::list_handler)
        .post(handlers::add_handler)
        .delete(handlers::remove_handler)
        .fallback(handlers::unsupported_method_handler)
}

/// Assemble every route of the service
///
/// `/` and `/{code}` answer every method. A single trailing slash is accepted
/// on the page and API paths; repeated slashes are not collapsed.
pub fn build_router(state: AppState) -> Router {
    // Cross-origin headers go on every API response, errors and 405s included
    let api = Router::new()
        .route(routes::API, api_methods())
        .route(routes::API_SLASH, api_methods())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ));

    Router::new()
        .route(routes::ROOT, any(handlers::banner_handler))
        .route(routes::HEALTH, get(handlers::health_handler))
        .route(routes::ADMIN, any(handlers::admin_handler))
        .route(routes::ADMIN_SLASH, any(handlers::admin_handler))
        .merge(api)
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .fallback(handlers::not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::test_app;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let (app, _) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc: serde_json::Value = super::test_support::body_json(response).await;
        assert!(doc["paths"]["/api/{code}"]["get"].is_object());
        assert!(doc["paths"]["/api/{code}"]["post"].is_object());
        assert!(doc["paths"]["/api/{code}"]["delete"].is_object());
    }
}
