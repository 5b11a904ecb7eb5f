use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

pub const BANNER: &str = "TV Interface Manager";

const ADMIN_TEMPLATE: &str = include_str!("admin.html");
const CODE_PLACEHOLDER: &str = "__ACCESS_CODE_JSON__";

/// GET / handler - Static banner
pub async fn banner_handler() -> &'static str {
    BANNER
}

/// GET /{code} handler - Admin page bound to the given access code
pub async fn admin_handler(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    if !state.gate.allows(&code) {
        tracing::warn!("Rejected admin page request with invalid access code");
        return (StatusCode::FORBIDDEN, "Invalid access code").into_response();
    }

    Html(render_admin_page(&code)).into_response()
}

/// Fallback for every unrouted path
pub async fn not_found_handler() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Embed `code` into the page script as a JSON string literal
fn render_admin_page(code: &str) -> String {
    // serde_json never fails on a &str; `<` is escaped so the literal can't close the script tag
    let literal = serde_json::to_string(code)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c");
    ADMIN_TEMPLATE.replace(CODE_PLACEHOLDER, &literal)
}
