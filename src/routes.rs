// Route path constants - single source of truth for all paths

pub const ROOT: &str = "/";
pub const HEALTH: &str = "/health";
pub const ADMIN: &str = "/{code}";
pub const ADMIN_SLASH: &str = "/{code}/";
pub const API: &str = "/api/{code}";
pub const API_SLASH: &str = "/api/{code}/";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
