use crate::access::AccessGate;
use crate::config::Config;
use crate::service::ListService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub list_service: ListService,
    pub gate: AccessGate,
    pub config: Arc<Config>,
}
