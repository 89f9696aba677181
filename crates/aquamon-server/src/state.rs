use crate::config::ServerConfig;
use aquamon_storage::Store;
use std::sync::Arc;

/// Shared per-process state, cloned into every handler by axum. The store is
/// the only stateful collaborator; everything else is configuration.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub jwt_secret: Arc<String>,
    pub token_expire_secs: u64,
    pub config: Arc<ServerConfig>,
}
