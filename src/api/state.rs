use std::sync::Arc;

use crate::actions::Session;
use crate::core::AppConfig;

pub struct AppState {
    // Shared by every request so actions stay single-flight across
    // task pane instances
    pub session: Arc<Session>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: Arc::new(Session::new(config)),
        }
    }
}
