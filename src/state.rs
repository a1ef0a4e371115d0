//! Shared application state: the injected data-access handle.

use crate::gateway::Gateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        AppState { gateway }
    }
}
