use std::sync::Arc;

use crate::core::currency::RateService;
use crate::store::MemStore;

/// Shared application state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub rate_service: Arc<RateService>,
    pub store: Arc<MemStore>,
}

impl AppState {
    pub fn new(rate_service: Arc<RateService>, store: Arc<MemStore>) -> Self {
        Self {
            rate_service,
            store,
        }
    }
}
