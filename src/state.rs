//! Shared application state for all routes.

use crate::auth::AuthSettings;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, auth: AuthSettings) -> Self {
        AppState {
            store,
            auth: Arc::new(auth),
        }
    }
}
