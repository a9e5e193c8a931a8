use std::sync::Arc;

use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, admin_token: Option<String>) -> Self {
        Self {
            store,
            admin_token: admin_token.map(Arc::from),
        }
    }

    pub fn requires_token(&self) -> bool {
        self.admin_token.is_some()
    }

    pub fn is_token_valid(&self, token: &str) -> bool {
        self.admin_token
            .as_deref()
            .is_some_and(|expected| expected == token)
    }
}
