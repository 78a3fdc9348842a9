use std::sync::Arc;

use crate::{api::Backend, cart::CartRegistry};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub carts: CartRegistry,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            carts: CartRegistry::new(),
        }
    }
}
