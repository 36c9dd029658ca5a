use std::sync::Arc;

use bs_models::ModelRegistry;

pub struct AppState {
    pub registry: Arc<ModelRegistry>,
}
