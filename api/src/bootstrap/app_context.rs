use std::sync::Arc;

use crate::application::ports::database_clock::DatabaseClock;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    clock: Arc<dyn DatabaseClock>,
}

impl AppContext {
    pub fn new(cfg: Config, clock: Arc<dyn DatabaseClock>) -> Self {
        Self { cfg, clock }
    }

    pub fn database_clock(&self) -> Arc<dyn DatabaseClock> {
        self.clock.clone()
    }
}
