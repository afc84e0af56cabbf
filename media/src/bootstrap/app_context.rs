use std::sync::Arc;

use crate::application::ports::metadata_extractor::MetadataExtractor;
use crate::application::ports::storage_port::StoragePort;
use crate::bootstrap::config::Config;
use crate::infrastructure::metadata::ImageHeaderExtractor;
use crate::infrastructure::storage::FsStoragePort;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    storage_port: Arc<dyn StoragePort>,
    metadata_extractor: Arc<dyn MetadataExtractor>,
}

impl AppServices {
    pub fn new(
        storage_port: Arc<dyn StoragePort>,
        metadata_extractor: Arc<dyn MetadataExtractor>,
    ) -> Self {
        Self {
            storage_port,
            metadata_extractor,
        }
    }

    /// Filesystem storage and header-based metadata, wired from `cfg`.
    pub fn from_config(cfg: &Config) -> Self {
        let storage_port: Arc<dyn StoragePort> = Arc::new(FsStoragePort::new(
            &cfg.public_path,
            &cfg.upload_path,
        ));
        let metadata_extractor: Arc<dyn MetadataExtractor> = Arc::new(
            ImageHeaderExtractor::new(storage_port.clone(), cfg.metadata_read_limit),
        );
        Self::new(storage_port, metadata_extractor)
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn storage_port(&self) -> Arc<dyn StoragePort> {
        self.services.storage_port.clone()
    }

    pub fn metadata_extractor(&self) -> Arc<dyn MetadataExtractor> {
        self.services.metadata_extractor.clone()
    }
}
