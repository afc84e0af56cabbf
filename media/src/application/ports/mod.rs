pub mod metadata_extractor;
pub mod storage_port;
