pub mod errors;
pub mod extension_policy;
pub mod metadata;
pub mod stored_name;
pub mod upload;
