mod paths;
mod storage_port_impl;
pub use paths::*;
pub use storage_port_impl::FsStoragePort;
