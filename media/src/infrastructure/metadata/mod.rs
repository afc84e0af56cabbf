mod image_header;
pub use image_header::{ImageHeaderExtractor, probe_image};
