pub mod image_decoder;
pub mod metrics;
pub mod providers;

pub use image_decoder::{decode_data_url, decode_data_url_blocking, ImageError};
