//! Raster buffer module
//!
//! Flat RGB rasters and the readers that produce them at the pipeline boundary.

mod reader;
mod binary_reader;
mod image_reader;
pub mod types;

pub use reader::{read_file, RasterReader};
pub use binary_reader::BinaryRasterReader;
pub use image_reader::{ImageRasterReader, ResizeFilter};
pub use types::{RasterBuffer, CHANNELS};
