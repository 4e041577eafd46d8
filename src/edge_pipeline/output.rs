//! Raster output module
//!
//! Writers for filter results: the headerless binary layout and PNG.

mod writer;
mod binary_writer;
mod png_writer;

pub use writer::RasterWriter;
pub use binary_writer::BinaryRasterWriter;
pub use png_writer::PngRasterWriter;
