//! Reader for headerless binary raster files.

use tracing::debug;
use crate::edge_pipeline::common::error::Result;
use crate::edge_pipeline::raster::reader::RasterReader;
use crate::edge_pipeline::raster::types::RasterBuffer;

/// Reads raw `width * height * 3` byte files (row-major, RGB interleaved).
///
/// The file carries no header, so the dimensions come from the caller and a
/// file of any other length is rejected with `InvalidDimension`.
pub struct BinaryRasterReader;

impl RasterReader for BinaryRasterReader {
    fn read_raster(&self, data: Vec<u8>, width: usize, height: usize) -> Result<RasterBuffer> {
        debug!("Reading binary raster {}x{} from {} bytes", width, height, data.len());
        RasterBuffer::from_raw(width, height, data)
    }
}
