use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::edge_pipeline::common::error::{EdgeError, Result};
use crate::edge_pipeline::raster::types::RasterBuffer;

pub trait RasterReader {
    /// Takes ownership of `data` so readers that keep the bytes as samples
    /// need no second copy.
    fn read_raster(&self, data: Vec<u8>, width: usize, height: usize) -> Result<RasterBuffer>;
}

/// Reads a whole input file, reserving its length up front.
///
/// A file too large to buffer is reported as `ResourceExhaustion` instead of
/// aborting the process.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let read_error = |e: std::io::Error| EdgeError::InputReadError(format!("{}: {}", path.display(), e));

    let mut file = File::open(path).map_err(read_error)?;
    let len = file.metadata().map_err(read_error)?.len();
    let len = usize::try_from(len).map_err(|_| {
        EdgeError::ResourceExhaustion(format!("{}: {} byte file", path.display(), len))
    })?;

    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        EdgeError::ResourceExhaustion(format!("{}: {} byte file: {}", path.display(), len, e))
    })?;
    file.read_to_end(&mut data).map_err(read_error)?;
    Ok(data)
}
