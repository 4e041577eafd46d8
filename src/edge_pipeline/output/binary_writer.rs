use std::io::Write;
use tracing::debug;
use crate::edge_pipeline::common::error::Result;
use crate::edge_pipeline::output::writer::RasterWriter;
use crate::edge_pipeline::raster::RasterBuffer;

/// Writes the samples as-is: no header, `width * height * 3` bytes.
pub struct BinaryRasterWriter;

impl RasterWriter for BinaryRasterWriter {
    fn write_raster(&self, raster: &RasterBuffer, output: &mut dyn Write) -> Result<()> {
        debug!("Writing binary raster: {}x{}", raster.width(), raster.height());
        output.write_all(raster.samples())?;
        output.flush()?;
        Ok(())
    }
}
