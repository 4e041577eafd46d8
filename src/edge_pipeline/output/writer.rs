use std::io::Write;
use crate::edge_pipeline::common::error::Result;
use crate::edge_pipeline::raster::RasterBuffer;

pub trait RasterWriter {
    fn write_raster(&self, raster: &RasterBuffer, output: &mut dyn Write) -> Result<()>;
}
