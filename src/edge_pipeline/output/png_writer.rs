use std::io::{Cursor, Write};
use image::{ImageFormat, RgbImage};
use tracing::debug;
use crate::edge_pipeline::common::error::{EdgeError, Result};
use crate::edge_pipeline::output::writer::RasterWriter;
use crate::edge_pipeline::raster::RasterBuffer;

pub struct PngRasterWriter;

impl RasterWriter for PngRasterWriter {
    fn write_raster(&self, raster: &RasterBuffer, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding PNG image: {}x{}", raster.width(), raster.height());

        let invalid = || EdgeError::EncodeError(format!(
            "{}x{} exceeds PNG dimension limits",
            raster.width(),
            raster.height()
        ));
        let width = u32::try_from(raster.width()).map_err(|_| invalid())?;
        let height = u32::try_from(raster.height()).map_err(|_| invalid())?;
        let image = RgbImage::from_raw(width, height, raster.samples().to_vec())
            .ok_or_else(invalid)?;

        // The encoder needs Seek, so encode into memory first.
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| EdgeError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("PNG encoding complete");
        Ok(())
    }
}
