//! Raster reader backed by the `image` crate.
//!
//! Decodes any enabled compressed format (PNG, JPEG), drops alpha and other
//! color layouts by converting to 8-bit RGB, and resizes to the requested
//! resolution so the result matches the binary raster layout exactly.

use tracing::debug;
use image::imageops::{self, FilterType};
use crate::edge_pipeline::common::error::{EdgeError, Result};
use crate::edge_pipeline::raster::reader::RasterReader;
use crate::edge_pipeline::raster::types::{expected_len, RasterBuffer};

/// Resampling filter applied when the decoded image size differs from the
/// requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    /// Bicubic
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Debug, Default)]
pub struct ImageRasterReader {
    filter: ResizeFilter,
}

impl ImageRasterReader {
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }
}

impl RasterReader for ImageRasterReader {
    fn read_raster(&self, data: Vec<u8>, width: usize, height: usize) -> Result<RasterBuffer> {
        expected_len(width, height, 0)?;
        let invalid = || EdgeError::InvalidDimension { width, height, len: 0 };
        let target_w = u32::try_from(width).map_err(|_| invalid())?;
        let target_h = u32::try_from(height).map_err(|_| invalid())?;

        debug!("Decoding image, {} bytes", data.len());
        let decoded = image::load_from_memory(&data)
            .map_err(|e| EdgeError::DecodeError(e.to_string()))?;
        let rgb = decoded.to_rgb8();

        let rgb = if rgb.dimensions() == (target_w, target_h) {
            rgb
        } else {
            debug!(
                "Resizing {}x{} -> {}x{} with {:?}",
                rgb.width(),
                rgb.height(),
                target_w,
                target_h,
                self.filter
            );
            imageops::resize(&rgb, target_w, target_h, self.filter.into())
        };

        RasterBuffer::from_raw(width, height, rgb.into_raw())
    }
}
