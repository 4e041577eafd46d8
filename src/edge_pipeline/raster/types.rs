//! Raster buffer types

use crate::edge_pipeline::common::error::{EdgeError, Result};

/// Samples per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// Owned RGB raster, row-major and channel-interleaved.
///
/// Sample `(y * width + x) * 3 + c` holds channel `c` of pixel `(x, y)`.
/// The length invariant is checked by every constructor, so a value of this
/// type always describes a valid image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl RasterBuffer {
    /// Wraps existing samples, failing with `InvalidDimension` when the
    /// dimensions are zero or do not match the buffer length.
    pub fn from_raw(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        let expected = expected_len(width, height, samples.len())?;
        if samples.len() != expected {
            return Err(EdgeError::InvalidDimension {
                width,
                height,
                len: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    /// Number of samples in one row.
    pub fn row_stride(&self) -> usize {
        self.width * CHANNELS
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.width + x) * CHANNELS + c
    }

    #[inline]
    pub fn sample(&self, x: usize, y: usize, c: usize) -> u8 {
        self.samples[self.index(x, y, c)]
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; CHANNELS] {
        let i = self.index(x, y, 0);
        [self.samples[i], self.samples[i + 1], self.samples[i + 2]]
    }

    /// Samples of rows `[row_start, row_end)`.
    pub fn rows(&self, row_start: usize, row_end: usize) -> &[u8] {
        let stride = self.row_stride();
        &self.samples[row_start * stride..row_end * stride]
    }
}

/// `width * height * 3`, or `InvalidDimension` for zero sizes and overflow.
/// `len` is only used to fill in the error.
pub(crate) fn expected_len(width: usize, height: usize, len: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(EdgeError::InvalidDimension { width, height, len });
    }
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or(EdgeError::InvalidDimension { width, height, len })
}

/// Zero-filled sample buffer; reports allocation failure instead of aborting.
pub(crate) fn allocate_samples(len: usize) -> Result<Vec<u8>> {
    let mut samples = Vec::new();
    samples.try_reserve_exact(len).map_err(|e| {
        EdgeError::ResourceExhaustion(format!("{} byte raster: {}", len, e))
    })?;
    samples.resize(len, 0);
    Ok(samples)
}
