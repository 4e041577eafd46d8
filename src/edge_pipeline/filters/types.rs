//! Types for edge filter results

use crate::edge_pipeline::filters::kernels::EdgeFilter;
use crate::edge_pipeline::raster::RasterBuffer;

/// How the two gradient components of a pixel are turned into output samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientMode {
    /// Each channel convolved on its own; sample = `round(sqrt(gx² + gy²))`
    /// clamped to 255, with zero padding at the borders.
    #[default]
    Magnitude,
    /// Channels averaged to one intensity first; red = `|gx|`, blue = `|gy|`,
    /// green = 0, both clamped to 255. Only interior pixels are computed, the
    /// outermost ring stays black.
    ColorCoded,
}

/// One output raster per filter, each with the input's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutputs {
    pub sobel: RasterBuffer,
    pub prewitt: RasterBuffer,
}

impl FilterOutputs {
    pub fn get(&self, filter: EdgeFilter) -> &RasterBuffer {
        match filter {
            EdgeFilter::Sobel => &self.sobel,
            EdgeFilter::Prewitt => &self.prewitt,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeFilter, &RasterBuffer)> {
        EdgeFilter::ALL.into_iter().map(move |filter| (filter, self.get(filter)))
    }
}
