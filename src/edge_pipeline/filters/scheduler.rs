//! Row-band scheduler.
//!
//! Rows are split into contiguous bands, one per worker. Both output buffers
//! are carved into matching disjoint slices up front, so every output index
//! has exactly one writer and the workers share nothing mutable.

use std::ops::Range;

use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::edge_pipeline::common::error::{EdgeError, Result};
use crate::edge_pipeline::filters::convolution::apply_band;
use crate::edge_pipeline::filters::kernels::EdgeFilter;
use crate::edge_pipeline::filters::types::{FilterOutputs, GradientMode};
use crate::edge_pipeline::raster::types::allocate_samples;
use crate::edge_pipeline::raster::RasterBuffer;

/// Splits `height` rows into at most `workers` contiguous, non-empty bands.
///
/// Every band holds `height / n` rows and the first `height % n` bands get one
/// more, where `n = min(workers, height)` (at least 1).
pub fn row_bands(height: usize, workers: usize) -> Vec<Range<usize>> {
    let n = workers.clamp(1, height.max(1));
    let base = height / n;
    let extra = height % n;

    let mut start = 0;
    (0..n)
        .map(|i| {
            let len = base + usize::from(i < extra);
            let band = start..start + len;
            start += len;
            band
        })
        .collect()
}

/// Carves `buf` into one slice per band.
fn split_bands<'a>(
    mut buf: &'a mut [u8],
    bands: &[Range<usize>],
    stride: usize,
) -> Result<Vec<&'a mut [u8]>> {
    let mut parts = Vec::with_capacity(bands.len());
    for band in bands {
        let len = band.len() * stride;
        if len > buf.len() {
            return Err(EdgeError::WorkerFailure(format!(
                "band {}..{} runs past the output buffer",
                band.start, band.end
            )));
        }
        let (head, tail) = std::mem::take(&mut buf).split_at_mut(len);
        parts.push(head);
        buf = tail;
    }
    if !buf.is_empty() {
        return Err(EdgeError::WorkerFailure(format!(
            "{} output samples not covered by any band",
            buf.len()
        )));
    }
    Ok(parts)
}

#[derive(Debug, Clone, Copy)]
pub struct BandScheduler {
    workers: usize,
    mode: GradientMode,
}

impl Default for BandScheduler {
    fn default() -> Self {
        Self::new(rayon::current_num_threads())
    }
}

impl BandScheduler {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            mode: GradientMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: GradientMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn mode(&self) -> GradientMode {
        self.mode
    }

    /// Runs Sobel and Prewitt over `input` and returns both results.
    ///
    /// Output is byte-identical for every worker count. A failing band aborts
    /// the run and no output is returned.
    #[instrument(skip(self, input), fields(
        width = input.width(),
        height = input.height(),
        workers = self.workers,
    ))]
    pub fn run_filters(&self, input: &RasterBuffer) -> Result<FilterOutputs> {
        self.run_with_bands(input, row_bands(input.height(), self.workers))
    }

    /// Runs both filters with one pool thread per band in `bands`.
    ///
    /// The first band error stops the run and is returned as is.
    fn run_with_bands(&self, input: &RasterBuffer, bands: Vec<Range<usize>>) -> Result<FilterOutputs> {
        let width = input.width();
        let height = input.height();
        let stride = input.row_stride();
        debug!(bands = bands.len(), mode = ?self.mode, "Partitioned rows into bands");

        let len = input.samples().len();
        let mut sobel = allocate_samples(len)?;
        let mut prewitt = allocate_samples(len)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(bands.len().max(1))
            .thread_name(|i| format!("edge-band-{i}"))
            .build()
            .map_err(|e| EdgeError::ResourceExhaustion(format!("thread pool: {}", e)))?;

        let sobel_parts = split_bands(&mut sobel, &bands, stride)?;
        let prewitt_parts = split_bands(&mut prewitt, &bands, stride)?;
        let mode = self.mode;

        pool.install(|| {
            bands
                .par_iter()
                .cloned()
                .zip(sobel_parts.into_par_iter())
                .zip(prewitt_parts.into_par_iter())
                .try_for_each(|((rows, sobel_dst), prewitt_dst)| {
                    trace!("Processing rows {}..{}", rows.start, rows.end);
                    apply_band(input, EdgeFilter::Sobel, mode, rows.clone(), sobel_dst)?;
                    apply_band(input, EdgeFilter::Prewitt, mode, rows, prewitt_dst)
                })
        })?;

        Ok(FilterOutputs {
            sobel: RasterBuffer::from_raw(width, height, sobel)?,
            prewitt: RasterBuffer::from_raw(width, height, prewitt)?,
        })
    }
}

/// Runs both filters with one worker per rayon thread.
pub fn run_filters(input: &RasterBuffer) -> Result<FilterOutputs> {
    BandScheduler::default().run_filters(input)
}
