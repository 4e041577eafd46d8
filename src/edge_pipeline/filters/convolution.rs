//! 3×3 gradient convolution over a band of rows.
//!
//! Every output sample depends only on the read-only input raster, never on
//! another band's output, so any row decomposition yields identical bytes.

use std::ops::Range;

use crate::edge_pipeline::common::error::{EdgeError, Result};
use crate::edge_pipeline::filters::kernels::{EdgeFilter, Kernel};
use crate::edge_pipeline::filters::types::GradientMode;
use crate::edge_pipeline::raster::types::allocate_samples;
use crate::edge_pipeline::raster::{RasterBuffer, CHANNELS};

/// Euclidean magnitude of a gradient, rounded and clamped to `[0, 255]`.
#[inline]
pub fn gradient_magnitude(gx: i32, gy: i32) -> u8 {
    let gx = gx as f64;
    let gy = gy as f64;
    (gx * gx + gy * gy).sqrt().round().min(255.0) as u8
}

/// Convolves rows `[row_start, row_end)` of `input` with `kx`/`ky`, each
/// channel independently, and returns the gradient magnitude samples of those
/// rows.
pub fn apply_filter(
    input: &RasterBuffer,
    kx: &Kernel,
    ky: &Kernel,
    row_start: usize,
    row_end: usize,
) -> Result<Vec<u8>> {
    check_rows(input, &(row_start..row_end))?;
    let mut output = allocate_samples((row_end - row_start) * input.row_stride())?;
    apply_filter_into(input, kx, ky, row_start..row_end, &mut output)?;
    Ok(output)
}

/// Same as [`apply_filter`], writing into `dst`, which must hold exactly the
/// samples of `rows`.
pub fn apply_filter_into(
    input: &RasterBuffer,
    kx: &Kernel,
    ky: &Kernel,
    rows: Range<usize>,
    dst: &mut [u8],
) -> Result<()> {
    check_band(input, &rows, dst.len())?;

    let width = input.width();
    let height = input.height();
    let stride = input.row_stride();

    for (y, dst_row) in rows.zip(dst.chunks_exact_mut(stride)) {
        // Rows above and below the image are zero padding.
        let src_rows = [
            y.checked_sub(1).map(|yy| input.rows(yy, yy + 1)),
            Some(input.rows(y, y + 1)),
            (y + 1 < height).then(|| input.rows(y + 1, y + 2)),
        ];

        for x in 0..width {
            let mut gx = [0i32; CHANNELS];
            let mut gy = [0i32; CHANNELS];

            for (ky_i, src_row) in src_rows.iter().enumerate() {
                let Some(src_row) = src_row else { continue };
                for kx_i in 0..3 {
                    let wx = kx[ky_i][kx_i];
                    let wy = ky[ky_i][kx_i];
                    if wx == 0 && wy == 0 {
                        continue;
                    }
                    let Some(sx) = (x + kx_i).checked_sub(1).filter(|&sx| sx < width) else {
                        continue;
                    };
                    let base = sx * CHANNELS;
                    for c in 0..CHANNELS {
                        let s = src_row[base + c] as i32;
                        gx[c] += wx * s;
                        gy[c] += wy * s;
                    }
                }
            }

            let out = &mut dst_row[x * CHANNELS..(x + 1) * CHANNELS];
            for c in 0..CHANNELS {
                out[c] = gradient_magnitude(gx[c], gy[c]);
            }
        }
    }

    Ok(())
}

/// Color-coded gradients over `rows`, written into `dst`.
///
/// The kernels run on the per-pixel channel mean. Red receives `|gx|`, blue
/// `|gy|`, green stays 0. Pixels without a full 3×3 neighbourhood are black.
pub fn apply_color_coded(
    input: &RasterBuffer,
    kx: &Kernel,
    ky: &Kernel,
    rows: Range<usize>,
    dst: &mut [u8],
) -> Result<()> {
    check_band(input, &rows, dst.len())?;

    let width = input.width();
    let height = input.height();
    let stride = input.row_stride();
    let intensity = |x: usize, y: usize| -> i32 {
        let [r, g, b] = input.pixel(x, y);
        (r as i32 + g as i32 + b as i32) / 3
    };

    for (y, dst_row) in rows.zip(dst.chunks_exact_mut(stride)) {
        dst_row.fill(0);
        if y == 0 || y + 1 >= height {
            continue;
        }
        for x in 1..width.saturating_sub(1) {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for ky_i in 0..3 {
                for kx_i in 0..3 {
                    let s = intensity(x + kx_i - 1, y + ky_i - 1);
                    gx += kx[ky_i][kx_i] * s;
                    gy += ky[ky_i][kx_i] * s;
                }
            }
            let out = &mut dst_row[x * CHANNELS..(x + 1) * CHANNELS];
            out[0] = gx.unsigned_abs().min(255) as u8;
            out[2] = gy.unsigned_abs().min(255) as u8;
        }
    }

    Ok(())
}

/// Runs `filter` in the given mode over one band.
pub(crate) fn apply_band(
    input: &RasterBuffer,
    filter: EdgeFilter,
    mode: GradientMode,
    rows: Range<usize>,
    dst: &mut [u8],
) -> Result<()> {
    let (kx, ky) = filter.kernels();
    match mode {
        GradientMode::Magnitude => apply_filter_into(input, kx, ky, rows, dst),
        GradientMode::ColorCoded => apply_color_coded(input, kx, ky, rows, dst),
    }
}

fn check_rows(input: &RasterBuffer, rows: &Range<usize>) -> Result<()> {
    if rows.start > rows.end || rows.end > input.height() {
        return Err(EdgeError::WorkerFailure(format!(
            "row range {}..{} outside 0..{}",
            rows.start,
            rows.end,
            input.height()
        )));
    }
    Ok(())
}

fn check_band(input: &RasterBuffer, rows: &Range<usize>, dst_len: usize) -> Result<()> {
    check_rows(input, rows)?;
    let expected = rows.len() * input.row_stride();
    if dst_len != expected {
        return Err(EdgeError::WorkerFailure(format!(
            "band {}..{} expects {} samples, destination holds {}",
            rows.start, rows.end, expected, dst_len
        )));
    }
    Ok(())
}
