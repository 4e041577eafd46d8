//! Edge filter module
//!
//! 3×3 gradient kernels, the per-band convolution engine and the row-band
//! scheduler that runs both filters across a rayon thread pool.

pub mod kernels;
pub mod convolution;
pub mod scheduler;
pub mod types;

pub use kernels::{
    EdgeFilter, Kernel, PREWITT_X, PREWITT_Y, SOBEL_X, SOBEL_Y,
};
pub use convolution::{apply_color_coded, apply_filter, apply_filter_into, gradient_magnitude};
pub use scheduler::{row_bands, run_filters, BandScheduler};
pub use types::{FilterOutputs, GradientMode};
