//! Edge detection pipeline module
//!
//! Sobel and Prewitt filters over flat RGB rasters, split into raster I/O,
//! the filters themselves, result writers and orchestration.

pub mod raster;
pub mod filters;
pub mod output;
pub mod config;
pub mod conversions;
pub mod common;

pub use common::{
    EdgeError,
    Result,
};

pub use raster::{
    RasterBuffer,
    RasterReader,
    BinaryRasterReader,
    ImageRasterReader,
    ResizeFilter,
};

pub use filters::{
    EdgeFilter,
    FilterOutputs,
    GradientMode,
    BandScheduler,
    run_filters,
};

pub use output::{
    RasterWriter,
    BinaryRasterWriter,
    PngRasterWriter,
};

pub use config::{EdgeConfig, EdgeConfigBuilder};

pub use conversions::{
    EdgeDetectionPipeline,
    ImageEdgeWorkflow,
    OutputPaths,
    PipelineTimings,
    WorkflowReport,
};
