//! Pipeline conversions module
//!
//! Orchestration of the edge filters: binary raster in, two rasters out, and
//! the full image workflow around it.

mod edge_detection;
mod image_workflow;
mod timing;

#[cfg(test)]
mod tests;

pub use edge_detection::{EdgeDetectionPipeline, OutputPaths};
pub use image_workflow::{ImageEdgeWorkflow, WorkflowReport};
pub use timing::{PipelineTimings, StepTiming, Timer};
