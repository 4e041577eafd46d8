//! End-to-end run on a compressed image.
//!
//! The image is decoded, resized and stored as a binary raster next to the
//! results, both filters run in-process on that file, and each result is
//! optionally rendered back to PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::edge_pipeline::{
    common::error::{EdgeError, Result},
    config::EdgeConfig,
    conversions::edge_detection::{EdgeDetectionPipeline, OutputPaths},
    conversions::timing::{PipelineTimings, Timer},
    filters::EdgeFilter,
    output::{BinaryRasterWriter, PngRasterWriter, RasterWriter},
    raster::{BinaryRasterReader, ImageRasterReader, RasterBuffer, RasterReader, read_file},
};

#[derive(Debug)]
pub struct WorkflowReport {
    /// Binary raster of the resized source image
    pub binary_path: PathBuf,
    pub outputs: OutputPaths,
    /// Rendered results, empty when PNG output is disabled
    pub png_paths: Vec<PathBuf>,
    pub timings: PipelineTimings,
}

pub struct ImageEdgeWorkflow {
    pipeline: EdgeDetectionPipeline<BinaryRasterReader, BinaryRasterWriter>,
}

impl ImageEdgeWorkflow {
    pub fn new(config: EdgeConfig) -> Self {
        Self {
            pipeline: EdgeDetectionPipeline::new(config),
        }
    }

    pub fn config(&self) -> &EdgeConfig {
        self.pipeline.config()
    }

    #[instrument(skip(self, input_image, output_dir))]
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_image: P,
        output_dir: Q,
        width: usize,
        height: usize,
    ) -> Result<WorkflowReport> {
        let input_image = input_image.as_ref();
        let output_dir = output_dir.as_ref();
        let config = self.config();
        let mut timings = PipelineTimings::new();

        self.pipeline.validate_dimensions(width, height)?;
        config.validate_output_names(config.write_png)?;
        let binary_path = config.binary_path(output_dir, input_image);
        self.check_binary_name(&binary_path)?;

        std::fs::create_dir_all(output_dir).map_err(|e| {
            EdgeError::OutputWriteError(format!("{}: {}", output_dir.display(), e))
        })?;

        let timer = Timer::start("read_image");
        let image_bytes = read_file(input_image)?;
        timings.record(timer);

        let timer = Timer::start("decode_resize_image");
        let raster = {
            let _span = tracing::info_span!("decode_resize_image").entered();
            ImageRasterReader::new(config.resize_filter).read_raster(image_bytes, width, height)?
        };
        timings.record(timer);

        let timer = Timer::start("write_binary_raster");
        write_raster_file(&BinaryRasterWriter, &raster, &binary_path)?;
        timings.record(timer);
        info!(
            "Image '{}' saved as binary data in '{}'",
            input_image.display(),
            binary_path.display()
        );

        let (outputs, filter_timings) =
            self.pipeline
                .detect_file_with_timings(&binary_path, output_dir, width, height)?;
        timings.extend(filter_timings);

        let mut png_paths = Vec::new();
        if config.write_png {
            let timer = Timer::start("render_png");
            for filter in EdgeFilter::ALL {
                let png_path = output_dir.join(config.png_file_name(filter));
                png_paths.push(render_png(outputs.get(filter), &png_path, width, height)?);
            }
            timings.record(timer);
        }

        info!(
            "Workflow complete: {}x{} in {:.3}ms",
            width,
            height,
            timings.total_duration().as_secs_f64() * 1000.0
        );

        Ok(WorkflowReport {
            binary_path,
            outputs,
            png_paths,
            timings,
        })
    }

    /// The source raster must not be overwritten by, or overwrite, a result.
    fn check_binary_name(&self, binary_path: &Path) -> Result<()> {
        let config = self.config();
        let Some(name) = binary_path.file_name() else {
            return Err(EdgeError::InvalidConfig(format!(
                "no binary file name for '{}'",
                binary_path.display()
            )));
        };
        for filter in EdgeFilter::ALL {
            let png_name = config.png_file_name(filter);
            let collides = name == config.file_name(filter)
                || (config.write_png && name == png_name.as_os_str());
            if collides {
                return Err(EdgeError::InvalidConfig(format!(
                    "binary raster '{}' collides with the {} output",
                    binary_path.display(),
                    filter
                )));
            }
        }
        Ok(())
    }
}

fn write_raster_file(writer: &dyn RasterWriter, raster: &RasterBuffer, path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| EdgeError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
    let mut output = BufWriter::new(file);
    writer.write_raster(raster, &mut output)?;
    output.flush()?;
    Ok(())
}

/// Reads a result raster back from disk and saves it as PNG.
fn render_png(binary_path: &Path, png_path: &Path, width: usize, height: usize) -> Result<PathBuf> {
    let data = read_file(binary_path)?;
    let raster = BinaryRasterReader.read_raster(data, width, height)?;

    write_raster_file(&PngRasterWriter, &raster, png_path)?;
    info!("Result rendered to '{}'", png_path.display());
    Ok(png_path.to_path_buf())
}
