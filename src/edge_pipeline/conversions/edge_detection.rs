use tracing::{info, instrument, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::edge_pipeline::{
    common::error::{EdgeError, Result},
    config::EdgeConfig,
    conversions::timing::{PipelineTimings, Timer},
    filters::{BandScheduler, EdgeFilter, FilterOutputs},
    output::{BinaryRasterWriter, RasterWriter},
    raster::{BinaryRasterReader, RasterReader, read_file},
};

/// Where a run left its two result files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub sobel: PathBuf,
    pub prewitt: PathBuf,
}

impl OutputPaths {
    pub fn get(&self, filter: EdgeFilter) -> &Path {
        match filter {
            EdgeFilter::Sobel => &self.sobel,
            EdgeFilter::Prewitt => &self.prewitt,
        }
    }
}

pub struct EdgeDetectionPipeline<R: RasterReader, W: RasterWriter> {
    reader: R,
    writer: W,
    config: EdgeConfig,
}

impl EdgeDetectionPipeline<BinaryRasterReader, BinaryRasterWriter> {
    pub fn new(config: EdgeConfig) -> Self {
        Self {
            reader: BinaryRasterReader,
            writer: BinaryRasterWriter,
            config,
        }
    }
}

impl<R: RasterReader, W: RasterWriter> EdgeDetectionPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: EdgeConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Rejects zero sizes and sizes above `max_dimension` before any I/O.
    pub fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(EdgeError::InvalidDimension { width, height, len: 0 });
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(
                    "Image dimensions {}x{} exceed maximum {}",
                    width, height, max
                );
                return Err(EdgeError::InvalidDimension { width, height, len: 0 });
            }
        }

        Ok(())
    }

    pub fn scheduler(&self) -> BandScheduler {
        let scheduler = match self.config.workers {
            Some(workers) => BandScheduler::new(workers),
            None => BandScheduler::default(),
        };
        scheduler.with_mode(self.config.mode)
    }

    /// Decodes `input_data` as a `width`×`height` raster and runs both filters.
    pub fn detect(&self, input_data: Vec<u8>, width: usize, height: usize) -> Result<FilterOutputs> {
        let (outputs, timings) = self.detect_with_timings(input_data, width, height)?;
        info!(
            "Filters complete: {}x{} in {:.3}ms",
            width,
            height,
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(outputs)
    }

    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn detect_with_timings(
        &self,
        input_data: Vec<u8>,
        width: usize,
        height: usize,
    ) -> Result<(FilterOutputs, PipelineTimings)> {
        let mut timings = PipelineTimings::new();

        let timer = Timer::start("validate_dimensions");
        self.validate_dimensions(width, height)?;
        timings.record(timer);

        let timer = Timer::start("decode_raster");
        let raster = {
            let _span = tracing::info_span!("decode_raster").entered();
            self.reader.read_raster(input_data, width, height)?
        };
        timings.record(timer);

        let timer = Timer::start("run_filters");
        let outputs = {
            let _span = tracing::info_span!("run_filters").entered();
            self.scheduler().run_filters(&raster)?
        };
        timings.record(timer);

        Ok((outputs, timings))
    }

    /// Writes both rasters into `output_dir` under the configured names.
    ///
    /// Each raster goes to a temporary file in `output_dir` first; the files
    /// are renamed into place only once both are complete. If a rename fails,
    /// outputs already renamed by this call are removed again, so the caller
    /// sees both files or neither. Names that would collide are rejected
    /// before anything is created.
    #[instrument(skip(self, outputs, output_dir), fields(output_dir = %output_dir.display()))]
    pub fn write_outputs(&self, outputs: &FilterOutputs, output_dir: &Path) -> Result<OutputPaths> {
        self.config.validate_output_names(false)?;

        let mut staged = Vec::with_capacity(EdgeFilter::ALL.len());
        for (filter, raster) in outputs.iter() {
            let mut file = NamedTempFile::new_in(output_dir).map_err(|e| {
                EdgeError::OutputWriteError(format!("{}: {}", output_dir.display(), e))
            })?;
            self.writer.write_raster(raster, &mut file)?;
            file.flush()?;
            staged.push((filter, file));
        }

        let mut persisted: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (filter, file) in staged {
            let target = self.config.output_path(output_dir, filter);
            if let Err(e) = file.persist(&target) {
                for path in &persisted {
                    let _ = std::fs::remove_file(path);
                }
                return Err(EdgeError::OutputWriteError(format!(
                    "{}: {}",
                    target.display(),
                    e.error
                )));
            }
            info!("{} output saved to '{}'", filter, target.display());
            persisted.push(target);
        }

        Ok(OutputPaths {
            sobel: self.config.output_path(output_dir, EdgeFilter::Sobel),
            prewitt: self.config.output_path(output_dir, EdgeFilter::Prewitt),
        })
    }

    pub fn detect_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
        width: usize,
        height: usize,
    ) -> Result<OutputPaths> {
        let (paths, timings) = self.detect_file_with_timings(input_path, output_dir, width, height)?;
        info!(
            "Edge detection complete: {}x{} in {:.3}ms",
            width,
            height,
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(paths)
    }

    #[instrument(skip(self, input_path, output_dir))]
    pub fn detect_file_with_timings<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
        width: usize,
        height: usize,
    ) -> Result<(OutputPaths, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let input_path = input_path.as_ref();
        let output_dir = output_dir.as_ref();

        info!(
            input = %input_path.display(),
            output_dir = %output_dir.display(),
            "Running edge filters"
        );

        self.validate_dimensions(width, height)?;
        self.config.validate_output_names(false)?;

        let timer = Timer::start("read_input_file");
        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            read_file(input_path)?
        };
        timings.record(timer);

        let (outputs, detect_timings) = self.detect_with_timings(input_data, width, height)?;
        timings.extend(detect_timings);

        let timer = Timer::start("write_outputs");
        let paths = self.write_outputs(&outputs, output_dir)?;
        timings.record(timer);

        Ok((paths, timings))
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }
}
