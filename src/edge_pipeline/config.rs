//! Edge pipeline configuration types

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::edge_pipeline::common::error::{EdgeError, Result};
use crate::edge_pipeline::filters::{EdgeFilter, GradientMode};
use crate::edge_pipeline::raster::ResizeFilter;

/// Configuration for edge detection runs
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    /// Number of row bands processed in parallel. `None` uses the rayon
    /// pool's thread count.
    pub workers: Option<usize>,
    /// Largest accepted width or height
    pub max_dimension: Option<usize>,
    /// How gradient components become output samples
    pub mode: GradientMode,
    /// File name of the Sobel raster inside the output directory
    pub sobel_file_name: String,
    /// File name of the Prewitt raster inside the output directory
    pub prewitt_file_name: String,
    /// Appended to the source image stem to name its binary raster
    pub binary_suffix: String,
    /// Resampling used when a source image has to be resized
    pub resize_filter: ResizeFilter,
    /// Whether the image workflow also renders each output raster as PNG
    pub write_png: bool,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            workers: None,
            max_dimension: Some(50000),
            mode: GradientMode::Magnitude,
            sobel_file_name: "sobel_output.bin".to_string(),
            prewitt_file_name: "prewitt_output.bin".to_string(),
            binary_suffix: "_binary".to_string(),
            resize_filter: ResizeFilter::CatmullRom,
            write_png: true,
        }
    }
}

impl EdgeConfig {
    pub fn builder() -> EdgeConfigBuilder {
        EdgeConfigBuilder::default()
    }

    pub fn file_name(&self, filter: EdgeFilter) -> &str {
        match filter {
            EdgeFilter::Sobel => &self.sobel_file_name,
            EdgeFilter::Prewitt => &self.prewitt_file_name,
        }
    }

    pub fn output_path(&self, output_dir: &Path, filter: EdgeFilter) -> PathBuf {
        output_dir.join(self.file_name(filter))
    }

    /// Raster file name with its extension replaced by `png`.
    pub fn png_file_name(&self, filter: EdgeFilter) -> PathBuf {
        Path::new(self.file_name(filter)).with_extension("png")
    }

    /// Checks that every file a run produces gets its own name.
    ///
    /// Each output name must be a plain file name (no separators, not empty,
    /// not `.` or `..`). The rasters must not share a name, and with
    /// `with_png` neither may their PNG renders, with each other or with a
    /// raster.
    pub fn validate_output_names(&self, with_png: bool) -> Result<()> {
        let mut produced: Vec<PathBuf> = Vec::with_capacity(4);
        for filter in EdgeFilter::ALL {
            let name = self.file_name(filter);
            if Path::new(name).file_name() != Some(OsStr::new(name)) {
                return Err(EdgeError::InvalidConfig(format!(
                    "{} output name '{}' is not a plain file name",
                    filter, name
                )));
            }
            produced.push(PathBuf::from(name));
        }
        if with_png {
            for filter in EdgeFilter::ALL {
                produced.push(self.png_file_name(filter));
            }
        }

        for (i, name) in produced.iter().enumerate() {
            if produced[..i].contains(name) {
                return Err(EdgeError::InvalidConfig(format!(
                    "output file '{}' would be written twice",
                    name.display()
                )));
            }
        }
        Ok(())
    }

    /// `<dir>/<stem><binary_suffix>.bin` for a source image path.
    pub fn binary_path(&self, output_dir: &Path, image_path: &Path) -> PathBuf {
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        output_dir.join(format!("{}{}.bin", stem, self.binary_suffix))
    }
}

/// Builder for EdgeConfig
#[derive(Default)]
pub struct EdgeConfigBuilder {
    workers: Option<Option<usize>>,
    max_dimension: Option<Option<usize>>,
    mode: Option<GradientMode>,
    sobel_file_name: Option<String>,
    prewitt_file_name: Option<String>,
    binary_suffix: Option<String>,
    resize_filter: Option<ResizeFilter>,
    write_png: Option<bool>,
}

impl EdgeConfigBuilder {
    pub fn workers(mut self, workers: Option<usize>) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn mode(mut self, mode: GradientMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn sobel_file_name(mut self, name: impl Into<String>) -> Self {
        self.sobel_file_name = Some(name.into());
        self
    }

    pub fn prewitt_file_name(mut self, name: impl Into<String>) -> Self {
        self.prewitt_file_name = Some(name.into());
        self
    }

    pub fn binary_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.binary_suffix = Some(suffix.into());
        self
    }

    pub fn resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = Some(filter);
        self
    }

    pub fn write_png(mut self, enable: bool) -> Self {
        self.write_png = Some(enable);
        self
    }

    pub fn build(self) -> EdgeConfig {
        let default = EdgeConfig::default();
        EdgeConfig {
            workers: self.workers.unwrap_or(default.workers),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            mode: self.mode.unwrap_or(default.mode),
            sobel_file_name: self.sobel_file_name.unwrap_or(default.sobel_file_name),
            prewitt_file_name: self.prewitt_file_name.unwrap_or(default.prewitt_file_name),
            binary_suffix: self.binary_suffix.unwrap_or(default.binary_suffix),
            resize_filter: self.resize_filter.unwrap_or(default.resize_filter),
            write_png: self.write_png.unwrap_or(default.write_png),
        }
    }
}
