use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::edge_pipeline::common::error::{EdgeError, Result};
use crate::edge_pipeline::config::EdgeConfig;
use crate::edge_pipeline::conversions::{EdgeDetectionPipeline, ImageEdgeWorkflow};
use crate::edge_pipeline::filters::{run_filters, GradientMode};
use crate::edge_pipeline::output::{BinaryRasterWriter, RasterWriter};
use crate::edge_pipeline::raster::{BinaryRasterReader, RasterBuffer, RasterReader, ResizeFilter};

struct MockReader {
    should_fail: bool,
}

impl RasterReader for MockReader {
    fn read_raster(&self, data: Vec<u8>, width: usize, height: usize) -> Result<RasterBuffer> {
        if self.should_fail {
            return Err(EdgeError::DecodeError("Mock decode error".to_string()));
        }
        BinaryRasterReader.read_raster(data, width, height)
    }
}

struct MockWriter {
    fail_on_call: Option<usize>,
    calls: AtomicUsize,
    written_data: Arc<Mutex<Vec<RasterBuffer>>>,
}

impl MockWriter {
    fn new(fail_on_call: Option<usize>) -> Self {
        Self {
            fail_on_call,
            calls: AtomicUsize::new(0),
            written_data: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl RasterWriter for MockWriter {
    fn write_raster(&self, raster: &RasterBuffer, output: &mut dyn Write) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_call == Some(call) {
            output.write_all(&raster.samples()[..1])?;
            return Err(EdgeError::OutputWriteError("Mock write error".to_string()));
        }
        self.written_data.lock().unwrap().push(raster.clone());
        output.write_all(raster.samples())?;
        Ok(())
    }
}

fn test_samples(width: usize, height: usize) -> Vec<u8> {
    (0..width * height * 3)
        .map(|i| ((i * 7919) % 256) as u8)
        .collect()
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn write_input(dir: &Path, samples: &[u8]) -> std::path::PathBuf {
    let path = dir.join("input_binary.bin");
    std::fs::write(&path, samples).unwrap();
    path
}

#[test]
fn test_detect_matches_scheduler() {
    let samples = test_samples(6, 4);
    let pipeline = EdgeDetectionPipeline::new(EdgeConfig::default());

    let outputs = pipeline.detect(samples.clone(), 6, 4).unwrap();

    let raster = RasterBuffer::from_raw(6, 4, samples).unwrap();
    assert_eq!(outputs, run_filters(&raster).unwrap());
}

#[test]
fn test_detect_with_timings_records_steps() {
    let samples = test_samples(3, 3);
    let pipeline = EdgeDetectionPipeline::new(EdgeConfig::default());

    let (_, timings) = pipeline.detect_with_timings(samples, 3, 3).unwrap();

    for step in ["validate_dimensions", "decode_raster", "run_filters"] {
        assert!(timings.get_step(step).is_some(), "missing step {step}");
    }
}

#[test]
fn test_detect_file_writes_both_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let samples = test_samples(8, 5);
    let input = write_input(dir.path(), &samples);

    let pipeline = EdgeDetectionPipeline::new(EdgeConfig::default());
    let paths = pipeline.detect_file(&input, dir.path(), 8, 5).unwrap();

    assert_eq!(paths.sobel, dir.path().join("sobel_output.bin"));
    assert_eq!(paths.prewitt, dir.path().join("prewitt_output.bin"));

    let expected = run_filters(&RasterBuffer::from_raw(8, 5, samples).unwrap()).unwrap();
    assert_eq!(std::fs::read(&paths.sobel).unwrap(), expected.sobel.samples());
    assert_eq!(std::fs::read(&paths.prewitt).unwrap(), expected.prewitt.samples());
    assert_eq!(
        dir_entries(dir.path()),
        vec!["input_binary.bin", "prewitt_output.bin", "sobel_output.bin"]
    );
}

#[test]
fn test_configured_output_names() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &test_samples(2, 2));

    let config = EdgeConfig::builder()
        .sobel_file_name("a.raw")
        .prewitt_file_name("b.raw")
        .build();
    let pipeline = EdgeDetectionPipeline::new(config);
    let paths = pipeline.detect_file(&input, dir.path(), 2, 2).unwrap();

    assert!(paths.sobel.ends_with("a.raw"));
    assert!(paths.prewitt.ends_with("b.raw"));
    assert!(paths.sobel.exists());
    assert!(paths.prewitt.exists());
}

#[test]
fn test_worker_count_does_not_change_files() {
    let samples = test_samples(13, 9);
    let mut results = Vec::new();

    for workers in [1, 2, 4, 8] {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), &samples);
        let config = EdgeConfig::builder().workers(Some(workers)).build();
        let paths = EdgeDetectionPipeline::new(config)
            .detect_file(&input, dir.path(), 13, 9)
            .unwrap();
        results.push((
            std::fs::read(&paths.sobel).unwrap(),
            std::fs::read(&paths.prewitt).unwrap(),
        ));
    }

    for result in &results[1..] {
        assert_eq!(result, &results[0]);
    }
}

#[test]
fn test_reader_failure() {
    let writer = MockWriter::new(None);
    let written = writer.written_data.clone();
    let pipeline = EdgeDetectionPipeline::with_custom(
        MockReader { should_fail: true },
        writer,
        EdgeConfig::default(),
    );

    let result = pipeline.detect(test_samples(2, 2), 2, 2);

    assert!(matches!(result.unwrap_err(), EdgeError::DecodeError(_)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_zero_width_produces_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &[]);

    let pipeline = EdgeDetectionPipeline::new(EdgeConfig::default());
    let result = pipeline.detect_file(&input, dir.path(), 0, 4);

    assert!(matches!(result.unwrap_err(), EdgeError::InvalidDimension { width: 0, .. }));
    assert_eq!(dir_entries(dir.path()), vec!["input_binary.bin"]);
}

#[test]
fn test_wrong_length_produces_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &test_samples(4, 4));

    let pipeline = EdgeDetectionPipeline::new(EdgeConfig::default());
    let result = pipeline.detect_file(&input, dir.path(), 5, 4);

    assert!(matches!(result.unwrap_err(), EdgeError::InvalidDimension { len: 48, .. }));
    assert_eq!(dir_entries(dir.path()), vec!["input_binary.bin"]);
}

#[test]
fn test_max_dimension() {
    let config = EdgeConfig::builder().max_dimension(Some(8)).build();
    let pipeline = EdgeDetectionPipeline::new(config);

    assert!(pipeline.validate_dimensions(8, 8).is_ok());
    assert!(matches!(
        pipeline.validate_dimensions(9, 2),
        Err(EdgeError::InvalidDimension { .. })
    ));

    let unlimited = EdgeDetectionPipeline::new(EdgeConfig::builder().max_dimension(None).build());
    assert!(unlimited.validate_dimensions(100_000, 1).is_ok());
}

#[test]
fn test_second_write_failure_leaves_no_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &test_samples(4, 3));

    let pipeline = EdgeDetectionPipeline::with_custom(
        MockReader { should_fail: false },
        MockWriter::new(Some(1)),
        EdgeConfig::default(),
    );
    let result = pipeline.detect_file(&input, dir.path(), 4, 3);

    assert!(matches!(result.unwrap_err(), EdgeError::OutputWriteError(_)));
    assert_eq!(dir_entries(dir.path()), vec!["input_binary.bin"]);
}

#[test]
fn test_missing_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &test_samples(2, 2));

    let pipeline = EdgeDetectionPipeline::new(EdgeConfig::default());
    let result = pipeline.detect_file(&input, dir.path().join("missing"), 2, 2);

    assert!(matches!(result.unwrap_err(), EdgeError::OutputWriteError(_)));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = EdgeDetectionPipeline::new(EdgeConfig::default());
    let result = pipeline.detect_file(dir.path().join("nope.bin"), dir.path(), 2, 2);

    assert!(matches!(result.unwrap_err(), EdgeError::InputReadError(_)));
}

#[test]
fn test_write_outputs_with_binary_writer() {
    let dir = tempfile::tempdir().unwrap();
    let samples = test_samples(3, 2);
    let outputs = run_filters(&RasterBuffer::from_raw(3, 2, samples).unwrap()).unwrap();

    let pipeline = EdgeDetectionPipeline::with_custom(
        BinaryRasterReader,
        BinaryRasterWriter,
        EdgeConfig::default(),
    );
    let paths = pipeline.write_outputs(&outputs, dir.path()).unwrap();

    assert_eq!(std::fs::read(paths.sobel).unwrap(), outputs.sobel.samples());
}

#[test]
fn test_image_workflow_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let source = image::RgbImage::from_fn(12, 10, |x, _y| {
        if x < 6 { image::Rgb([0, 0, 0]) } else { image::Rgb([200, 100, 50]) }
    });
    let image_path = dir.path().join("stripes.png");
    source.save(&image_path).unwrap();

    let out_dir = dir.path().join("results");
    let workflow = ImageEdgeWorkflow::new(EdgeConfig::default());
    let report = workflow.run(&image_path, &out_dir, 12, 10).unwrap();

    assert_eq!(report.binary_path, out_dir.join("stripes_binary.bin"));
    assert_eq!(std::fs::read(&report.binary_path).unwrap(), source.as_raw().as_slice());
    assert_eq!(
        report.png_paths,
        vec![out_dir.join("sobel_output.png"), out_dir.join("prewitt_output.png")]
    );

    let sobel_bin = std::fs::read(&report.outputs.sobel).unwrap();
    let sobel_png = image::open(&report.png_paths[0]).unwrap().to_rgb8().into_raw();
    assert_eq!(sobel_bin, sobel_png);

    // Column 6 sits right of the edge; its interior rows must be non-zero.
    let sobel = RasterBuffer::from_raw(12, 10, sobel_bin).unwrap();
    assert_ne!(sobel.pixel(6, 5), [0, 0, 0]);
    assert_eq!(sobel.pixel(2, 5), [0, 0, 0]);

    assert!(report.timings.get_step("run_filters").is_some());
    assert!(report.timings.get_step("render_png").is_some());
}

#[test]
fn test_image_workflow_without_png() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("flat.png");
    image::RgbImage::from_pixel(20, 20, image::Rgb([9, 9, 9]))
        .save(&image_path)
        .unwrap();

    let config = EdgeConfig::builder()
        .write_png(false)
        .mode(GradientMode::ColorCoded)
        .resize_filter(ResizeFilter::Nearest)
        .build();
    let report = ImageEdgeWorkflow::new(config)
        .run(&image_path, dir.path(), 5, 4)
        .unwrap();

    assert!(report.png_paths.is_empty());
    assert_eq!(std::fs::read(&report.binary_path).unwrap().len(), 5 * 4 * 3);
    // A flat image has no gradients anywhere in color-coded mode.
    let prewitt = std::fs::read(&report.outputs.prewitt).unwrap();
    assert!(prewitt.iter().all(|&s| s == 0));
}

#[test]
fn test_image_workflow_rejects_zero_size_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("never");
    let result = ImageEdgeWorkflow::new(EdgeConfig::default())
        .run(dir.path().join("missing.png"), &out_dir, 0, 10);

    assert!(matches!(result.unwrap_err(), EdgeError::InvalidDimension { .. }));
    assert!(!out_dir.exists());
}

#[test]
fn test_mock_writer_receives_both_rasters() {
    let writer = MockWriter::new(None);
    let written = writer.written_data.clone();
    let pipeline = EdgeDetectionPipeline::with_custom(
        MockReader { should_fail: false },
        writer,
        EdgeConfig::default(),
    );

    let outputs = pipeline.detect(test_samples(3, 3), 3, 3).unwrap();
    let dir = tempfile::tempdir().unwrap();
    pipeline.write_outputs(&outputs, dir.path()).unwrap();

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0], outputs.sobel);
    assert_eq!(written[1], outputs.prewitt);

    let mut sink = Cursor::new(Vec::new());
    BinaryRasterWriter.write_raster(&written[0], &mut sink).unwrap();
    assert_eq!(sink.into_inner(), outputs.sobel.samples());
}

#[test]
fn test_identical_output_names_rejected_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &test_samples(4, 4));

    let config = EdgeConfig::builder()
        .sobel_file_name("edges.bin")
        .prewitt_file_name("edges.bin")
        .build();
    let pipeline = EdgeDetectionPipeline::new(config);
    let result = pipeline.detect_file(&input, dir.path(), 4, 4);

    assert!(matches!(result.unwrap_err(), EdgeError::InvalidConfig(_)));
    assert_eq!(dir_entries(dir.path()), vec!["input_binary.bin"]);

    let outputs = run_filters(&RasterBuffer::from_raw(4, 4, test_samples(4, 4)).unwrap()).unwrap();
    assert!(matches!(
        pipeline.write_outputs(&outputs, dir.path()),
        Err(EdgeError::InvalidConfig(_))
    ));
    assert_eq!(dir_entries(dir.path()), vec!["input_binary.bin"]);
}

#[test]
fn test_names_sharing_a_stem_only_collide_when_rendering_png() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("flat.png");
    image::RgbImage::from_pixel(4, 4, image::Rgb([9, 9, 9]))
        .save(&image_path)
        .unwrap();
    let builder = || {
        EdgeConfig::builder()
            .sobel_file_name("out.bin")
            .prewitt_file_name("out.raw")
    };

    let out_dir = dir.path().join("with_png");
    let result = ImageEdgeWorkflow::new(builder().build()).run(&image_path, &out_dir, 4, 4);
    assert!(matches!(result.unwrap_err(), EdgeError::InvalidConfig(_)));
    assert!(!out_dir.exists());

    let out_dir = dir.path().join("without_png");
    let report = ImageEdgeWorkflow::new(builder().write_png(false).build())
        .run(&image_path, &out_dir, 4, 4)
        .unwrap();
    assert!(report.outputs.sobel.exists());
    assert!(report.outputs.prewitt.exists());
}

#[test]
fn test_binary_raster_name_must_not_match_an_output() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("sobel.png");
    image::RgbImage::from_pixel(4, 4, image::Rgb([9, 9, 9]))
        .save(&image_path)
        .unwrap();

    let config = EdgeConfig::builder()
        .sobel_file_name("sobel_binary.bin")
        .build();
    let out_dir = dir.path().join("results");
    let result = ImageEdgeWorkflow::new(config).run(&image_path, &out_dir, 4, 4);

    assert!(matches!(result.unwrap_err(), EdgeError::InvalidConfig(_)));
    assert!(!out_dir.exists());
}
