use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use picai_core::detection::domain::face_detector::FaceDetector;
use picai_core::detection::domain::fail_soft::detect_fail_soft;
use picai_core::detection::domain::manual_marker::{DisplayGeometry, ManualMarker};
use picai_core::detection::infrastructure::description_face_detector::{
    DescriptionFaceDetector, FileDescriptionSource,
};
use picai_core::detection::infrastructure::downscaled_detector::DownscaledDetector;
use picai_core::detection::infrastructure::model_resolver;
use picai_core::detection::infrastructure::null_face_detector::NullFaceDetector;
use picai_core::detection::infrastructure::onnx_blazeface_detector::OnnxBlazefaceDetector;
use picai_core::detection::infrastructure::skip_frame_detector::SkipFrameDetector;
use picai_core::imaging::domain::image_reader::ImageReader;
use picai_core::imaging::domain::image_writer::ImageWriter;
use picai_core::imaging::infrastructure::directory_frame_source::DirectoryFrameSource;
use picai_core::imaging::infrastructure::directory_overlay_sink::DirectoryOverlaySink;
use picai_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use picai_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use picai_core::obfuscation::domain::effect_mode::EffectMode;
use picai_core::obfuscation::infrastructure::live_overlay_renderer::LiveOverlayRenderer;
use picai_core::obfuscation::infrastructure::still_obfuscator::StillObfuscator;
use picai_core::pipeline::infrastructure::threaded_live_runner::ThreadedLiveRunner;
use picai_core::pipeline::live_preview::LivePreview;
use picai_core::pipeline::obscure_photo_use_case::{ManualFace, ObscurePhotoUseCase};
use picai_core::session::photo_session::PhotoSession;
use picai_core::shared::config::PicaiConfig;
use picai_core::shared::constants::{BLAZEFACE_MODEL_NAME, IMAGE_EXTENSIONS};
use picai_core::shared::face_region::{FaceRegion, MANUAL_CONFIDENCE};
use picai_core::shared::status::{LogStatusSink, StatusMessage, StatusSink};

/// Obscure faces in photos and live frame sequences.
#[derive(Parser)]
#[command(name = "picai")]
struct Cli {
    /// Config file (defaults to <config dir>/picai/config.json when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pixelate faces in a photo and write the result.
    Obscure(ObscureArgs),
    /// Render one live-overlay frame for a photo to a PNG.
    Overlay(OverlayArgs),
    /// Replay a directory of frames as a live stream, writing each overlay.
    Live(LiveArgs),
    /// Print the effective configuration, or write it to the config file.
    Config(ConfigArgs),
}

#[derive(Args)]
struct DetectorArgs {
    /// Face source: none, blazeface or description.
    #[arg(long, default_value = "blazeface")]
    detector: String,

    /// BlazeFace ONNX model file (resolved from cache otherwise).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Directory searched for a bundled model.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Saved vision-service response used by the description detector.
    #[arg(long)]
    description: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long)]
    confidence: Option<f64>,
}

#[derive(Args)]
struct ObscureArgs {
    /// Input photo.
    input: PathBuf,

    /// Output image (JPEG is written at quality 90).
    output: PathBuf,

    /// Manually marked face: x,y on the displayed photo, or x,y,r in pixels.
    #[arg(long = "face", value_parser = parse_face)]
    faces: Vec<ManualFace>,

    /// Displayed photo size WxH used to map --face points.
    #[arg(long, value_parser = parse_display)]
    display: Option<(f64, f64)>,

    #[command(flatten)]
    detection: DetectorArgs,

    /// Smallest pixelation block in pixels.
    #[arg(long)]
    block_size: Option<u32>,

    /// Number of pixelation layers.
    #[arg(long)]
    layers: Option<u32>,

    /// Number of noise blobs per face.
    #[arg(long)]
    noise: Option<u32>,

    /// Seed for the noise pattern (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct OverlayArgs {
    /// Input frame.
    input: PathBuf,

    /// Output PNG; glyph stamps are written next to it as JSON.
    output: PathBuf,

    /// Effect: blur, smiley, sunglasses, heart_eyes, wink or cool.
    #[arg(long)]
    effect: Option<EffectMode>,

    /// Manually marked face: x,y or x,y,r in frame pixels.
    #[arg(long = "face", value_parser = parse_face)]
    faces: Vec<ManualFace>,

    #[command(flatten)]
    detection: DetectorArgs,

    /// Live pixelation block size.
    #[arg(long)]
    block_size: Option<u32>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Write the configuration to --config (or the default path) instead of printing it.
    #[arg(long)]
    write: bool,
}

#[derive(Args)]
struct LiveArgs {
    /// Directory of frames, replayed in file-name order.
    frames: PathBuf,

    /// Directory receiving overlay_NNNN.png files.
    output: PathBuf,

    /// Refresh interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Run detection every Nth tick (1 = every tick).
    #[arg(long)]
    skip: Option<usize>,

    /// Scale applied to frames before detection (0.0-1.0].
    #[arg(long)]
    scale: Option<f64>,

    /// Effect: blur, smiley, sunglasses, heart_eyes, wink or cool.
    #[arg(long)]
    effect: Option<EffectMode>,

    #[command(flatten)]
    detection: DetectorArgs,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if let Command::Config(args) = &cli.command {
        return run_config(cli.config.as_deref(), args);
    }
    let mut config = PicaiConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Config(_) => Ok(()),
        Command::Obscure(args) => {
            apply_obscure_overrides(&mut config, &args);
            config.validate()?;
            validate_input(&args.input)?;
            run_obscure(&config, args)
        }
        Command::Overlay(args) => {
            if let Some(effect) = args.effect {
                config.effect = effect;
            }
            if let Some(size) = args.block_size {
                config.live_block_size = size;
            }
            apply_detector_overrides(&mut config, &args.detection);
            config.validate()?;
            validate_input(&args.input)?;
            run_overlay(&config, args)
        }
        Command::Live(args) => {
            if let Some(ms) = args.interval_ms {
                config.tick_interval_ms = ms;
            }
            if let Some(skip) = args.skip {
                config.skip_interval = skip;
            }
            if let Some(scale) = args.scale {
                config.detection_scale = scale;
            }
            if let Some(effect) = args.effect {
                config.effect = effect;
            }
            apply_detector_overrides(&mut config, &args.detection);
            config.validate()?;
            if !args.frames.is_dir() {
                return Err(format!("Frame directory not found: {}", args.frames.display()).into());
            }
            run_live(&config, args)
        }
    }
}

fn run_config(explicit: Option<&Path>, args: &ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match explicit {
        Some(path) if !path.exists() => PicaiConfig::default(),
        _ => PicaiConfig::load_or_default(explicit)?,
    };
    if !args.write {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(PicaiConfig::default_path)
        .ok_or("Could not determine the config directory")?;
    config.save(&path)?;
    log::info!("Config written to {}", path.display());
    Ok(())
}

fn apply_obscure_overrides(config: &mut PicaiConfig, args: &ObscureArgs) {
    if let Some(size) = args.block_size {
        config.block_size = size;
    }
    if let Some(layers) = args.layers {
        config.layer_count = layers;
    }
    if let Some(noise) = args.noise {
        config.noise_blobs = noise;
    }
    if args.seed.is_some() {
        config.noise_seed = args.seed;
    }
    apply_detector_overrides(config, &args.detection);
}

fn apply_detector_overrides(config: &mut PicaiConfig, args: &DetectorArgs) {
    if let Some(confidence) = args.confidence {
        config.confidence = confidence;
    }
}

fn run_obscure(config: &PicaiConfig, args: ObscureArgs) -> Result<(), Box<dyn std::error::Error>> {
    let detector = build_detector(&args.detection, config, config.still_radius_scale)?;
    let session = PhotoSession::with_sink(
        ManualMarker::new(config.manual_radius_fraction),
        Box::new(LogStatusSink) as Box<dyn StatusSink>,
    );
    let mut use_case = ObscurePhotoUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        detector,
        Box::new(StillObfuscator::from_config(config)),
        session,
    );

    let report = use_case.execute(&args.input, &args.output, &args.faces, args.display)?;
    log::info!(
        "{}x{} photo: {} detected, {} marked{}",
        report.width,
        report.height,
        report.detected,
        report.manual,
        if report.detection_failed {
            " (detection failed)"
        } else {
            ""
        }
    );
    log::info!("Output written to {}", args.output.display());
    Ok(())
}

fn run_overlay(config: &PicaiConfig, args: OverlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let frame = ImageFileReader::new().read(&args.input)?;
    let mut detector = build_detector(&args.detection, config, config.live_radius_scale)?;
    let outcome = detect_fail_soft(&mut *detector, &frame);
    LogStatusSink.post(outcome.status);

    let mut regions = outcome.regions;
    let marker = ManualMarker::new(config.manual_radius_fraction);
    let display = DisplayGeometry::unscaled(frame.width(), frame.height());
    for face in &args.faces {
        let region = match face {
            ManualFace::Point(x, y) => marker.add_region((*x, *y), &display)?,
            ManualFace::Region(region) => region.clamped_to(frame.width(), frame.height()),
        };
        regions.push(region);
    }

    let renderer = LiveOverlayRenderer::new(config.live_block_size, config.effect);
    let mut preview = LivePreview::new(renderer, (frame.width(), frame.height()));
    preview.start();
    if let Some(ticket) = preview.begin_detection() {
        preview.accept(ticket, regions);
    }
    let overlay = preview.render(&frame);

    ImageFileWriter::new().write(&args.output, overlay.surface())?;
    if !overlay.glyphs().is_empty() {
        let stamps = args.output.with_extension("json");
        let json = serde_json::to_string_pretty(overlay.glyphs())?;
        std::fs::write(&stamps, json)?;
        log::info!("Glyph stamps written to {}", stamps.display());
    }
    log::info!("Overlay written to {}", args.output.display());
    Ok(())
}

fn run_live(config: &PicaiConfig, args: LiveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let source = DirectoryFrameSource::open(&args.frames)?;
    let size = source.first_frame_size()?;
    let frame_count = source.len();

    let base = build_detector(&args.detection, config, config.live_radius_scale)?;
    let downscaled: Box<dyn FaceDetector> =
        Box::new(DownscaledDetector::new(base, config.detection_scale)?);
    let detector: Box<dyn FaceDetector> = if config.skip_interval > 1 {
        Box::new(SkipFrameDetector::new(downscaled, config.skip_interval)?)
    } else {
        downscaled
    };

    let renderer = LiveOverlayRenderer::new(config.live_block_size, config.effect);
    let preview = LivePreview::new(renderer, size);
    let sink = DirectoryOverlaySink::new(&args.output);

    log::info!(
        "Live replay of {frame_count} frame(s) every {} ms ({} effect)",
        config.tick_interval_ms,
        config.effect
    );
    let handle = ThreadedLiveRunner::new(config.tick_interval()).start(
        preview,
        Box::new(source),
        detector,
        Box::new(sink),
    );
    let preview = handle.join()?;
    let stats = preview.stats();
    log::info!(
        "Live replay finished: {} tick(s), {} detection(s) applied, {} stale",
        stats.ticks,
        stats.accepted,
        stats.discarded
    );
    Ok(())
}

fn build_detector(
    args: &DetectorArgs,
    config: &PicaiConfig,
    radius_scale: f64,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    match args.detector.as_str() {
        "none" => Ok(Box::new(NullFaceDetector)),
        "description" => {
            let path = args
                .description
                .as_ref()
                .ok_or("--description is required with --detector description")?;
            Ok(Box::new(DescriptionFaceDetector::new(Box::new(
                FileDescriptionSource::new(path),
            ))))
        }
        "blazeface" => match load_blazeface(args, config, radius_scale) {
            Ok(detector) => Ok(Box::new(detector)),
            Err(e) => {
                log::warn!("Face detection model unavailable: {e}");
                LogStatusSink.post(StatusMessage::warning(
                    "Face detection is unavailable. Mark faces manually with --face.",
                ));
                Ok(Box::new(NullFaceDetector))
            }
        },
        other => Err(format!(
            "Detector must be one of: none, blazeface, description, got '{other}'"
        )
        .into()),
    }
}

fn load_blazeface(
    args: &DetectorArgs,
    config: &PicaiConfig,
    radius_scale: f64,
) -> Result<OnnxBlazefaceDetector, Box<dyn std::error::Error>> {
    let model_path = match &args.model {
        Some(path) => path.clone(),
        None => {
            log::info!("Resolving model: {BLAZEFACE_MODEL_NAME}");
            let path = model_resolver::resolve(
                BLAZEFACE_MODEL_NAME,
                config.model_url.as_deref(),
                args.model_dir.as_deref(),
                Some(Box::new(download_progress)),
            )?;
            eprintln!();
            path
        }
    };
    if !model_path.is_file() {
        return Err(format!("Model file not found: {}", model_path.display()).into());
    }
    OnnxBlazefaceDetector::new(&model_path, config.confidence, radius_scale)
}

fn validate_input(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }
    if !is_image(input) {
        return Err(format!(
            "Unsupported input '{}'; expected one of: {}",
            input.display(),
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn parse_face(s: &str) -> Result<ManualFace, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("expected x,y or x,y,r, got '{s}'"))?;
    match parts.as_slice() {
        [x, y] => Ok(ManualFace::Point(*x, *y)),
        [x, y, r] => FaceRegion::new((*x, *y), *r, MANUAL_CONFIDENCE)
            .map(ManualFace::Region)
            .map_err(|e| e.to_string()),
        _ => Err(format!("expected x,y or x,y,r, got '{s}'")),
    }
}

fn parse_display(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|_| format!("invalid width in '{s}'"))?;
    let h: f64 = h.trim().parse().map_err(|_| format!("invalid height in '{s}'"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("display size must be positive, got '{s}'"));
    }
    Ok((w, h))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picai_core::shared::frame::Frame;

    fn detector_args(detector: &str, model: Option<&str>) -> DetectorArgs {
        DetectorArgs {
            detector: detector.to_string(),
            model: model.map(PathBuf::from),
            model_dir: None,
            description: None,
            confidence: None,
        }
    }

    #[test]
    fn test_missing_model_falls_back_to_manual_only() {
        let args = detector_args("blazeface", Some("/nonexistent/model.onnx"));
        let config = PicaiConfig::default();
        let mut detector = build_detector(&args, &config, config.still_radius_scale).unwrap();

        let frame = Frame::new(vec![128u8; 8 * 8 * 4], 8, 8, 4, 0);
        assert!(detector.detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn test_description_detector_requires_file() {
        let args = detector_args("description", None);
        let config = PicaiConfig::default();
        assert!(build_detector(&args, &config, 1.0).is_err());
    }

    #[test]
    fn test_unknown_detector_rejected() {
        let args = detector_args("yolo", None);
        let config = PicaiConfig::default();
        assert!(build_detector(&args, &config, 1.0).is_err());
    }

    #[test]
    fn test_config_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picai.json");

        run_config(Some(&path), &ConfigArgs { write: true }).unwrap();

        assert_eq!(PicaiConfig::load(&path).unwrap(), PicaiConfig::default());
    }

    #[test]
    fn test_parse_face_point() {
        assert_eq!(parse_face("10,20").unwrap(), ManualFace::Point(10.0, 20.0));
    }

    #[test]
    fn test_parse_face_circle() {
        match parse_face("10, 20, 5").unwrap() {
            ManualFace::Region(r) => {
                assert_eq!(r.center(), (10.0, 20.0));
                assert_eq!(r.radius(), 5.0);
            }
            other => panic!("expected region, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_face_rejects_bad_input() {
        assert!(parse_face("10").is_err());
        assert!(parse_face("a,b").is_err());
        assert!(parse_face("1,2,0").is_err());
    }

    #[test]
    fn test_parse_display() {
        assert_eq!(parse_display("400x300").unwrap(), (400.0, 300.0));
        assert!(parse_display("400").is_err());
        assert!(parse_display("0x300").is_err());
    }

    #[test]
    fn test_cli_parses_obscure() {
        let cli = Cli::try_parse_from([
            "picai", "obscure", "in.jpg", "out.jpg", "--face", "1,2", "--face", "3,4,5",
            "--seed", "7",
        ])
        .unwrap();
        match cli.command {
            Command::Obscure(args) => {
                assert_eq!(args.faces.len(), 2);
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.detection.detector, "blazeface");
            }
            _ => panic!("expected obscure"),
        }
    }

    #[test]
    fn test_cli_parses_live_effect() {
        let cli = Cli::try_parse_from([
            "picai", "live", "frames", "out", "--effect", "heart-eyes", "--skip", "1",
        ])
        .unwrap();
        match cli.command {
            Command::Live(args) => {
                assert_eq!(args.effect, Some(EffectMode::HeartEyes));
                assert_eq!(args.skip, Some(1));
            }
            _ => panic!("expected live"),
        }
    }
}
