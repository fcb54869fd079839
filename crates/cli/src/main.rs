mod settings;

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use chromakey_core::background::domain::background_source::{BackgroundSource, PlaybackDirection};
use chromakey_core::background::infrastructure::background_loader::BackgroundLoader;
use chromakey_core::compositing::domain::composite_settings::CompositeSettings;
use chromakey_core::compositing::infrastructure::cpu_compositor::CpuCompositor;
use chromakey_core::keying::domain::color_sampler::sample_key_color;
use chromakey_core::keying::domain::key_color::KeyColor;
use chromakey_core::pipeline::composite_image_use_case::CompositeImageUseCase;
use chromakey_core::pipeline::composite_video_use_case::CompositeVideoUseCase;
use chromakey_core::pipeline::infrastructure::threaded_pipeline_executor::ThreadedPipelineExecutor;
use chromakey_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use chromakey_core::shared::constants::MAX_SOFTNESS;
use chromakey_core::shared::error::ChromaKeyError;
use chromakey_core::shared::media_path::is_image_path;
use chromakey_core::shared::region::Region;
use chromakey_core::video::domain::video_reader::VideoReader;
use chromakey_core::video::domain::video_writer::VideoWriter;
use chromakey_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use chromakey_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use chromakey_core::video::infrastructure::image_file_reader::ImageFileReader;
use chromakey_core::video::infrastructure::image_file_writer::ImageFileWriter;

use settings::Settings;

const TOLERANCE_RANGE: RangeInclusive<u32> = 0..=100;
const SOFTNESS_RANGE: RangeInclusive<u32> = 0..=MAX_SOFTNESS;
const SPILL_RANGE: RangeInclusive<u32> = 0..=100;
const BRIGHTNESS_RANGE: RangeInclusive<i32> = -50..=50;
const CONTRAST_RANGE: RangeInclusive<f32> = 0.5..=1.5;

/// Replace a key color (greenscreen) in a video or image with another
/// image or video.
#[derive(Parser)]
#[command(name = "chromakey")]
struct Cli {
    /// Foreground video or image containing the key color.
    foreground: PathBuf,

    /// Output file. Image foregrounds write an image, videos write a video.
    output: PathBuf,

    /// Background image or video shown through keyed pixels.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Play a background video backwards.
    #[arg(long, conflicts_with = "forward")]
    reverse: bool,

    /// Play a background video forwards, overriding a saved reverse setting.
    #[arg(long)]
    forward: bool,

    /// Key color as R,G,B.
    #[arg(long, value_delimiter = ',', conflicts_with = "sample_region")]
    key_color: Option<Vec<u8>>,

    /// Sample the key color from X,Y,W,H of the first foreground frame.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    sample_region: Option<Vec<i32>>,

    /// Hue distance from the key color still treated as key (0-100).
    #[arg(long)]
    tolerance: Option<u32>,

    /// Edge feathering strength (0-25).
    #[arg(long)]
    softness: Option<u32>,

    /// Amount subtracted from the green channel of the output (0-100).
    #[arg(long)]
    spill: Option<u32>,

    /// Foreground brightness offset (-50 to 50).
    #[arg(long, allow_negative_numbers = true)]
    fg_brightness: Option<i32>,

    /// Foreground contrast gain (0.5-1.5).
    #[arg(long)]
    fg_contrast: Option<f32>,

    /// Background brightness offset (-50 to 50).
    #[arg(long, allow_negative_numbers = true)]
    bg_brightness: Option<i32>,

    /// Background contrast gain (0.5-1.5).
    #[arg(long)]
    bg_contrast: Option<f32>,

    /// Store the effective settings as defaults for later runs.
    #[arg(long)]
    save_settings: bool,
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
    validate(&cli)?;

    let mut settings = Settings::load();
    apply_overrides(&mut settings, &cli);

    if let Some(region) = sample_region(&cli) {
        let key = sample_from_foreground(&cli.foreground, &region)?;
        log::info!("Sampled key color {:?}", key.channels);
        settings.key_color = key.channels;
    }
    if cli.save_settings {
        let path = settings.save()?;
        log::info!("Settings saved to {}", path.display());
    }

    let direction = if settings.reverse_background {
        PlaybackDirection::Reverse
    } else {
        PlaybackDirection::Forward
    };
    let background = cli
        .background
        .as_deref()
        .map(|path| BackgroundLoader::default().load(path, direction))
        .transpose()?;
    if background.is_none() {
        log::warn!("No background given; writing the adjusted foreground unchanged");
    }

    let composite = settings.composite_settings();
    if is_image_path(&cli.foreground) {
        run_image(&cli.foreground, &cli.output, background, composite)
    } else {
        run_video(&cli.foreground, &cli.output, background, composite)
    }
}

fn run_image(
    input: &Path,
    output: &Path,
    background: Option<BackgroundSource>,
    settings: CompositeSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut use_case = CompositeImageUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        Box::new(CpuCompositor::new()),
        background,
        settings,
    );
    use_case.execute(input, output)?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_video(
    input: &Path,
    output: &Path,
    background: Option<BackgroundSource>,
    settings: CompositeSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader: Box<dyn VideoReader> = Box::new(FfmpegReader::new());
    let metadata = reader.open(input)?;
    let writer: Box<dyn VideoWriter> = Box::new(FfmpegWriter::new());

    let total = metadata.total_frames;
    let progress: Box<dyn Fn(usize, usize) -> bool + Send> = Box::new(move |current, _| {
        eprint!("\rCompositing frame {current}/{total}");
        true
    });

    let mut use_case = CompositeVideoUseCase::new(
        reader,
        writer,
        Box::new(CpuCompositor::new()),
        background,
        settings,
        Box::new(ThreadedPipelineExecutor::new()),
        Some(progress),
        None,
        Some(Box::new(StdoutPipelineLogger::default())),
    );
    let result = use_case.execute(&metadata, output);
    eprintln!();

    let summary = result?;
    eprintln!(
        "{} frames written / {} total frames",
        summary.frames_written, summary.total_frames
    );
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.foreground.exists() {
        return Err(format!("Foreground file not found: {}", cli.foreground.display()).into());
    }
    if let Some(background) = &cli.background {
        if !background.exists() {
            return Err(format!("Background file not found: {}", background.display()).into());
        }
    }
    if let Some(color) = &cli.key_color {
        if color.len() != 3 {
            return Err(out_of_range("key-color", format!("{color:?}")).into());
        }
    }
    if let Some(region) = &cli.sample_region {
        if region.len() != 4 || region[2] <= 0 || region[3] <= 0 {
            return Err(out_of_range("sample-region", format!("{region:?}")).into());
        }
    }
    check_range("tolerance", cli.tolerance, TOLERANCE_RANGE)?;
    check_range("softness", cli.softness, SOFTNESS_RANGE)?;
    check_range("spill", cli.spill, SPILL_RANGE)?;
    check_range("fg-brightness", cli.fg_brightness, BRIGHTNESS_RANGE)?;
    check_range("bg-brightness", cli.bg_brightness, BRIGHTNESS_RANGE)?;
    check_range("fg-contrast", cli.fg_contrast, CONTRAST_RANGE)?;
    check_range("bg-contrast", cli.bg_contrast, CONTRAST_RANGE)?;
    Ok(())
}

fn check_range<T: PartialOrd + Display>(
    name: &'static str,
    value: Option<T>,
    range: RangeInclusive<T>,
) -> Result<(), ChromaKeyError> {
    match value {
        Some(v) if !range.contains(&v) => Err(out_of_range(
            name,
            format!("{v} (allowed {}..={})", range.start(), range.end()),
        )),
        _ => Ok(()),
    }
}

fn out_of_range(name: &'static str, value: String) -> ChromaKeyError {
    ChromaKeyError::OutOfRangeParameter { name, value }
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(&[r, g, b]) = cli.key_color.as_deref() {
        settings.key_color = [r, g, b];
    }
    if let Some(v) = cli.tolerance {
        settings.tolerance = v;
    }
    if let Some(v) = cli.softness {
        settings.softness = v;
    }
    if let Some(v) = cli.spill {
        settings.spill = v;
    }
    if let Some(v) = cli.fg_brightness {
        settings.fg_brightness = v;
    }
    if let Some(v) = cli.fg_contrast {
        settings.fg_contrast = v;
    }
    if let Some(v) = cli.bg_brightness {
        settings.bg_brightness = v;
    }
    if let Some(v) = cli.bg_contrast {
        settings.bg_contrast = v;
    }
    if cli.reverse {
        settings.reverse_background = true;
    } else if cli.forward {
        settings.reverse_background = false;
    }
}

fn sample_region(cli: &Cli) -> Option<Region> {
    match cli.sample_region.as_deref() {
        Some(&[x, y, w, h]) => Some(Region::new(x, y, w, h)),
        _ => None,
    }
}

fn sample_from_foreground(
    input: &Path,
    region: &Region,
) -> Result<KeyColor, Box<dyn std::error::Error>> {
    let mut reader = open_reader(input);
    reader.open(input)?;
    let first = reader
        .frames()
        .next()
        .ok_or("Foreground has no frames to sample")??;
    reader.close();
    Ok(sample_key_color(&first, region)?)
}

fn open_reader(input: &Path) -> Box<dyn VideoReader> {
    if is_image_path(input) {
        Box::new(ImageFileReader::new())
    } else {
        Box::new(FfmpegReader::new())
    }
}
