//! Subcommand handlers.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use super::args::{Args, Command, ConfigAction};
use crate::config::{default_path, Config, ConfigError, DEFAULT_CONFIG_TEMPLATE};
use crate::frame::{Frame, FrameError, FrameKind, FrameLayout, FrameReader};
use crate::image::{Channels, Image, ImageError};
use crate::process::{self, ScaleFactor, Thresholded};
use crate::raster::{self, RasterError};

/// Set by the Ctrl+C handler; polled between frames by `receive`.
pub static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        STOP_REQUESTED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, stopping after the current frame...");
    })
}

/// Errors surfaced by subcommands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Config file already exists: {}\nUse 'camlab config show' to view current settings.", .0.display())]
    ConfigExists(PathBuf),
}

/// Dispatch parsed arguments to the matching handler.
pub fn run(args: Args) -> Result<(), CommandError> {
    let config_path = args.config.as_deref();

    match args.command {
        Command::Gray { input, output } => run_gray(&input, &output).map(|_| ()),
        Command::Threshold {
            input,
            output,
            max_pixels,
        } => {
            let config = Config::load(config_path)?;
            let budget = max_pixels.unwrap_or(config.threshold.max_pixels);
            let result = run_threshold(&input, &output, budget)?;
            println!("Selected threshold intensity: {}", result.threshold);
            println!(
                "Bright pixels: {} of {} (budget {})",
                result.bright_count(),
                result.mask.pixel_count(),
                budget
            );
            Ok(())
        }
        Command::Resample {
            input,
            output,
            scale,
        } => {
            let config = Config::load(config_path)?;
            let scale = scale.unwrap_or(config.resample.scale);
            let resized = run_resample(&input, &output, scale)?;
            println!(
                "Resampled by {} to {}x{}: {}",
                scale,
                resized.width(),
                resized.height(),
                output.display()
            );
            Ok(())
        }
        Command::Receive {
            source,
            out_dir,
            tagged,
            plain,
            raw,
            width,
            height,
            limit,
        } => {
            let config = Config::load(config_path)?;
            let tagged = match (tagged, plain) {
                (true, _) => true,
                (_, true) => false,
                _ => config.receive.tagged,
            };
            let options = ReceiveOptions {
                out_dir,
                layout: if tagged {
                    FrameLayout::Tagged
                } else {
                    FrameLayout::Plain
                },
                raw_size: raw.then(|| {
                    (
                        width.unwrap_or(config.receive.width),
                        height.unwrap_or(config.receive.height),
                    )
                }),
                max_payload: config.receive.max_payload,
                limit,
            };
            let summary = if source.as_os_str() == "-" {
                run_receive(io::stdin().lock(), &options, &STOP_REQUESTED)?
            } else {
                let file = File::open(&source).map_err(|e| CommandError::Io {
                    path: source.clone(),
                    source: e,
                })?;
                run_receive(BufReader::new(file), &options, &STOP_REQUESTED)?
            };
            println!(
                "Received {} frame(s), saved {}, dropped {}",
                summary.received,
                summary.saved.len(),
                summary.dropped
            );
            Ok(())
        }
        Command::Config { action } => handle_config_action(action, config_path),
    }
}

/// Reduce a color image file to grayscale.
pub fn run_gray(input: &Path, output: &Path) -> Result<Image, CommandError> {
    let image = raster::load(input)?;
    let gray = process::reduce(&image)?;
    raster::save(&gray, output)?;
    log::info!("wrote grayscale image {}", output.display());
    Ok(gray)
}

/// Threshold an image file, reducing it to grayscale first if needed.
pub fn run_threshold(
    input: &Path,
    output: &Path,
    max_pixels: usize,
) -> Result<Thresholded, CommandError> {
    let image = raster::load(input)?;
    let gray = match image.channels() {
        Channels::Rgb => process::reduce(&image)?,
        Channels::Gray => image,
    };
    let result = process::threshold(&gray, max_pixels)?;
    raster::save(&result.mask, output)?;
    log::info!(
        "threshold {} kept {} pixel(s) -> {}",
        result.threshold,
        result.bright_count(),
        output.display()
    );
    Ok(result)
}

/// Resample an image file by a rational factor.
pub fn run_resample(input: &Path, output: &Path, scale: ScaleFactor) -> Result<Image, CommandError> {
    let image = raster::load(input)?;
    let resized = process::resample_by(&image, scale)?;
    raster::save(&resized, output)?;
    log::info!(
        "resampled {}x{} by {} -> {}x{}",
        image.width(),
        image.height(),
        scale,
        resized.width(),
        resized.height()
    );
    Ok(resized)
}

/// Settings for [`run_receive`].
#[derive(Debug, Clone)]
pub struct ReceiveOptions {
    pub out_dir: PathBuf,
    pub layout: FrameLayout,
    /// Interpret payloads as raw gray pixels of this size instead of
    /// encoded images
    pub raw_size: Option<(u32, u32)>,
    pub max_payload: usize,
    pub limit: Option<usize>,
}

/// Outcome of a [`run_receive`] session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReceiveSummary {
    /// Complete frames read from the stream
    pub received: usize,
    /// Frames lost to truncation, oversize or bad raw geometry
    pub dropped: usize,
    /// Files written, in arrival order
    pub saved: Vec<PathBuf>,
    /// Noise bytes skipped while hunting for sync
    pub skipped_bytes: u64,
}

/// Read frames from `source` and save each payload under `options.out_dir`.
///
/// Plain frames are saved as `image_NNN`, tagged frames as `<kind>_NNN`
/// where the number advances with every `original` frame, and raw frames
/// without a tag as `binary_NNN`. Runs until end of stream, `limit`
/// frames, or `stop` is raised.
pub fn run_receive<R: Read>(
    source: R,
    options: &ReceiveOptions,
    stop: &AtomicBool,
) -> Result<ReceiveSummary, CommandError> {
    std::fs::create_dir_all(&options.out_dir).map_err(|e| CommandError::Io {
        path: options.out_dir.clone(),
        source: e,
    })?;

    let mut reader = FrameReader::new(source, options.layout).with_max_payload(options.max_payload);
    let mut summary = ReceiveSummary::default();
    let mut sequence = 0usize;

    log::info!("waiting for frames ({:?} layout)...", options.layout);

    while !stop.load(Ordering::SeqCst) {
        if options.limit.is_some_and(|limit| summary.received >= limit) {
            break;
        }

        let frame = match reader.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(FrameError::Io(e)) => return Err(FrameError::Io(e).into()),
            Err(e) => {
                log::warn!("dropping frame: {}", e);
                summary.dropped += 1;
                continue;
            }
        };
        summary.received += 1;

        match frame.kind {
            Some(FrameKind::Original) | None => sequence += 1,
            Some(_) => {}
        }
        // A capture that starts mid-set still gets numbered from 1
        let sequence = sequence.max(1);

        match save_frame(&frame, sequence, options) {
            Ok(path) => {
                log::info!("saved {} ({} bytes)", path.display(), frame.payload.len());
                summary.saved.push(path);
            }
            Err(CommandError::Image(e)) => {
                log::warn!("dropping raw frame #{}: {}", sequence, e);
                summary.dropped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    summary.skipped_bytes = reader.skipped_bytes();
    if summary.skipped_bytes > 0 {
        log::debug!("skipped {} noise byte(s)", summary.skipped_bytes);
    }
    Ok(summary)
}

fn save_frame(frame: &Frame, sequence: usize, options: &ReceiveOptions) -> Result<PathBuf, CommandError> {
    let stem = match (frame.kind, options.raw_size) {
        (Some(kind), _) => kind.name(),
        (None, Some(_)) => "binary".to_string(),
        (None, None) => "image".to_string(),
    };

    match options.raw_size {
        Some((width, height)) => {
            let path = options.out_dir.join(format!("{}_{:03}.png", stem, sequence));
            let image = Image::from_raw(width, height, Channels::Gray, frame.payload.clone())?;
            raster::save(&image, &path)?;
            Ok(path)
        }
        None => {
            let path = options.out_dir.join(format!("{}_{:03}.jpg", stem, sequence));
            std::fs::write(&path, &frame.payload).map_err(|e| CommandError::Io {
                path: path.clone(),
                source: e,
            })?;
            Ok(path)
        }
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), CommandError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&config_path))?;
            println!("Current configuration:");
            println!("  Threshold max pixels: {}", config.threshold.max_pixels);
            println!("  Resample scale: {}", config.resample.scale);
            println!(
                "  Raw frame size: {}x{}",
                config.receive.width, config.receive.height
            );
            println!(
                "  Tagged frames: {}",
                if config.receive.tagged { "yes" } else { "no" }
            );
            println!("  Max payload: {} bytes", config.receive.max_payload);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(CommandError::ConfigExists(config_path));
            }

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| CommandError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE).map_err(|e| CommandError::Io {
                path: config_path.clone(),
                source: e,
            })?;

            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}
