//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::process::ScaleFactor;

/// Integer image processing for embedded camera frames
#[derive(Parser, Debug)]
#[command(name = "camlab")]
#[command(version, about = "Fixed-point image processing for serial camera frames", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a color image to grayscale
    Gray {
        /// Input image (JPEG, PNG, ...)
        input: PathBuf,
        /// Output image path
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Keep at most N bright pixels as a binary mask
    Threshold {
        /// Input image; color input is converted to grayscale first
        input: PathBuf,
        /// Output mask path
        #[arg(long, short)]
        output: PathBuf,
        /// Bright pixel budget (default from config, else 1000)
        #[arg(long, short = 'n')]
        max_pixels: Option<usize>,
    },
    /// Nearest-neighbor resize by a rational factor
    Resample {
        /// Input image
        input: PathBuf,
        /// Output image path
        #[arg(long, short)]
        output: PathBuf,
        /// Scale factor as NUM/DEN, e.g. 3/2 or 2/3 (default from config, else 3/2)
        #[arg(long, short)]
        scale: Option<ScaleFactor>,
    },
    /// Split a captured serial stream into image files
    Receive {
        /// Capture file or device node, `-` for stdin
        source: PathBuf,
        /// Directory for received images
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Frames carry an image-type byte after the sync word
        #[arg(long, conflicts_with = "plain")]
        tagged: bool,
        /// Frames have no image-type byte, overriding `tagged = true` in config
        #[arg(long)]
        plain: bool,
        /// Payloads are raw gray pixels rather than encoded images
        #[arg(long)]
        raw: bool,
        /// Raw frame width (default from config, else 96)
        #[arg(long)]
        width: Option<u32>,
        /// Raw frame height (default from config, else 96)
        #[arg(long)]
        height: Option<u32>,
        /// Stop after this many frames
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
