use clap::Parser;
use std::path::PathBuf;

/// Extensions scanned when an input is a directory
pub const DEFAULT_EXTENSIONS: &str = "jpg,jpeg,png,webp,tiff,bmp";

#[derive(Parser, Debug)]
#[command(
    name = "frame-compositor",
    about = "Fit content images into a decorative frame with a transparent window",
    long_about = "
Frame Compositor

Places each content image inside a frame image. The content is scaled, keeping its
aspect ratio, until it sits exactly `margin` pixels from the frame edge on the limiting
axis and is centered on the other one. `--right` and `--bottom` then nudge it by a fixed
number of pixels. The frame is drawn on top using its own transparency, so only the
window shows the content.

Example Usage:
  # Frame a single image, output goes to ./result/IMG_001.png
  frame-compositor --frame frame.png -i IMG_001.png

  # Frame every image in a directory with a 10px margin, shifted 5px down
  frame-compositor --frame frame.png -i ~/questions -o ~/framed --margin 10 --bottom 5

  # Rename the output of a single image
  frame-compositor --frame frame.png -i q1.jpg --name q1_framed.png

  # Use a saved profile and only print the computed placement
  frame-compositor --config profile.json -i ~/questions --dry-run --report"
)]
pub struct Args {
    /// Frame image with a transparent window (PNG with alpha recommended)
    #[arg(short = 'f', long = "frame", value_name = "FILE")]
    pub frame: Option<PathBuf>,

    /// Content images or directories of images (can be specified multiple times)
    #[arg(short = 'i', long = "input", required = true, value_name = "DIR|FILE")]
    pub input_paths: Vec<PathBuf>,

    /// Output directory for composited images [default: result]
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Distance in pixels between the content and the frame edge on the limiting axis
    #[arg(short = 'm', long = "margin", value_name = "PX")]
    pub margin: Option<u32>,

    /// Horizontal shift in pixels applied after fitting (negative moves left)
    #[arg(long = "right", value_name = "PX", allow_negative_numbers = true)]
    pub right: Option<i32>,

    /// Vertical shift in pixels applied after fitting (negative moves up)
    #[arg(long = "bottom", value_name = "PX", allow_negative_numbers = true)]
    pub bottom: Option<i32>,

    /// Output file name (single input only); defaults to the input's file name
    #[arg(short = 'n', long = "name", value_name = "FILE")]
    pub file_name: Option<String>,

    /// Comma-separated list of image extensions to pick up from directories
    #[arg(long = "extensions", value_name = "LIST")]
    pub extensions_str: Option<String>,

    /// JSON profile with frame, outputDir, margin, right, bottom and extensions
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Compute placements without writing any file
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print a table with the placement of every composite
    #[arg(long = "report")]
    pub report: bool,

    /// Emit progress and results as JSON lines on stdout
    #[arg(long = "json-progress")]
    pub json_progress: bool,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Parse the extensions string into a vector
    pub fn parse_extensions(&self) -> Vec<String> {
        self.extensions_str
            .as_deref()
            .unwrap_or(DEFAULT_EXTENSIONS)
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}


// Default implementation for tests
#[cfg(test)]
impl Default for Args {
    fn default() -> Self {
        Self {
            frame: None,
            input_paths: vec![],
            output_dir: None,
            margin: None,
            right: None,
            bottom: None,
            file_name: None,
            extensions_str: None,
            config_file: None,
            dry_run: false,
            report: false,
            json_progress: false,
            verbose: false,
        }
    }
}
