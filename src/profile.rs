//! Frame profile: the configured frame plus the placement defaults applied to
//! every composite.
//!
//! A profile starts unconfigured. [`FrameProfile::set_frame`] decodes the frame
//! and builds the matching white background; both canvases live together in one
//! [`FrameCanvas`] so the profile is never half-configured. Compositing works
//! from a [`FrameSnapshot`], which shares the canvases read-only.

use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::error::{FramerError, Result};
use crate::image_processing::layout::Placement;

/// Output directory used until one is configured
pub const DEFAULT_OUTPUT_DIR: &str = "result";

/// Decoded frame together with its white background of the same size
#[derive(Debug)]
pub struct FrameCanvas {
    source: String,
    frame: RgbaImage,
    blank: RgbaImage,
}

impl FrameCanvas {
    fn new(source: String, frame: RgbaImage) -> Self {
        let (width, height) = frame.dimensions();
        let blank = ImageBuffer::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        Self {
            source,
            frame,
            blank,
        }
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Frame pixels; the alpha channel marks the window
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Opaque white background, same size as the frame
    pub fn blank(&self) -> &RgbaImage {
        &self.blank
    }

    /// A fresh background to draw on; the shared one is never mutated
    pub fn working_canvas(&self) -> RgbaImage {
        self.blank.clone()
    }
}

/// Consistent view of a profile taken at the start of a composite
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub canvas: Arc<FrameCanvas>,
    pub placement: Placement,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FrameProfile {
    canvas: Option<Arc<FrameCanvas>>,
    placement: Placement,
    output_dir: PathBuf,
}

impl Default for FrameProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameProfile {
    pub fn new() -> Self {
        Self {
            canvas: None,
            placement: Placement::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Build a configured profile in one step
    pub fn with_frame(frame_path: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<Self> {
        let mut profile = Self::new();
        profile.set_output_directory(output_dir)?;
        profile.set_frame(frame_path)?;
        Ok(profile)
    }

    /// Decode the frame at `path` and make it the current frame.
    ///
    /// On failure the previous frame stays in place.
    pub fn set_frame(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| FramerError::decode(path, e))?;
        self.set_frame_image(decoded, path.display().to_string());
        Ok(())
    }

    /// Install an already decoded frame. `source` is only used for diagnostics.
    pub fn set_frame_image(&mut self, frame: DynamicImage, source: impl Into<String>) {
        let source = source.into();

        if !frame.color().has_alpha() {
            warn!(
                "frame {} has no alpha channel; it will cover the content entirely",
                source
            );
        }

        let canvas = FrameCanvas::new(source, frame.into_rgba8());
        let (width, height) = canvas.dimensions();

        match &self.canvas {
            Some(previous) => info!(
                "frame changed from {} to {} ({}x{})",
                previous.source(),
                canvas.source(),
                width,
                height
            ),
            None => info!("frame set to {} ({}x{})", canvas.source(), width, height),
        }

        self.canvas = Some(Arc::new(canvas));
    }

    /// Set the default output directory. Trailing separators are stripped; the
    /// directory itself is created only when a composite is written.
    pub fn set_output_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.output_dir = normalize_dir(path.as_ref())?;
        debug!("output directory set to {}", self.output_dir.display());
        Ok(())
    }

    /// Update only the provided placement defaults
    pub fn set_placement(&mut self, margin: Option<u32>, right: Option<i32>, bottom: Option<i32>) {
        if let Some(margin) = margin {
            self.placement.margin = margin;
        }
        if let Some(right) = right {
            self.placement.right = right;
        }
        if let Some(bottom) = bottom {
            self.placement.bottom = bottom;
        }
        debug!("placement defaults now {:?}", self.placement);
    }

    pub fn is_configured(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.canvas.as_ref().map(|c| c.dimensions())
    }

    pub fn frame_path(&self) -> Option<&str> {
        self.canvas.as_ref().map(|c| c.source())
    }

    pub fn canvas(&self) -> Option<&Arc<FrameCanvas>> {
        self.canvas.as_ref()
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn snapshot(&self) -> Result<FrameSnapshot> {
        let canvas = self.canvas.clone().ok_or(FramerError::NotConfigured)?;
        Ok(FrameSnapshot {
            canvas,
            placement: self.placement,
            output_dir: self.output_dir.clone(),
        })
    }
}

/// Profile shared between threads.
///
/// Setters take the write lock; compositing only holds the read lock while
/// taking a snapshot, so reconfiguration never interleaves with a snapshot.
#[derive(Debug, Clone, Default)]
pub struct SharedFrameProfile {
    inner: Arc<RwLock<FrameProfile>>,
}

impl SharedFrameProfile {
    pub fn new(profile: FrameProfile) -> Self {
        Self {
            inner: Arc::new(RwLock::new(profile)),
        }
    }

    pub fn snapshot(&self) -> Result<FrameSnapshot> {
        self.read(|profile| profile.snapshot())?
    }

    pub fn set_frame(&self, path: impl AsRef<Path>) -> Result<()> {
        // Decode outside the lock; only the swap is exclusive
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| FramerError::decode(path, e))?;
        self.write(|profile| profile.set_frame_image(decoded, path.display().to_string()))
    }

    pub fn set_output_directory(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write(|profile| profile.set_output_directory(path))?
    }

    pub fn set_placement(
        &self,
        margin: Option<u32>,
        right: Option<i32>,
        bottom: Option<i32>,
    ) -> Result<()> {
        self.write(|profile| profile.set_placement(margin, right, bottom))
    }

    pub fn read<T>(&self, f: impl FnOnce(&FrameProfile) -> T) -> Result<T> {
        let guard = self
            .inner
            .read()
            .map_err(|_| FramerError::config("frame profile lock poisoned"))?;
        Ok(f(&guard))
    }

    pub fn write<T>(&self, f: impl FnOnce(&mut FrameProfile) -> T) -> Result<T> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| FramerError::config("frame profile lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

/// Normalize a directory path: trailing (and repeated) separators and `.`
/// segments are dropped. A bare root keeps its separator. Empty input is
/// rejected.
///
/// Works on path components, so names that are not valid UTF-8 survive intact.
pub fn normalize_dir(path: &Path) -> Result<PathBuf> {
    if path.to_str().is_some_and(|raw| raw.trim().is_empty()) {
        return Err(FramerError::config("output directory must not be empty"));
    }

    Ok(path.components().collect())
}
