pub mod composite;
pub mod layout;
pub mod resize;

use image::{DynamicImage, ImageFormat, RgbImage};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::error::{FramerError, Result};
use crate::profile::{normalize_dir, FrameProfile, FrameSnapshot};
use layout::{compute_fit, FitLayout, Placement};

/// Per-call overrides. Anything left `None` falls back to the profile default
/// at call time; nothing here is written back to the profile.
#[derive(Debug, Clone, Default)]
pub struct TemplateRequest {
    pub output_dir: Option<PathBuf>,
    pub margin: Option<u32>,
    pub right: Option<i32>,
    pub bottom: Option<i32>,
    pub file_name: Option<String>,
}

impl TemplateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn right(mut self, right: i32) -> Self {
        self.right = Some(right);
        self
    }

    pub fn bottom(mut self, bottom: i32) -> Self {
        self.bottom = Some(bottom);
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Effective placement for this call
    pub fn resolve_placement(&self, defaults: Placement) -> Placement {
        Placement {
            margin: self.margin.unwrap_or(defaults.margin),
            right: self.right.unwrap_or(defaults.right),
            bottom: self.bottom.unwrap_or(defaults.bottom),
        }
    }

    /// Effective output directory for this call
    pub fn resolve_output_dir(&self, default: &Path) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => normalize_dir(dir),
            None => Ok(default.to_path_buf()),
        }
    }

    /// Destination file for `content_path`: the explicit file name, or the
    /// content's own base name. An explicit name must stay inside `output_dir`.
    pub fn resolve_destination(&self, output_dir: &Path, content_path: &Path) -> Result<PathBuf> {
        let file_name = match &self.file_name {
            Some(name) => {
                let mut components = Path::new(name).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(plain)), None) => PathBuf::from(plain),
                    _ => {
                        return Err(FramerError::config(format!(
                            "output file name must be a plain file name, got {:?}",
                            name
                        )))
                    }
                }
            }
            None => content_path.file_name().map(PathBuf::from).ok_or_else(|| {
                FramerError::config(format!(
                    "cannot derive an output file name from {}",
                    content_path.display()
                ))
            })?,
        };
        Ok(output_dir.join(file_name))
    }
}

/// Outcome of one composite
#[derive(Debug, Clone)]
pub struct CompositeResult {
    pub content_path: PathBuf,
    pub output_path: PathBuf,
    pub content_size: (u32, u32),
    pub frame_size: (u32, u32),
    pub placement: Placement,
    pub layout: FitLayout,
}

/// Fit the content into the snapshot's frame and render the composite in memory.
///
/// Layers, bottom to top: white background, resized content at the anchor, frame
/// masked by its own alpha.
pub fn compose(
    snapshot: &FrameSnapshot,
    content: &DynamicImage,
    placement: Placement,
) -> Result<(RgbImage, FitLayout)> {
    let frame = &snapshot.canvas;
    let content_rgb = content.to_rgb8();

    let layout = compute_fit(frame.dimensions(), content_rgb.dimensions(), placement)?;
    debug!(
        "fit {}x{} content into {}x{} frame: {:?}",
        content_rgb.width(),
        content_rgb.height(),
        frame.width(),
        frame.height(),
        layout
    );

    let resized = resize::resize_image(&content_rgb, layout.width, layout.height)?;

    let mut canvas = frame.working_canvas();
    composite::paste(&mut canvas, resized, layout.x, layout.y);
    composite::paste_masked(&mut canvas, frame.frame(), 0, 0);

    Ok((composite::flatten(canvas), layout))
}

/// Composite the image at `content_path` into the profile's frame and write it
/// to disk.
pub fn apply_template(
    profile: &FrameProfile,
    content_path: impl AsRef<Path>,
    request: &TemplateRequest,
) -> Result<CompositeResult> {
    let snapshot = profile.snapshot()?;
    apply_snapshot(&snapshot, content_path.as_ref(), request)
}

/// Same as [`apply_template`] against an already taken snapshot
pub fn apply_snapshot(
    snapshot: &FrameSnapshot,
    content_path: &Path,
    request: &TemplateRequest,
) -> Result<CompositeResult> {
    let placement = request.resolve_placement(snapshot.placement);
    let output_dir = request.resolve_output_dir(&snapshot.output_dir)?;
    let output_path = request.resolve_destination(&output_dir, content_path)?;

    fs::create_dir_all(&output_dir).map_err(|e| FramerError::write(&output_dir, e))?;

    let content = image::open(content_path).map_err(|e| FramerError::decode(content_path, e))?;
    let content_size = (content.width(), content.height());

    let (rendered, layout) = compose(snapshot, &content, placement)?;
    save_composite(&rendered, &output_path)?;

    info!("composite saved to {}", output_path.display());

    Ok(CompositeResult {
        content_path: content_path.to_path_buf(),
        output_path,
        content_size,
        frame_size: snapshot.canvas.dimensions(),
        placement,
        layout,
    })
}

/// Resolve what [`apply_template`] would do without decoding pixels or touching
/// the output directory. Only the content header is read.
pub fn plan_template(
    profile: &FrameProfile,
    content_path: impl AsRef<Path>,
    request: &TemplateRequest,
) -> Result<CompositeResult> {
    let content_path = content_path.as_ref();
    let snapshot = profile.snapshot()?;

    let placement = request.resolve_placement(snapshot.placement);
    let output_dir = request.resolve_output_dir(&snapshot.output_dir)?;
    let output_path = request.resolve_destination(&output_dir, content_path)?;

    let content_size =
        image::image_dimensions(content_path).map_err(|e| FramerError::decode(content_path, e))?;
    let layout = compute_fit(snapshot.canvas.dimensions(), content_size, placement)?;

    Ok(CompositeResult {
        content_path: content_path.to_path_buf(),
        output_path,
        content_size,
        frame_size: snapshot.canvas.dimensions(),
        placement,
        layout,
    })
}

/// Encode next to the destination and rename into place, so a failed encode
/// never leaves a truncated file under the final name.
fn save_composite(img: &RgbImage, output_path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(output_path).map_err(|e| FramerError::encode(output_path, e))?;

    let file_name = output_path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("composite");
    let partial = output_path.with_file_name(format!(".{}.partial", file_name));

    if let Err(e) = img.save_with_format(&partial, format) {
        let _ = fs::remove_file(&partial);
        return Err(FramerError::encode(output_path, e));
    }

    fs::rename(&partial, output_path).map_err(|e| {
        let _ = fs::remove_file(&partial);
        FramerError::write(output_path, e)
    })
}
