use crate::error::{FramerError, Result};

/// Placement parameters for a single composite.
///
/// `margin` is the distance kept between the scaled content and the frame edge on
/// the limiting axis. `right` and `bottom` nudge the anchor after fitting and may be
/// negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    pub margin: u32,
    pub right: i32,
    pub bottom: i32,
}

/// Which frame dimension decides the scale factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitingAxis {
    Width,
    Height,
}

impl LimitingAxis {
    pub fn label(&self) -> &'static str {
        match self {
            LimitingAxis::Width => "width",
            LimitingAxis::Height => "height",
        }
    }
}

/// Result of fitting content into a frame: scaled size plus top-left anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitLayout {
    pub axis: LimitingAxis,
    pub width: u32,
    pub height: u32,
    pub x: i64,
    pub y: i64,
}

/// Fit content of `content` size into a frame of `frame` size.
///
/// Content that is relatively taller than the frame (or equally proportioned) is
/// limited by the frame height; otherwise by the frame width. The limiting axis
/// touches the margin exactly and the other axis is centered, then both are shifted
/// by the placement offsets.
pub fn compute_fit(
    frame: (u32, u32),
    content: (u32, u32),
    placement: Placement,
) -> Result<FitLayout> {
    let (frame_w, frame_h) = frame;
    let (content_w, content_h) = content;

    if frame_w == 0 || frame_h == 0 {
        return Err(FramerError::geometry(format!(
            "frame has an empty dimension: {}x{}",
            frame_w, frame_h
        )));
    }
    if content_w == 0 || content_h == 0 {
        return Err(FramerError::geometry(format!(
            "content has an empty dimension: {}x{}",
            content_w, content_h
        )));
    }

    let margin = placement.margin as u64;
    let right = placement.right as i64;
    let bottom = placement.bottom as i64;

    // content_h / content_w >= frame_h / frame_w, without floating point
    let height_limited = content_h as u64 * frame_w as u64 >= frame_h as u64 * content_w as u64;

    let layout = if height_limited {
        let scaled_h = limiting_extent(frame_h, margin, LimitingAxis::Height)?;
        let scaled_w = scale_ratio(scaled_h, content_w, content_h);
        check_derived(scaled_w, LimitingAxis::Width, content, placement)?;

        FitLayout {
            axis: LimitingAxis::Height,
            width: scaled_w,
            height: scaled_h,
            x: (frame_w as i64 - scaled_w as i64).div_euclid(2) + right,
            y: margin as i64 + bottom,
        }
    } else {
        let scaled_w = limiting_extent(frame_w, margin, LimitingAxis::Width)?;
        let scaled_h = scale_ratio(scaled_w, content_h, content_w);
        check_derived(scaled_h, LimitingAxis::Height, content, placement)?;

        FitLayout {
            axis: LimitingAxis::Width,
            width: scaled_w,
            height: scaled_h,
            x: margin as i64 + right,
            y: (frame_h as i64 - scaled_h as i64).div_euclid(2) + bottom,
        }
    };

    Ok(layout)
}

fn limiting_extent(frame_extent: u32, margin: u64, axis: LimitingAxis) -> Result<u32> {
    let frame_extent = frame_extent as u64;
    match frame_extent.checked_sub(margin * 2) {
        Some(extent) if extent > 0 => Ok(extent as u32),
        _ => Err(FramerError::geometry(format!(
            "margin {} leaves no room on the frame {} ({} px)",
            margin,
            axis.label(),
            frame_extent
        ))),
    }
}

fn check_derived(
    extent: u32,
    axis: LimitingAxis,
    content: (u32, u32),
    placement: Placement,
) -> Result<()> {
    if extent == 0 {
        return Err(FramerError::geometry(format!(
            "content {}x{} scales to zero {} with margin {}",
            content.0,
            content.1,
            axis.label(),
            placement.margin
        )));
    }
    Ok(())
}

/// `round(extent * num / den)` in exact integer arithmetic, ties to even.
fn scale_ratio(extent: u32, num: u32, den: u32) -> u32 {
    let product = extent as u64 * num as u64;
    let den = den as u64;
    let quotient = product / den;
    let twice_rem = (product % den) * 2;

    let rounded = if twice_rem > den || (twice_rem == den && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };

    rounded.min(u32::MAX as u64) as u32
}
