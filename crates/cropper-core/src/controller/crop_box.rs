use crate::error::{CropperError, Result};
use crate::geometry::{Rect, Size};

/// Check that an aspect ratio (width / height) is usable.
pub fn validate_aspect_ratio(aspect_ratio: f64) -> Result<f64> {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        Ok(aspect_ratio)
    } else {
        Err(CropperError::InvalidAspectRatio(aspect_ratio))
    }
}

/// Largest rectangle of `aspect_ratio` that fits inside the viewport minus
/// `padding` on every side, centered in the viewport.
///
/// Returns `None` when the viewport leaves no positive area to work with.
pub fn compute_crop_box(viewport: Size, aspect_ratio: f64, padding: f64) -> Option<Rect> {
    if !viewport.is_positive() || !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return None;
    }

    let max_w = viewport.width - padding * 2.0;
    let max_h = viewport.height - padding * 2.0;
    if max_w <= 0.0 || max_h <= 0.0 {
        return None;
    }

    let (box_w, box_h) = if max_w / max_h > aspect_ratio {
        (max_h * aspect_ratio, max_h)
    } else {
        (max_w, max_w / aspect_ratio)
    };

    Some(Rect::new(
        (viewport.width - box_w) / 2.0,
        (viewport.height - box_h) / 2.0,
        box_w,
        box_h,
    ))
}

/// Smallest zoom at which an image of the given natural size still covers
/// the crop box on both axes.
pub fn initial_zoom(crop_box: &Rect, natural_width: f64, natural_height: f64) -> Option<f64> {
    if crop_box.is_empty() || !(natural_width > 0.0 && natural_height > 0.0) {
        return None;
    }
    let zoom = (crop_box.width / natural_width).max(crop_box.height / natural_height);
    zoom.is_finite().then_some(zoom)
}

/// Header label for an aspect ratio, e.g. `16:9 (Landscape)` or
/// `3:4 (Portrait)`.
pub fn aspect_label(aspect_ratio: f64) -> String {
    if aspect_ratio >= 1.0 {
        format!("{}:9 (Landscape)", (aspect_ratio * 9.0).round() as i64)
    } else {
        format!("3:{} (Portrait)", (3.0 / aspect_ratio).round() as i64)
    }
}

/// Parse `W:H` or a plain decimal into an aspect ratio.
pub fn parse_aspect_ratio(s: &str) -> Result<f64> {
    let s = s.trim();
    let ratio = match s.split_once(':') {
        Some((w, h)) => {
            let w: f64 = w.trim().parse().map_err(|_| CropperError::InvalidAspectRatio(f64::NAN))?;
            let h: f64 = h.trim().parse().map_err(|_| CropperError::InvalidAspectRatio(f64::NAN))?;
            w / h
        }
        None => s.parse().map_err(|_| CropperError::InvalidAspectRatio(f64::NAN))?,
    };
    validate_aspect_ratio(ratio)
}
