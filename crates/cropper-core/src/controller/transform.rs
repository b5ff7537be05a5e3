use tracing::debug;

use crate::config::CropperConfig;
use crate::geometry::{Point, Rect, Size};

use super::crop_box::{compute_crop_box, initial_zoom};

/// How the source image is drawn in the viewport: scaled by `zoom`, centered,
/// then shifted by `offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    pub zoom: f64,
    pub offset: Point,
}

/// Snapshot taken when a pan gesture starts. Every move in the gesture is
/// measured from here, not from the previous (already clamped) frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGesture {
    pub pointer_start: Point,
    pub offset_start: Point,
}

/// Geometry of one viewport/image/aspect-ratio combination.
///
/// Only constructible from non-degenerate inputs, so every method can assume
/// a positive crop box and a positive minimum zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportController {
    viewport: Size,
    natural: Size,
    crop_box: Rect,
    min_zoom: f64,
    max_zoom: f64,
}

impl ViewportController {
    pub fn new(
        viewport: Size,
        natural: Size,
        aspect_ratio: f64,
        config: &CropperConfig,
    ) -> Option<Self> {
        let crop_box = compute_crop_box(viewport, aspect_ratio, config.padding)?;
        let min_zoom = initial_zoom(&crop_box, natural.width, natural.height)?;
        if min_zoom <= 0.0 {
            return None;
        }
        let factor = if config.max_zoom_factor >= 1.0 {
            config.max_zoom_factor
        } else {
            1.0
        };

        debug!(
            viewport_w = viewport.width,
            viewport_h = viewport.height,
            box_w = crop_box.width,
            box_h = crop_box.height,
            min_zoom,
            "Viewport layout computed"
        );

        Some(Self {
            viewport,
            natural,
            crop_box,
            min_zoom,
            max_zoom: min_zoom * factor,
        })
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn natural_size(&self) -> Size {
        self.natural
    }

    pub fn crop_box(&self) -> Rect {
        self.crop_box
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Initial fit: minimum zoom, image centered.
    pub fn initial_transform(&self) -> TransformState {
        TransformState {
            zoom: self.min_zoom,
            offset: Point::ZERO,
        }
    }

    pub fn clamp_zoom(&self, requested: f64) -> f64 {
        if requested.is_nan() {
            return self.min_zoom;
        }
        requested.clamp(self.min_zoom, self.max_zoom)
    }

    /// Bounding rectangle of the drawn image in viewport coordinates.
    pub fn image_rect(&self, zoom: f64, offset: Point) -> Rect {
        let draw_w = self.natural.width * zoom;
        let draw_h = self.natural.height * zoom;
        Rect::new(
            (self.viewport.width - draw_w) / 2.0 + offset.x,
            (self.viewport.height - draw_h) / 2.0 + offset.y,
            draw_w,
            draw_h,
        )
    }

    /// Push the offset back by exactly the overlap on any side where the
    /// drawn image would leave part of the crop box uncovered. Single pass:
    /// the right/bottom correction wins if both sides of an axis are short.
    pub fn clamp_offset(&self, offset: Point, zoom: f64) -> Point {
        let draw_w = self.natural.width * zoom;
        let draw_h = self.natural.height * zoom;
        let base_x = (self.viewport.width - draw_w) / 2.0;
        let base_y = (self.viewport.height - draw_h) / 2.0;

        // Offsets at which the image's left/top edge meets the crop box.
        let max_x = self.crop_box.x - base_x;
        let max_y = self.crop_box.y - base_y;
        // Offsets at which the image's right/bottom edge meets the crop box.
        let min_x = self.crop_box.right() - draw_w - base_x;
        let min_y = self.crop_box.bottom() - draw_h - base_y;

        Point::new(
            clamp_axis(offset.x, min_x, max_x),
            clamp_axis(offset.y, min_y, max_y),
        )
    }

    /// Clamp `requested` into the zoom range, then re-clamp the offset so the
    /// crop box stays covered at the new zoom.
    pub fn set_zoom(&self, state: &mut TransformState, requested: f64) -> f64 {
        let zoom = self.clamp_zoom(requested);
        state.offset = self.clamp_offset(state.offset, zoom);
        state.zoom = zoom;
        zoom
    }

    pub fn begin_drag(&self, state: &TransformState, pointer: Point) -> DragGesture {
        DragGesture {
            pointer_start: pointer,
            offset_start: state.offset,
        }
    }

    /// Apply a total displacement `(dx, dy)` since the gesture started.
    pub fn pan_by(
        &self,
        state: &mut TransformState,
        gesture: &DragGesture,
        dx: f64,
        dy: f64,
    ) -> Point {
        let requested = Point::new(gesture.offset_start.x + dx, gesture.offset_start.y + dy);
        state.offset = self.clamp_offset(requested, state.zoom);
        state.offset
    }

    pub fn drag_to(&self, state: &mut TransformState, gesture: &DragGesture, pointer: Point) -> Point {
        let dx = pointer.x - gesture.pointer_start.x;
        let dy = pointer.y - gesture.pointer_start.y;
        self.pan_by(state, gesture, dx, dy)
    }
}

/// NaN lands on `max` so a bad pointer reading cannot leave the crop box
/// uncovered; infinities are caught by the comparisons below.
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    let mut v = value;
    if v.is_nan() || v > max {
        v = max;
    }
    if v < min {
        v = min;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_controller() -> ViewportController {
        ViewportController::new(
            Size::new(800.0, 600.0),
            Size::new(3000.0, 2000.0),
            1.0,
            &CropperConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn clamp_axis_never_returns_nan() {
        assert_eq!(clamp_axis(f64::NAN, -10.0, 10.0), 10.0);
        assert_eq!(clamp_axis(f64::NAN, 10.0, 0.0), 10.0);
        assert_eq!(clamp_axis(f64::INFINITY, -10.0, 10.0), 10.0);
        assert_eq!(clamp_axis(f64::NEG_INFINITY, -10.0, 10.0), -10.0);
    }

    #[test]
    fn clamp_axis_right_wins_when_range_inverted() {
        assert_eq!(clamp_axis(5.0, 10.0, 0.0), 10.0);
        assert_eq!(clamp_axis(-5.0, 10.0, 0.0), 10.0);
    }

    #[test]
    fn initial_transform_is_already_clamped() {
        let c = square_controller();
        let t = c.initial_transform();
        assert_eq!(c.clamp_offset(t.offset, t.zoom), t.offset);
    }

    #[test]
    fn nan_zoom_falls_back_to_minimum() {
        let c = square_controller();
        assert_eq!(c.clamp_zoom(f64::NAN), c.min_zoom());
    }

    #[test]
    fn max_zoom_factor_below_one_is_ignored() {
        let config = CropperConfig {
            max_zoom_factor: 0.5,
            ..CropperConfig::default()
        };
        let c = ViewportController::new(
            Size::new(800.0, 600.0),
            Size::new(100.0, 100.0),
            1.0,
            &config,
        )
        .unwrap();
        assert_eq!(c.min_zoom(), c.max_zoom());
    }
}
