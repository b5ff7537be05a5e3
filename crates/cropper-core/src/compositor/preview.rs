use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::config::OverlayConfig;
use crate::consts::{BORDER_WIDTH, GRID_WIDTH};
use crate::controller::{TransformState, ViewportController};
use crate::error::Result;
use crate::geometry::{Point, Rect, Size};
use crate::source::SourceImage;

/// One drawing operation on the preview surface, in viewport coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Reset the whole surface to transparent.
    Clear,
    /// Draw the full source image scaled into `dest`.
    Image { dest: Rect },
    FillRect { rect: Rect, color: [u8; 4] },
    /// Outline centered on the rectangle's edges.
    StrokeRect { rect: Rect, width: f64, color: [u8; 4] },
    /// Axis-aligned line segment.
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: [u8; 4],
    },
}

/// A complete frame of the live preview.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewScene {
    pub size: Size,
    pub commands: Vec<DrawCommand>,
}

/// Build the preview for the current state: image, dimmed mask outside the
/// crop box, crop outline and rule-of-thirds guide.
pub fn render_preview(
    controller: &ViewportController,
    transform: &TransformState,
    overlay: &OverlayConfig,
) -> PreviewScene {
    let viewport = controller.viewport();
    let cb = controller.crop_box();
    let mut commands = Vec::with_capacity(11);

    commands.push(DrawCommand::Clear);
    commands.push(DrawCommand::Image {
        dest: controller.image_rect(transform.zoom, transform.offset),
    });

    for rect in mask_bands(viewport, &cb) {
        commands.push(DrawCommand::FillRect {
            rect,
            color: overlay.mask,
        });
    }

    commands.push(DrawCommand::StrokeRect {
        rect: cb,
        width: BORDER_WIDTH,
        color: overlay.border,
    });

    for i in 1..=2 {
        let gx = cb.x + cb.width / 3.0 * i as f64;
        let gy = cb.y + cb.height / 3.0 * i as f64;
        commands.push(DrawCommand::Line {
            from: Point::new(gx, cb.y),
            to: Point::new(gx, cb.bottom()),
            width: GRID_WIDTH,
            color: overlay.grid,
        });
        commands.push(DrawCommand::Line {
            from: Point::new(cb.x, gy),
            to: Point::new(cb.right(), gy),
            width: GRID_WIDTH,
            color: overlay.grid,
        });
    }

    PreviewScene {
        size: viewport,
        commands,
    }
}

/// Top and bottom bands span the full width; left and right bands fill the
/// remaining strip beside the crop box.
fn mask_bands(viewport: Size, cb: &Rect) -> [Rect; 4] {
    [
        Rect::new(0.0, 0.0, viewport.width, cb.y),
        Rect::new(0.0, cb.bottom(), viewport.width, viewport.height - cb.bottom()),
        Rect::new(0.0, cb.y, cb.x, cb.height),
        Rect::new(cb.right(), cb.y, viewport.width - cb.right(), cb.height),
    ]
}

/// Execute a scene onto a new RGBA surface.
pub fn rasterize(scene: &PreviewScene, source: &SourceImage) -> RgbaImage {
    let w = scene.size.width.round().max(0.0) as u32;
    let h = scene.size.height.round().max(0.0) as u32;
    let mut surface = RgbaImage::new(w, h);

    for command in &scene.commands {
        match command {
            DrawCommand::Clear => {
                for p in surface.pixels_mut() {
                    *p = Rgba([0, 0, 0, 0]);
                }
            }
            DrawCommand::Image { dest } => draw_image(&mut surface, source, dest),
            DrawCommand::FillRect { rect, color } => fill_rect(&mut surface, rect, *color),
            DrawCommand::StrokeRect { rect, width, color } => {
                let half = width / 2.0;
                let edges = [
                    Rect::new(rect.x - half, rect.y - half, rect.width + width, *width),
                    Rect::new(rect.x - half, rect.bottom() - half, rect.width + width, *width),
                    Rect::new(rect.x - half, rect.y + half, *width, rect.height - width),
                    Rect::new(rect.right() - half, rect.y + half, *width, rect.height - width),
                ];
                for edge in &edges {
                    fill_rect(&mut surface, edge, *color);
                }
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => fill_rect(&mut surface, &line_rect(from, to, *width), *color),
        }
    }

    surface
}

/// Save a rasterised preview as PNG.
pub fn save_png(surface: &RgbaImage, path: &Path) -> Result<()> {
    surface.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn line_rect(from: &Point, to: &Point, width: f64) -> Rect {
    let half = width / 2.0;
    let x0 = from.x.min(to.x);
    let y0 = from.y.min(to.y);
    if (from.x - to.x).abs() <= (from.y - to.y).abs() {
        Rect::new(x0 - half, y0, width, (to.y - from.y).abs())
    } else {
        Rect::new(x0, y0 - half, (to.x - from.x).abs(), width)
    }
}

/// Pixel index range whose centres fall inside `[start, end)`.
fn pixel_span(start: f64, end: f64, limit: u32) -> std::ops::Range<u32> {
    let lo = start.round().clamp(0.0, limit as f64) as u32;
    let hi = end.round().clamp(0.0, limit as f64) as u32;
    lo..hi.max(lo)
}

fn fill_rect(surface: &mut RgbaImage, rect: &Rect, color: [u8; 4]) {
    if rect.is_empty() {
        return;
    }
    let (w, h) = surface.dimensions();
    for y in pixel_span(rect.y, rect.bottom(), h) {
        for x in pixel_span(rect.x, rect.right(), w) {
            let dst = surface.get_pixel_mut(x, y);
            blend_over(dst, color.map(|c| c as f64));
        }
    }
}

fn draw_image(surface: &mut RgbaImage, source: &SourceImage, dest: &Rect) {
    if dest.is_empty() {
        return;
    }
    let (w, h) = surface.dimensions();
    let sx = source.width() as f64 / dest.width;
    let sy = source.height() as f64 / dest.height;

    for y in pixel_span(dest.y, dest.bottom(), h) {
        let src_y = (y as f64 + 0.5 - dest.y) * sy;
        for x in pixel_span(dest.x, dest.right(), w) {
            let src_x = (x as f64 + 0.5 - dest.x) * sx;
            let sample = source.sample_bilinear(src_x, src_y);
            blend_over(surface.get_pixel_mut(x, y), sample);
        }
    }
}

/// Source-over compositing of a straight-alpha colour onto `dst`.
fn blend_over(dst: &mut Rgba<u8>, src: [f64; 4]) {
    let sa = src[3] / 255.0;
    let da = dst.0[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (src[c] * sa + dst.0[c] as f64 * da * (1.0 - sa)) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    *dst = Rgba(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_half_black_over_white() {
        let mut px = Rgba([255, 255, 255, 255]);
        blend_over(&mut px, [0.0, 0.0, 0.0, 127.5]);
        assert_eq!(px, Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn blend_onto_transparent_keeps_colour() {
        let mut px = Rgba([0, 0, 0, 0]);
        blend_over(&mut px, [255.0, 255.0, 255.0, 64.0]);
        assert_eq!(px, Rgba([255, 255, 255, 64]));
    }

    #[test]
    fn vertical_line_rect_is_centered_on_x() {
        let r = line_rect(&Point::new(10.0, 5.0), &Point::new(10.0, 25.0), 1.0);
        assert_eq!(r, Rect::new(9.5, 5.0, 1.0, 20.0));
    }

    #[test]
    fn pixel_span_clamps_to_surface() {
        assert_eq!(pixel_span(-3.0, 4.4, 10), 0..4);
        assert_eq!(pixel_span(8.0, 20.0, 10), 8..10);
        assert_eq!(pixel_span(5.0, 2.0, 10), 5..5);
    }
}
