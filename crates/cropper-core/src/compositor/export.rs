use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::consts::{MAX_SUPERSAMPLE, OUTPUT_MIME_TYPE, PARALLEL_PIXEL_THRESHOLD};
use crate::controller::{TransformState, ViewportController};
use crate::error::{CropperError, Result};
use crate::geometry::Rect;
use crate::source::SourceImage;
use crate::upload::output_file_name;

/// Where the crop box lands in source pixels, and how big the output is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportPlan {
    pub source_rect: Rect,
    pub output_width: u32,
    pub output_height: u32,
}

/// The encoded crop handed back to the caller.
#[derive(Clone, Debug)]
pub struct CroppedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CroppedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Map the crop box back into source-pixel space and size the output.
///
/// Output width is the source footprint's width rounded, capped by the
/// landscape or portrait limit; output height follows from the aspect ratio.
pub fn plan_export(
    controller: &ViewportController,
    transform: &TransformState,
    aspect_ratio: f64,
    config: &ExportConfig,
) -> Result<ExportPlan> {
    let zoom = transform.zoom;
    if !(zoom.is_finite() && zoom > 0.0) {
        return Err(CropperError::DegenerateGeometry(format!("zoom {zoom}")));
    }

    let image = controller.image_rect(zoom, transform.offset);
    let cb = controller.crop_box();
    let source_rect = Rect::new(
        (cb.x - image.x) / zoom,
        (cb.y - image.y) / zoom,
        cb.width / zoom,
        cb.height / zoom,
    );

    let max_width = config.max_width_for(aspect_ratio);
    let output_width = (source_rect.width.round() as u32).min(max_width);
    let output_height = (output_width as f64 / aspect_ratio).round() as u32;

    if output_width == 0 || output_height == 0 {
        return Err(CropperError::DegenerateGeometry(format!(
            "output would be {output_width}x{output_height}"
        )));
    }

    debug!(
        src_x = source_rect.x,
        src_y = source_rect.y,
        src_w = source_rect.width,
        src_h = source_rect.height,
        output_width,
        output_height,
        "Export planned"
    );

    Ok(ExportPlan {
        source_rect,
        output_width,
        output_height,
    })
}

/// Resample exactly `plan.source_rect` into a raster of the planned size.
///
/// Each output pixel averages a grid of bilinear taps, one per source pixel
/// it covers (capped), so large reductions behave like area averaging.
pub fn resample(source: &SourceImage, plan: &ExportPlan) -> Result<RgbaImage> {
    let out_w = plan.output_width as usize;
    let out_h = plan.output_height as usize;
    let src = plan.source_rect;

    let scale_x = src.width / out_w as f64;
    let scale_y = src.height / out_h as f64;
    let taps_x = (scale_x.ceil() as u32).clamp(1, MAX_SUPERSAMPLE);
    let taps_y = (scale_y.ceil() as u32).clamp(1, MAX_SUPERSAMPLE);
    let inv_taps = 1.0 / (taps_x * taps_y) as f64;

    let fill_row = |row: usize, chunk: &mut [u8]| {
        for col in 0..out_w {
            let mut acc = [0.0f64; 4];
            for j in 0..taps_y {
                let fy = row as f64 + (j as f64 + 0.5) / taps_y as f64;
                let sy = src.y + fy * scale_y;
                for i in 0..taps_x {
                    let fx = col as f64 + (i as f64 + 0.5) / taps_x as f64;
                    let sx = src.x + fx * scale_x;
                    let s = source.sample_bilinear(sx, sy);
                    for c in 0..4 {
                        acc[c] += s[c];
                    }
                }
            }
            for c in 0..4 {
                chunk[col * 4 + c] = (acc[c] * inv_taps).round().clamp(0.0, 255.0) as u8;
            }
        }
    };

    let mut buf = vec![0u8; out_w * out_h * 4];
    if out_w * out_h >= PARALLEL_PIXEL_THRESHOLD {
        buf.par_chunks_mut(out_w * 4)
            .enumerate()
            .for_each(|(row, chunk)| fill_row(row, chunk));
    } else {
        buf.chunks_mut(out_w * 4)
            .enumerate()
            .for_each(|(row, chunk)| fill_row(row, chunk));
    }

    RgbaImage::from_raw(plan.output_width, plan.output_height, buf)
        .ok_or_else(|| CropperError::Export("raster buffer size mismatch".into()))
}

/// Flatten onto black (JPEG has no alpha) and encode.
pub fn encode_jpeg(raster: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let (w, h) = raster.dimensions();
    let mut rgb = RgbImage::new(w, h);
    for (x, y, p) in raster.enumerate_pixels() {
        let a = p.0[3] as f64 / 255.0;
        let flat = |c: u8| (c as f64 * a).round() as u8;
        rgb.put_pixel(x, y, Rgb([flat(p.0[0]), flat(p.0[1]), flat(p.0[2])]));
    }

    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
        encoder.encode_image(&rgb)?;
    }
    Ok(bytes)
}

/// Plan, resample and encode the crop as a JPEG file named after
/// `original_name`.
pub fn export(
    source: &SourceImage,
    controller: &ViewportController,
    transform: &TransformState,
    aspect_ratio: f64,
    config: &ExportConfig,
    original_name: &str,
) -> Result<CroppedFile> {
    let plan = plan_export(controller, transform, aspect_ratio, config)?;
    let raster = resample(source, &plan)?;
    let bytes = encode_jpeg(&raster, config.jpeg_quality)?;
    if bytes.is_empty() {
        return Err(CropperError::Export("encoder produced no data".into()));
    }

    let file = CroppedFile {
        name: output_file_name(original_name),
        mime_type: OUTPUT_MIME_TYPE.to_string(),
        bytes,
        width: plan.output_width,
        height: plan.output_height,
    };
    info!(
        name = %file.name,
        width = file.width,
        height = file.height,
        size = file.len(),
        "Crop exported"
    );
    Ok(file)
}
