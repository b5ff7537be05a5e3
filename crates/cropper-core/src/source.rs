use image::{ImageFormat, RgbaImage};
use tracing::{debug, warn};

use crate::error::{CropperError, Result};
use crate::geometry::Size;
use crate::upload::ImageFile;

/// A decoded bitmap with its natural (intrinsic) dimensions.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self> {
        let (w, h) = pixels.dimensions();
        if w == 0 || h == 0 {
            return Err(CropperError::DegenerateGeometry(format!(
                "source image is {w}x{h}"
            )));
        }
        Ok(Self { pixels })
    }

    /// Decode an uploaded file. The declared MIME type picks the decoder when
    /// it is recognised; otherwise the format is sniffed from the bytes.
    pub fn decode(file: &ImageFile) -> Result<Self> {
        let decoded = match ImageFormat::from_mime_type(&file.mime_type) {
            Some(format) => image::load_from_memory_with_format(&file.bytes, format)
                .or_else(|err| {
                    warn!(
                        name = %file.name,
                        mime = %file.mime_type,
                        error = %err,
                        "Declared format failed, sniffing content"
                    );
                    image::load_from_memory(&file.bytes)
                }),
            None => image::load_from_memory(&file.bytes),
        }?;

        let source = Self::from_rgba(decoded.to_rgba8())?;
        debug!(
            name = %file.name,
            width = source.width(),
            height = source.height(),
            "Source image decoded"
        );
        Ok(source)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn natural_size(&self) -> Size {
        Size::new(self.width() as f64, self.height() as f64)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Bilinear sample at continuous pixel coordinates, where pixel centres
    /// sit at `i + 0.5`. Coordinates outside the bitmap clamp to the edge.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> [f64; 4] {
        let w = self.width() as i64;
        let h = self.height() as i64;

        let fx = x - 0.5;
        let fy = y - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;

        let cx0 = (x0 as i64).clamp(0, w - 1) as u32;
        let cx1 = (x0 as i64 + 1).clamp(0, w - 1) as u32;
        let cy0 = (y0 as i64).clamp(0, h - 1) as u32;
        let cy1 = (y0 as i64 + 1).clamp(0, h - 1) as u32;

        let p00 = self.pixels.get_pixel(cx0, cy0).0;
        let p10 = self.pixels.get_pixel(cx1, cy0).0;
        let p01 = self.pixels.get_pixel(cx0, cy1).0;
        let p11 = self.pixels.get_pixel(cx1, cy1).0;

        let mut out = [0.0f64; 4];
        for (c, v) in out.iter_mut().enumerate() {
            let top = p00[c] as f64 * (1.0 - tx) + p10[c] as f64 * tx;
            let bottom = p01[c] as f64 * (1.0 - tx) + p11[c] as f64 * tx;
            *v = top * (1.0 - ty) + bottom * ty;
        }
        out
    }
}
