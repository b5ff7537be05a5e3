#![allow(dead_code)]

use std::io::Cursor;

use cropper_core::config::CropperConfig;
use cropper_core::controller::ViewportController;
use cropper_core::geometry::Size;
use cropper_core::upload::ImageFile;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// Solid-colour RGBA image.
pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Left half red, right half blue.
pub fn split_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
}

pub fn encode(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    let dynamic = DynamicImage::ImageRgba8(img.clone());
    // JPEG has no alpha channel.
    let dynamic = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(dynamic.to_rgb8())
    } else {
        dynamic
    };
    dynamic
        .write_to(&mut buf, format)
        .expect("encode test image");
    buf.into_inner()
}

/// Wrap an image as an uploaded PNG file.
pub fn png_file(name: &str, img: &RgbaImage) -> ImageFile {
    ImageFile::new(name, "image/png", encode(img, ImageFormat::Png))
}

/// Controller for the stock 800x600 viewport with default config.
pub fn controller(natural_w: f64, natural_h: f64, aspect_ratio: f64) -> ViewportController {
    ViewportController::new(
        Size::new(800.0, 600.0),
        Size::new(natural_w, natural_h),
        aspect_ratio,
        &CropperConfig::default(),
    )
    .expect("valid geometry")
}
