mod common;

use approx::assert_relative_eq;
use proptest::prelude::*;

use cropper_core::compositor::{encode_jpeg, export, plan_export, resample};
use cropper_core::config::{CropperConfig, ExportConfig};
use cropper_core::controller::ViewportController;
use cropper_core::geometry::{Point, Size};
use cropper_core::source::SourceImage;

use common::{controller, solid_image, split_image};

#[test]
fn test_square_scenario_caps_at_1920() {
    let c = controller(3000.0, 2000.0, 1.0);
    let plan = plan_export(&c, &c.initial_transform(), 1.0, &ExportConfig::default()).unwrap();

    // Image drawn 828x552 at (-14, 24); crop box at (124, 24).
    assert_relative_eq!(plan.source_rect.x, 500.0, epsilon = 1e-6);
    assert_relative_eq!(plan.source_rect.y, 0.0, epsilon = 1e-6);
    assert_relative_eq!(plan.source_rect.width, 2000.0, epsilon = 1e-6);
    assert_relative_eq!(plan.source_rect.height, 2000.0, epsilon = 1e-6);
    assert_eq!((plan.output_width, plan.output_height), (1920, 1920));
}

#[test]
fn test_portrait_caps_at_800() {
    let c = controller(3000.0, 4000.0, 0.75);
    let plan = plan_export(&c, &c.initial_transform(), 0.75, &ExportConfig::default()).unwrap();
    assert_relative_eq!(plan.source_rect.width, 3000.0, epsilon = 1e-6);
    assert_eq!((plan.output_width, plan.output_height), (800, 1067));
}

#[test]
fn test_small_source_is_not_upscaled() {
    let c = controller(600.0, 400.0, 1.0);
    let plan = plan_export(&c, &c.initial_transform(), 1.0, &ExportConfig::default()).unwrap();
    assert_eq!((plan.output_width, plan.output_height), (400, 400));
}

#[test]
fn test_zoomed_in_source_rect_shrinks() {
    let c = controller(3000.0, 2000.0, 1.0);
    let mut t = c.initial_transform();
    c.set_zoom(&mut t, c.min_zoom() * 2.0);
    let plan = plan_export(&c, &t, 1.0, &ExportConfig::default()).unwrap();

    assert_relative_eq!(plan.source_rect.width, 1000.0, epsilon = 1e-6);
    // Still centered on the image.
    assert_relative_eq!(plan.source_rect.x, 1000.0, epsilon = 1e-6);
    assert_relative_eq!(plan.source_rect.y, 500.0, epsilon = 1e-6);
    assert_eq!(plan.output_width, 1000);
}

#[test]
fn test_panned_to_left_edge() {
    let c = controller(3000.0, 2000.0, 1.0);
    let mut t = c.initial_transform();
    let gesture = c.begin_drag(&t, Point::ZERO);
    c.pan_by(&mut t, &gesture, 10_000.0, 0.0);
    let plan = plan_export(&c, &t, 1.0, &ExportConfig::default()).unwrap();
    assert_relative_eq!(plan.source_rect.x, 0.0, epsilon = 1e-6);
}

#[test]
fn test_resample_picks_the_visible_region() {
    // 60x40 in a 200x200 viewport with no padding: min zoom 5, image drawn
    // 300x200 at (-50, 0), so the crop covers source columns 10..50.
    let config = CropperConfig {
        padding: 0.0,
        ..CropperConfig::default()
    };
    let c = ViewportController::new(Size::new(200.0, 200.0), Size::new(60.0, 40.0), 1.0, &config)
        .unwrap();
    let source = SourceImage::from_rgba(split_image(60, 40)).unwrap();
    let plan = plan_export(&c, &c.initial_transform(), 1.0, &config.export).unwrap();
    assert_eq!((plan.output_width, plan.output_height), (40, 40));

    let raster = resample(&source, &plan).unwrap();
    assert_eq!(raster.dimensions(), (40, 40));
    assert_eq!(raster.get_pixel(5, 20).0, [255, 0, 0, 255]);
    assert_eq!(raster.get_pixel(35, 20).0, [0, 0, 255, 255]);
}

#[test]
fn test_resample_downscale_averages() {
    // Alternating black/white columns average to mid grey when halved.
    let img = image::RgbaImage::from_fn(64, 64, |x, _| {
        if x % 2 == 0 {
            image::Rgba([0, 0, 0, 255])
        } else {
            image::Rgba([255, 255, 255, 255])
        }
    });
    let source = SourceImage::from_rgba(img).unwrap();
    let config = CropperConfig {
        padding: 0.0,
        ..CropperConfig::default()
    };
    let c = ViewportController::new(Size::new(64.0, 64.0), Size::new(64.0, 64.0), 1.0, &config)
        .unwrap();
    let mut plan = plan_export(&c, &c.initial_transform(), 1.0, &config.export).unwrap();
    plan.output_width = 32;
    plan.output_height = 32;

    let raster = resample(&source, &plan).unwrap();
    let p = raster.get_pixel(10, 10).0;
    assert!((p[0] as i32 - 128).abs() <= 2, "got {p:?}");
}

#[test]
fn test_export_encodes_jpeg() {
    let config = CropperConfig {
        padding: 0.0,
        ..CropperConfig::default()
    };
    let c = ViewportController::new(Size::new(200.0, 200.0), Size::new(60.0, 40.0), 1.0, &config)
        .unwrap();
    let source = SourceImage::from_rgba(split_image(60, 40)).unwrap();

    let file = export(&source, &c, &c.initial_transform(), 1.0, &config.export, "team photo.png")
        .unwrap();
    assert_eq!(file.name, "team photo.jpg");
    assert_eq!(file.mime_type, "image/jpeg");
    assert_eq!((file.width, file.height), (40, 40));

    let decoded = image::load_from_memory(&file.bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (40, 40));
    let left = decoded.get_pixel(5, 20).0;
    let right = decoded.get_pixel(35, 20).0;
    assert!(left[0] > 200 && left[2] < 60, "left {left:?}");
    assert!(right[2] > 200 && right[0] < 60, "right {right:?}");
}

#[test]
fn test_transparent_pixels_flatten_to_black() {
    let raster = solid_image(16, 16, [255, 255, 255, 0]);
    let bytes = encode_jpeg(&raster, 90).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    let p = decoded.get_pixel(8, 8).0;
    assert!(p.iter().all(|&c| c < 10), "got {p:?}");
}

proptest! {
    #[test]
    fn prop_output_dimension_bound(
        nw in 50.0f64..8000.0,
        nh in 50.0f64..8000.0,
        ratio in 0.3f64..3.5,
        zoom_t in 0.0f64..=1.0,
    ) {
        let c = controller(nw, nh, ratio);
        let mut t = c.initial_transform();
        c.set_zoom(&mut t, c.min_zoom() + (c.max_zoom() - c.min_zoom()) * zoom_t);

        let config = ExportConfig::default();
        let plan = plan_export(&c, &t, ratio, &config).unwrap();
        let cap = if ratio >= 1.0 { 1920 } else { 800 };
        prop_assert!(plan.output_width <= cap);
        let expected_h = plan.output_width as f64 / ratio;
        prop_assert!((plan.output_height as f64 - expected_h).abs() <= 1.0);

        // The source footprint stays inside the image.
        let r = plan.source_rect;
        prop_assert!(r.x >= -1e-6 && r.y >= -1e-6);
        prop_assert!(r.right() <= nw + 1e-6 && r.bottom() <= nh + 1e-6);
    }
}
