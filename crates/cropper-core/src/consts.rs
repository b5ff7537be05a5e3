/// Minimum output pixel count (w*h) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Margin (in viewport pixels) kept free around the crop box.
pub const DEFAULT_PADDING: f64 = 24.0;

/// Maximum zoom as a multiple of the minimum covering zoom.
pub const DEFAULT_MAX_ZOOM_FACTOR: f64 = 5.0;

/// Maximum exported width for landscape and square aspect ratios.
pub const DEFAULT_LANDSCAPE_MAX_WIDTH: u32 = 1920;

/// Maximum exported width for portrait aspect ratios.
pub const DEFAULT_PORTRAIT_MAX_WIDTH: u32 = 800;

/// JPEG quality (1-100) of the exported crop.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Largest accepted upload, in bytes (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Viewport used when no surface size is supplied.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

/// Dimmed mask outside the crop box: black at 60% opacity.
pub const MASK_COLOR: [u8; 4] = [0, 0, 0, 153];

/// Crop box outline: white at 80% opacity.
pub const BORDER_COLOR: [u8; 4] = [255, 255, 255, 204];
pub const BORDER_WIDTH: f64 = 2.0;

/// Rule-of-thirds guide: white at 25% opacity.
pub const GRID_COLOR: [u8; 4] = [255, 255, 255, 64];
pub const GRID_WIDTH: f64 = 1.0;

/// Upper bound on bilinear taps per axis when downscaling during export.
pub const MAX_SUPERSAMPLE: u32 = 4;

/// Slack allowed when checking that the drawn image covers the crop box.
pub const EPSILON: f64 = 1e-9;

/// MIME type of every exported crop.
pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";

/// Extension given to every exported crop.
pub const OUTPUT_EXTENSION: &str = "jpg";
