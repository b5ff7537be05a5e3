pub mod export;
pub mod preview;

pub use export::{encode_jpeg, export, plan_export, resample, CroppedFile, ExportPlan};
pub use preview::{rasterize, render_preview, save_png, DrawCommand, PreviewScene};
