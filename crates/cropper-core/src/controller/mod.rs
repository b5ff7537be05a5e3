pub mod crop_box;
pub mod transform;

pub use crop_box::{aspect_label, compute_crop_box, initial_zoom, parse_aspect_ratio};
pub use transform::{DragGesture, TransformState, ViewportController};
