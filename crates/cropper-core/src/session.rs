use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::compositor::{self, CroppedFile, PreviewScene};
use crate::config::CropperConfig;
use crate::controller::crop_box::validate_aspect_ratio;
use crate::controller::{aspect_label, DragGesture, TransformState, ViewportController};
use crate::error::{CropperError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::source::SourceImage;
use crate::upload::ImageFile;

/// Where a session is in its lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionStatus {
    /// No decoded image yet, or no usable viewport.
    Loading,
    /// Image and geometry are valid; preview and export are available.
    Ready,
    /// The image could not be decoded.
    Failed(String),
}

/// One interactive crop, from file load to confirm or cancel.
///
/// All mutable state of the editor lives here. Confirm and cancel consume the
/// session so the decoded bitmap is released with it.
#[derive(Debug)]
pub struct CropSession {
    config: CropperConfig,
    aspect_ratio: f64,
    file_name: String,
    source: Option<Arc<SourceImage>>,
    failure: Option<String>,
    viewport: Option<Size>,
    controller: Option<ViewportController>,
    transform: Option<TransformState>,
    drag: Option<DragGesture>,
}

impl CropSession {
    pub fn new(aspect_ratio: f64, config: CropperConfig) -> Result<Self> {
        let aspect_ratio = validate_aspect_ratio(aspect_ratio)?;
        Ok(Self {
            config,
            aspect_ratio,
            file_name: String::new(),
            source: None,
            failure: None,
            viewport: None,
            controller: None,
            transform: None,
            drag: None,
        })
    }

    /// Decode `file` into the session's source image. The file is only
    /// borrowed for the decode; on failure the session moves to `Failed`.
    pub fn load(&mut self, file: &ImageFile) -> Result<()> {
        self.file_name = file.name.clone();
        self.source = None;
        self.controller = None;
        self.transform = None;
        self.drag = None;

        match SourceImage::decode(file) {
            Ok(source) => {
                self.failure = None;
                self.source = Some(Arc::new(source));
                self.relayout();
                Ok(())
            }
            Err(err) => {
                warn!(name = %file.name, error = %err, "Image decode failed");
                self.failure = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Install an already decoded image.
    pub fn load_source(&mut self, name: impl Into<String>, source: SourceImage) {
        self.file_name = name.into();
        self.failure = None;
        self.drag = None;
        self.source = Some(Arc::new(source));
        self.relayout();
    }

    /// Update the drawing surface size. A changed size recomputes the crop
    /// box, resets the transform to the initial fit and ends any drag.
    pub fn resize(&mut self, viewport: Size) {
        if self.viewport == Some(viewport) && self.controller.is_some() {
            return;
        }
        self.viewport = Some(viewport);
        if self.drag.take().is_some() {
            debug!("Drag gesture dropped by resize");
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        self.controller = match (&self.source, self.viewport) {
            (Some(source), Some(viewport)) => ViewportController::new(
                viewport,
                source.natural_size(),
                self.aspect_ratio,
                &self.config,
            ),
            _ => None,
        };
        self.transform = self.controller.as_ref().map(|c| c.initial_transform());

        if self.source.is_some() && self.viewport.is_some() && self.controller.is_none() {
            warn!(viewport = ?self.viewport, "Degenerate crop geometry, waiting for a usable viewport");
        }
    }

    pub fn status(&self) -> SessionStatus {
        if let Some(reason) = &self.failure {
            SessionStatus::Failed(reason.clone())
        } else if self.controller.is_some() {
            SessionStatus::Ready
        } else {
            SessionStatus::Loading
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == SessionStatus::Ready
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn aspect_label(&self) -> String {
        aspect_label(self.aspect_ratio)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> Option<&Arc<SourceImage>> {
        self.source.as_ref()
    }

    pub fn controller(&self) -> Option<&ViewportController> {
        self.controller.as_ref()
    }

    pub fn crop_box(&self) -> Option<Rect> {
        self.controller.as_ref().map(|c| c.crop_box())
    }

    pub fn transform(&self) -> Option<TransformState> {
        self.transform
    }

    /// Slider bounds `(min_zoom, max_zoom)`.
    pub fn zoom_range(&self) -> Option<(f64, f64)> {
        self.controller.as_ref().map(|c| (c.min_zoom(), c.max_zoom()))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn set_zoom(&mut self, requested: f64) -> Option<f64> {
        let controller = self.controller.as_ref()?;
        let transform = self.transform.as_mut()?;
        Some(controller.set_zoom(transform, requested))
    }

    /// Start a pan gesture at `pointer`, snapshotting the current offset.
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        match (&self.controller, &self.transform) {
            (Some(controller), Some(transform)) => {
                self.drag = Some(controller.begin_drag(transform, pointer));
                true
            }
            _ => false,
        }
    }

    pub fn drag_to(&mut self, pointer: Point) -> Option<Point> {
        let gesture = self.drag?;
        let controller = self.controller.as_ref()?;
        let transform = self.transform.as_mut()?;
        Some(controller.drag_to(transform, &gesture, pointer))
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Pan by a total displacement relative to the active gesture's origin,
    /// or relative to the current offset when no gesture is active.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Option<Point> {
        let controller = self.controller.as_ref()?;
        let transform = self.transform.as_mut()?;
        let gesture = self
            .drag
            .unwrap_or_else(|| controller.begin_drag(transform, Point::ZERO));
        Some(controller.pan_by(transform, &gesture, dx, dy))
    }

    pub fn preview(&self) -> Option<PreviewScene> {
        let controller = self.controller.as_ref()?;
        let transform = self.transform.as_ref()?;
        Some(compositor::render_preview(
            controller,
            transform,
            &self.config.overlay,
        ))
    }

    pub fn render_preview_image(&self) -> Option<RgbaImage> {
        let scene = self.preview()?;
        let source = self.source.as_ref()?;
        Some(compositor::rasterize(&scene, source))
    }

    /// Produce the cropped artifact without ending the session.
    pub fn export(&self) -> Result<CroppedFile> {
        let (Some(source), Some(controller), Some(transform)) =
            (&self.source, &self.controller, &self.transform)
        else {
            return Err(CropperError::NotReady);
        };
        if self.failure.is_some() {
            return Err(CropperError::NotReady);
        }
        compositor::export(
            source,
            controller,
            transform,
            self.aspect_ratio,
            &self.config.export,
            &self.file_name,
        )
    }

    /// Export and hand the artifact to `on_crop`. The callback is not invoked
    /// when export fails.
    pub fn confirm<F: FnOnce(CroppedFile)>(self, on_crop: F) -> Result<()> {
        let file = self.export()?;
        info!(name = %file.name, "Crop session confirmed");
        on_crop(file);
        Ok(())
    }

    /// Abandon the session, dropping the decoded image.
    pub fn cancel<F: FnOnce()>(self, on_cancel: F) {
        info!(name = %self.file_name, "Crop session cancelled");
        drop(self);
        on_cancel();
    }
}
