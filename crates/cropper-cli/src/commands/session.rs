use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use cropper_core::config::CropperConfig;
use cropper_core::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use cropper_core::controller::parse_aspect_ratio;
use cropper_core::geometry::{Point, Size};
use cropper_core::session::{CropSession, SessionStatus};
use cropper_core::upload::ImageFile;
use tracing::debug;

/// Arguments shared by every command that drives a crop session.
#[derive(Args)]
pub struct SessionArgs {
    /// Input image file
    pub file: PathBuf,

    /// Aspect ratio as W:H or a decimal (e.g. 16:9, 1, 0.75)
    #[arg(short, long, value_parser = parse_aspect)]
    pub aspect: f64,

    /// Editor surface size as WxH
    #[arg(long, value_parser = parse_size)]
    pub viewport: Option<Size>,

    /// Zoom as a multiple of the minimum covering zoom (1.0-5.0)
    #[arg(long, default_value = "1.0")]
    pub zoom: f64,

    /// Pan gesture displacement in surface pixels as DX,DY
    #[arg(long, value_parser = parse_pan, allow_hyphen_values = true)]
    pub pan: Option<Point>,

    /// TOML config file (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl SessionArgs {
    pub fn load_config(&self) -> Result<CropperConfig> {
        match &self.config {
            Some(path) => CropperConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display())),
            None => Ok(CropperConfig::default()),
        }
    }

    /// Validate and decode the input, lay it out, then replay the zoom and
    /// pan input as the editor would receive it.
    pub fn open(&self) -> Result<CropSession> {
        let config = self.load_config()?;

        let file = ImageFile::read(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        file.validate(&config.upload)
            .with_context(|| format!("{} rejected", file.name))?;

        let mut session = CropSession::new(self.aspect, config)?;
        session
            .load(&file)
            .with_context(|| format!("Failed to decode {}", file.name))?;
        drop(file);

        let viewport = self
            .viewport
            .unwrap_or(Size::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT));
        session.resize(viewport);

        match session.status() {
            SessionStatus::Ready => {}
            SessionStatus::Loading => bail!(
                "Viewport {}x{} is too small for the crop box",
                viewport.width,
                viewport.height
            ),
            SessionStatus::Failed(reason) => bail!("Session failed: {reason}"),
        }

        if let Some((min, _)) = session.zoom_range() {
            let zoom = session.set_zoom(min * self.zoom);
            debug!(?zoom, "Zoom applied");
        }

        if let Some(pan) = self.pan {
            let centre = Point::new(viewport.width / 2.0, viewport.height / 2.0);
            session.begin_drag(centre);
            let offset = session.drag_to(Point::new(centre.x + pan.x, centre.y + pan.y));
            session.end_drag();
            debug!(?offset, "Pan applied");
        }

        Ok(session)
    }
}

fn parse_aspect(s: &str) -> Result<f64, String> {
    parse_aspect_ratio(s).map_err(|e| e.to_string())
}

fn parse_pair(s: &str, sep: char) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(sep)
        .ok_or_else(|| format!("expected two numbers separated by '{sep}'"))?;
    let a = a.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let b = b.trim().parse::<f64>().map_err(|e| e.to_string())?;
    if !(a.is_finite() && b.is_finite()) {
        return Err(format!("'{s}' must contain finite numbers"));
    }
    Ok((a, b))
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = parse_pair(&s.to_ascii_lowercase(), 'x')?;
    Ok(Size::new(w, h))
}

fn parse_pan(s: &str) -> Result<Point, String> {
    let (dx, dy) = parse_pair(s, ',')?;
    Ok(Point::new(dx, dy))
}
