use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cropper_core::compositor::save_png;

use super::session::SessionArgs;
use crate::summary::print_session_summary;

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Output PNG path
    #[arg(short, long, default_value = "preview.png")]
    pub output: PathBuf,
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let session = args.session.open()?;
    print_session_summary(&session, &args.session.file);

    let surface = session
        .render_preview_image()
        .context("Session has no preview to render")?;
    save_png(&surface, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Preview saved to {}", args.output.display());
    // Cancelling releases the decoded image without exporting.
    session.cancel(|| {});
    Ok(())
}
