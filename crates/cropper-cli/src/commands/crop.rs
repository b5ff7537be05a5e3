use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use cropper_core::compositor::save_png;
use indicatif::{ProgressBar, ProgressStyle};

use super::session::SessionArgs;
use crate::summary::print_session_summary;

#[derive(Args)]
pub struct CropArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Output JPEG path (defaults to <input>_crop.jpg)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the editor preview as PNG
    #[arg(long)]
    pub preview: Option<PathBuf>,
}

pub fn run(args: &CropArgs) -> Result<()> {
    let session = args.session.open()?;
    print_session_summary(&session, &args.session.file);

    if let Some(ref path) = args.preview {
        if let Some(surface) = session.render_preview_image() {
            save_png(&surface, path)
                .with_context(|| format!("Failed to write preview to {}", path.display()))?;
            println!("Preview saved to {}", path.display());
        }
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| crop_output_path(&args.session.file));

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message("Exporting crop");
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut exported = None;
    let result = session.confirm(|file| exported = Some(file));
    pb.finish_and_clear();
    result.context("Export failed")?;

    let file = exported.context("Export produced no file")?;
    file.write_to(&output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!(
        "Saved {}x{} {} ({:.1} KB) to {}",
        file.width,
        file.height,
        file.mime_type,
        file.len() as f64 / 1024.0,
        output_path.display()
    );
    Ok(())
}

fn crop_output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let parent = source.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_crop.jpg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_sits_next_to_input() {
        assert_eq!(
            crop_output_path(Path::new("photos/team.png")),
            PathBuf::from("photos/team_crop.jpg")
        );
        assert_eq!(crop_output_path(Path::new("a.jpg")), PathBuf::from("a_crop.jpg"));
    }
}
