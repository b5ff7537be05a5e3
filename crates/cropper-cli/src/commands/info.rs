use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cropper_core::config::UploadConfig;
use cropper_core::source::SourceImage;
use cropper_core::upload::ImageFile;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let file = ImageFile::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    println!("MIME type:   {}", file.mime_type);
    println!("Size:        {:.1} KB", file.len() as f64 / 1024.0);

    match file.validate(&UploadConfig::default()) {
        Ok(()) => println!("Upload:      accepted"),
        Err(e) => println!("Upload:      rejected ({e})"),
    }

    match SourceImage::decode(&file) {
        Ok(source) => {
            println!("Dimensions:  {}x{}", source.width(), source.height());
            let ratio = source.width() as f64 / source.height() as f64;
            println!("Aspect:      {:.3}", ratio);
        }
        Err(e) => println!("Decode:      failed ({e})"),
    }

    Ok(())
}
