//! Snapmark command line: composite an annotation list onto an image

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Local;

use snapmark::domain::{Annotation, DisplayMetadata, Screenshot};
use snapmark::{AnnotatorConfig, FontBook, composite_screenshot};

const USAGE: &str = "usage: snapmark <image> <annotations.json> <output>";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        log::error!("{:?}", err);
        eprintln!("snapmark: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [image_path, annotations_path, output_path] = args.as_slice() else {
        bail!(USAGE);
    };
    let (image_path, annotations_path, output_path) = (
        PathBuf::from(image_path),
        PathBuf::from(annotations_path),
        PathBuf::from(output_path),
    );

    let config = AnnotatorConfig::load();
    log::debug!("Loaded config: {:?}", config);

    let image = image::open(&image_path)
        .with_context(|| format!("Failed to open image {}", image_path.display()))?
        .to_rgba8();

    let json = std::fs::read_to_string(&annotations_path)
        .with_context(|| format!("Failed to read {}", annotations_path.display()))?;
    let annotations: Vec<Annotation> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid annotation list in {}", annotations_path.display()))?;
    log::info!(
        "Compositing {} annotations onto {}x{} image",
        annotations.len(),
        image.width(),
        image.height()
    );

    let mut screenshot = Screenshot::new(image, Local::now(), DisplayMetadata::default());
    screenshot.annotations = annotations;

    let mut fonts = FontBook::with_system_fallback();
    if let Some(font_path) = config.font_path.as_deref() {
        fonts
            .load_file(&config.font_family, font_path)
            .with_context(|| format!("Failed to load font for '{}'", config.font_family))?;
    }

    let output = composite_screenshot(&screenshot, &fonts)?;
    output
        .save(&output_path)
        .with_context(|| format!("Failed to save {}", output_path.display()))?;
    log::info!("Saved {}", output_path.display());
    Ok(())
}
