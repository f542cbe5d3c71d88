// Files handed to the inpainting step.
//
// A save writes `mask.png` (white = repaint) plus `mask.json` describing the
// region in words, and optionally `source.png` so a vision model can look at
// the photo and mask side by side.

use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Serialize;

use crate::error::Error;
use crate::region::RegionDescriptor;
use crate::types::MaskImage;

pub const MASK_FILE: &str = "mask.png";
pub const SIDECAR_FILE: &str = "mask.json";
pub const SOURCE_FILE: &str = "source.png";

/// Aspect ratio past which a photo counts as landscape (or, inverted, portrait).
const ASPECT_TOLERANCE: f64 = 1.2;

/// Output size to ask the generation service for, picked from the photo's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputResolution {
    #[serde(rename = "1024x1024")]
    Square,
    #[serde(rename = "1536x1024")]
    Landscape,
    #[serde(rename = "1024x1536")]
    Portrait,
}

impl OutputResolution {
    pub fn for_source(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return OutputResolution::Square;
        }
        let aspect = f64::from(width) / f64::from(height);
        if aspect > ASPECT_TOLERANCE {
            OutputResolution::Landscape
        } else if aspect < 1.0 / ASPECT_TOLERANCE {
            OutputResolution::Portrait
        } else {
            OutputResolution::Square
        }
    }

    pub fn size(self) -> (u32, u32) {
        match self {
            OutputResolution::Square => (1024, 1024),
            OutputResolution::Landscape => (1536, 1024),
            OutputResolution::Portrait => (1024, 1536),
        }
    }
}

impl fmt::Display for OutputResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.size();
        write!(f, "{w}x{h}")
    }
}

/// JSON written next to the mask.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sidecar {
    pub width: u32,
    pub height: u32,
    /// `None` when nothing is painted.
    pub position: Option<String>,
    pub size: Option<String>,
    pub prompt_hint: Option<String>,
    pub output_resolution: OutputResolution,
}

impl Sidecar {
    pub fn new(width: u32, height: u32, region: Option<&RegionDescriptor>) -> Self {
        Self {
            width,
            height,
            position: region.map(|r| r.position.to_string()),
            size: region.map(|r| r.size.to_string()),
            prompt_hint: region.map(RegionDescriptor::prompt_hint),
            output_resolution: OutputResolution::for_source(width, height),
        }
    }
}

/// Paths of what one save produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved {
    pub mask: PathBuf,
    pub sidecar: PathBuf,
    pub source: Option<PathBuf>,
}

impl Saved {
    /// One-line HUD notice naming where the mask went.
    pub fn notice(&self) -> String {
        let mut line = format!("SAVED {}", self.mask.display());
        if self.source.is_some() {
            line.push_str(" + SOURCE");
        }
        line
    }
}

/// Write mask, sidecar and (optionally) source into `dir`, creating it if needed.
pub fn save(
    dir: &Path,
    mask: &MaskImage,
    region: Option<&RegionDescriptor>,
    source: Option<&RgbaImage>,
) -> Result<Saved, Error> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::Export(format!("{}: {e}", dir.display())))?;

    let mask_path = dir.join(MASK_FILE);
    mask.save(&mask_path)
        .map_err(|e| Error::Export(format!("{}: {e}", mask_path.display())))?;

    let (width, height) = mask.dimensions();
    let sidecar = Sidecar::new(width, height, region);
    let json = serde_json::to_string_pretty(&sidecar)
        .map_err(|e| Error::Export(format!("sidecar: {e}")))?;
    let sidecar_path = dir.join(SIDECAR_FILE);
    std::fs::write(&sidecar_path, json)
        .map_err(|e| Error::Export(format!("{}: {e}", sidecar_path.display())))?;

    let source_path = match source {
        Some(img) => {
            let p = dir.join(SOURCE_FILE);
            img.save(&p).map_err(|e| Error::Export(format!("{}: {e}", p.display())))?;
            Some(p)
        }
        None => None,
    };

    log::info!("Saved mask to {}", mask_path.display());
    Ok(Saved { mask: mask_path, sidecar: sidecar_path, source: source_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::StrokeBounds;
    use crate::region::classify;
    use tempfile::TempDir;

    #[test]
    fn resolution_follows_aspect() {
        assert_eq!(OutputResolution::for_source(1000, 1000), OutputResolution::Square);
        assert_eq!(OutputResolution::for_source(1100, 1000), OutputResolution::Square);
        assert_eq!(OutputResolution::for_source(1920, 1080), OutputResolution::Landscape);
        assert_eq!(OutputResolution::for_source(1080, 1920), OutputResolution::Portrait);
        assert_eq!(OutputResolution::Landscape.to_string(), "1536x1024");
    }

    #[test]
    fn sidecar_without_region_has_nulls() {
        let json = serde_json::to_value(Sidecar::new(800, 600, None)).unwrap();
        assert_eq!(json["position"], serde_json::Value::Null);
        assert_eq!(json["output_resolution"], "1536x1024");
    }

    #[test]
    fn save_writes_mask_and_sidecar() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("handoff");
        let mask = MaskImage::from_pixel(10, 10, image::Luma([255]));
        let region = classify(&StrokeBounds::new(0.0, 0.0, 10.0, 10.0), 10, 10);
        let source = RgbaImage::new(10, 10);

        let saved = save(&out, &mask, Some(&region), Some(&source)).unwrap();

        let back = image::open(&saved.mask).unwrap().to_luma8();
        assert_eq!(back, mask);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&saved.sidecar).unwrap()).unwrap();
        assert_eq!(json["position"], "center");
        assert_eq!(json["size"], "extra-large-sized");
        assert_eq!(json["width"], 10);
        assert!(saved.source.as_ref().unwrap().exists());
        assert_eq!(saved.notice(), format!("SAVED {} + SOURCE", out.join(MASK_FILE).display()));
    }

    #[test]
    fn notice_names_the_mask_file() {
        let dir = TempDir::new().unwrap();
        let saved = save(dir.path(), &MaskImage::new(4, 4), None, None).unwrap();
        assert_eq!(saved.mask, dir.path().join(MASK_FILE));
        assert!(saved.notice().starts_with("SAVED "));
        assert!(saved.notice().ends_with(MASK_FILE));
    }
}
