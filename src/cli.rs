use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;

/// Paint over a product photo to mark the part an inpainting model should redo.
/// Writes a black/white mask plus a short position/size description.
#[derive(Debug, Parser)]
#[command(name = "region-mask", version, about)]
pub struct Cli {
    /// Photo to open. Without one, paste an image with V.
    pub image: Option<PathBuf>,

    /// Settings file (defaults to <config dir>/region-mask/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Brush diameter in screen pixels.
    #[arg(short, long)]
    pub brush: Option<f64>,

    /// Directory for mask.png / mask.json.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the photo next to the mask.
    #[arg(long)]
    pub save_source: bool,

    /// Debug logging (RUST_LOG still wins when set).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Command-line values win over the settings file.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(brush) = self.brush {
            settings.brush_size = brush;
        }
        if let Some(output) = &self.output {
            settings.output_dir = output.clone();
        }
        if self.save_source {
            settings.save_source = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let cli = Cli::parse_from(["region-mask", "shoe.jpg", "-b", "12", "-o", "out", "--save-source"]);
        let mut settings = Settings::default();
        cli.apply(&mut settings);
        assert_eq!(cli.image, Some(PathBuf::from("shoe.jpg")));
        assert_eq!(settings.brush_size, 12.0);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert!(settings.save_source);
    }

    #[test]
    fn no_flags_leave_settings_alone() {
        let cli = Cli::parse_from(["region-mask"]);
        let mut settings = Settings::default();
        cli.apply(&mut settings);
        assert_eq!(settings, Settings::default());
        assert!(cli.image.is_none());
    }
}
