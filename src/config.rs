// User settings: brush, tint, window limits and where handoff files go.
// Read from an optional TOML file; anything missing keeps its default.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Directory name under the platform config dir.
pub const CONFIG_DIR: &str = "region-mask";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Brush diameter in on-screen pixels.
    pub brush_size: f64,
    /// Tint used to show painted pixels.
    pub overlay_color: [u8; 3],
    /// 0 = invisible, 1 = solid.
    pub overlay_opacity: f32,
    /// The window opens at the photo's aspect ratio, no larger than this.
    pub max_window_width: usize,
    pub max_window_height: usize,
    /// Where the mask PNG and its JSON sidecar are written.
    pub output_dir: PathBuf,
    /// Also write the source photo next to the mask.
    pub save_source: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brush_size: 30.0,
            overlay_color: [255, 0, 0],
            overlay_opacity: 0.5,
            max_window_width: 1280,
            max_window_height: 860,
            output_dir: PathBuf::from("."),
            save_source: false,
        }
    }
}

impl Settings {
    /// `<config_dir>/region-mask/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let settings: Settings = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load `path`, or the default location when `None`.
    /// An explicit path must exist; a missing default file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                log::info!("Using settings from {}", path.display());
                Self::from_toml(&text).map_err(|e| match e {
                    Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
                    other => other,
                })
            }
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::Config(format!("{}: {e}", path.display()))),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.brush_size.is_finite() && self.brush_size > 0.0) {
            return Err(Error::Config(format!("brush_size must be > 0, got {}", self.brush_size)));
        }
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(Error::Config(format!(
                "overlay_opacity must be within 0..=1, got {}",
                self.overlay_opacity
            )));
        }
        if self.max_window_width == 0 || self.max_window_height == 0 {
            return Err(Error::Config("max window size must be non-zero".into()));
        }
        Ok(())
    }
}
