/// Viewer and model settings, read from a RON file
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};

/// Locations of the model assets and the viewer's tuning constants.
///
/// Every field has a default, so a settings file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Triangle definitions, `i1,i2,i3` per line.
    pub mesh_file: PathBuf,
    pub average_shape: PathBuf,
    pub average_color: PathBuf,
    /// One shape weight per identity.
    pub shape_weights: PathBuf,
    /// One color weight per identity.
    pub color_weights: PathBuf,

    /// Identity `001` is read from `{shape_prefix}001{file_suffix}`.
    pub shape_prefix: String,
    pub color_prefix: String,
    pub file_suffix: String,

    /// Light color, shared by the directional and the point light.
    pub lighting: [u8; 3],
    /// Position of the preset point light, in screen space.
    pub point_light: [f64; 3],
    /// Diffuse reflection coefficient.
    pub diffuse: f64,

    /// Radians per rotation key press.
    pub rotation_step: f64,
    /// Fraction of the canvas the face is scaled to fill.
    pub screen_fit_factor: f64,
    /// Focal distance of a freshly selected perspective projector.
    pub perspective_focal: f64,
    pub focal_step: f64,
    /// Relative size change per zoom key press in orthographic mode.
    pub zoom_step: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mesh_file: PathBuf::from("data/mesh.csv"),
            average_shape: PathBuf::from("data/average_sh.csv"),
            average_color: PathBuf::from("data/average_tx.csv"),
            shape_weights: PathBuf::from("data/sh_ev.csv"),
            color_weights: PathBuf::from("data/tx_ev.csv"),
            shape_prefix: "data/sh_".to_string(),
            color_prefix: "data/tx_".to_string(),
            file_suffix: ".csv".to_string(),
            lighting: [255, 225, 200],
            point_light: [0.0, 0.0, -300.0],
            diffuse: 1.0,
            rotation_step: 0.1,
            screen_fit_factor: 0.9,
            perspective_focal: -400.0,
            focal_step: 100.0,
            zoom_step: 0.1,
        }
    }
}

impl Settings {
    /// Read a settings file. Unlike asset files, a missing settings file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        let settings: Settings =
            ron::from_str(text).map_err(|e| MorphError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !(self.screen_fit_factor > 0.0) {
            return Err(MorphError::Config(
                "screen_fit_factor must be positive".to_string(),
            ));
        }
        if self.perspective_focal == 0.0 {
            return Err(MorphError::Config(
                "perspective_focal must be non-zero".to_string(),
            ));
        }
        if !(self.zoom_step > 0.0 && self.zoom_step < 1.0) {
            return Err(MorphError::Config(
                "zoom_step must lie strictly between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Shape and color files of an identity.
    pub fn identity_files(&self, identity: &str) -> (PathBuf, PathBuf) {
        (
            PathBuf::from(format!("{}{}{}", self.shape_prefix, identity, self.file_suffix)),
            PathBuf::from(format!("{}{}{}", self.color_prefix, identity, self.file_suffix)),
        )
    }

    /// Identities are numbered from 1; weight tables from 0.
    pub fn weight_index(identity: &str) -> Result<usize> {
        let number: usize = identity
            .trim()
            .parse()
            .map_err(|_| MorphError::Config(format!("identity {:?} is not a number", identity)))?;
        number
            .checked_sub(1)
            .ok_or_else(|| MorphError::Config("identities start at 1".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let s = Settings::from_ron("(diffuse: 0.5, lighting: (10, 20, 30))").unwrap();
        assert_eq!(s.diffuse, 0.5);
        assert_eq!(s.lighting, [10, 20, 30]);
        assert_eq!(s.rotation_step, Settings::default().rotation_step);
    }

    #[test]
    fn test_example_settings_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../settings.ron");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            Settings::from_ron("(zoom_step: 2.0)"),
            Err(MorphError::Config(_))
        ));
        assert!(Settings::from_ron("(diffuse: \"bright\")").is_err());
    }

    #[test]
    fn test_identity_files() {
        let s = Settings::default();
        let (shape, color) = s.identity_files("001");
        assert_eq!(shape, PathBuf::from("data/sh_001.csv"));
        assert_eq!(color, PathBuf::from("data/tx_001.csv"));
    }

    #[test]
    fn test_weight_index() {
        assert_eq!(Settings::weight_index("001").unwrap(), 0);
        assert_eq!(Settings::weight_index("042").unwrap(), 41);
        assert!(Settings::weight_index("000").is_err());
        assert!(Settings::weight_index("abc").is_err());
    }
}
