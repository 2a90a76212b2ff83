//! Plot configuration
//!
//! `PlotConfig::default()` holds the built-in defaults: the round-robin line
//! colors, markers, line widths and line styles, the colorbar parameters and
//! the figure geometry. A partial TOML document can override any of them.
//! Entries of `color` naming a categorical palette (`"tableau10"`) expand to
//! the palette's colors.
//!
//! ```toml
//! width = 1000
//! color = ["#000000", "#ff0000"]
//!
//! [params]
//! cmap = "magma"
//! log = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::colorbar::ColorbarParams;
use super::style::{markers, palettes};
use crate::{Result, SciplotError};

/// Image aspect handling for 2D figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    /// Stretch the image to the figure size
    #[default]
    Auto,
    /// Keep data units square
    Equal,
}

/// Default styling and geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Default line colors, used round-robin
    pub color: Vec<String>,
    /// Default markers (matplotlib codes), used round-robin
    pub marker: Vec<String>,
    /// Default line widths in points
    pub linewidth: Vec<f64>,
    /// Default line styles for non-histogram 1D data
    pub linestyle: Vec<String>,
    /// Colorbar defaults
    pub params: ColorbarParams,
    /// Image height in pixels
    pub height: u32,
    /// Image width in pixels
    pub width: u32,
    /// Resolution
    pub dpi: u32,
    pub aspect: Aspect,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            color: palettes::CATEGORY10.iter().map(|c| c.to_string()).collect(),
            marker: markers::MARKERS.iter().map(|m| m.to_string()).collect(),
            linewidth: vec![1.5],
            linestyle: vec!["none".to_string()],
            params: ColorbarParams::default(),
            height: 533,
            width: 800,
            dpi: 96,
            aspect: Aspect::Auto,
        }
    }
}

impl PlotConfig {
    /// Parse a (partial) TOML document on top of the defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: PlotConfig = toml_edit::de::from_str(text)
            .map_err(|e| SciplotError::ConfigError(format!("Invalid config: {}", e)))?;
        config.expand_palettes();
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SciplotError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    fn expand_palettes(&mut self) {
        let mut colors = Vec::with_capacity(self.color.len());
        for color in &self.color {
            match palettes::get_color_palette(color) {
                Some(palette) => colors.extend(palette.iter().map(|c| c.to_string())),
                None => colors.push(color.clone()),
            }
        }
        self.color = colors;
    }

    /// Check that every round-robin list is usable
    pub fn validate(&self) -> Result<()> {
        for (name, len) in [
            ("color", self.color.len()),
            ("marker", self.marker.len()),
            ("linewidth", self.linewidth.len()),
            ("linestyle", self.linestyle.len()),
        ] {
            if len == 0 {
                return Err(SciplotError::ConfigError(format!(
                    "Config list '{}' must not be empty",
                    name
                )));
            }
        }
        for color in &self.color {
            palettes::color_to_hex(color)?;
        }
        for marker in &self.marker {
            markers::marker_to_shape(marker)?;
        }
        for style in &self.linestyle {
            markers::linestyle_to_dash(style)?;
        }
        if self.linewidth.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SciplotError::ConfigError(
                "Line widths must be finite and non-negative".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 || self.dpi == 0 {
            return Err(SciplotError::ConfigError(
                "Figure width, height and dpi must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PlotConfig::default();
        assert_eq!(config.color.len(), 10);
        assert_eq!(config.color[0], "#1f77b4");
        assert_eq!(config.marker.len(), 21);
        assert_eq!(config.marker[0], "o");
        assert_eq!(config.linewidth, vec![1.5]);
        assert_eq!(config.linestyle, vec!["none"]);
        assert_eq!((config.width, config.height, config.dpi), (800, 533, 96));
        assert_eq!(config.aspect, Aspect::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = PlotConfig::from_toml_str(
            r##"
width = 1000
aspect = "equal"
color = ["#000000", "red"]

[params]
cmap = "magma"
log = true
"##,
        )
        .unwrap();
        assert_eq!(config.width, 1000);
        assert_eq!(config.height, 533);
        assert_eq!(config.aspect, Aspect::Equal);
        assert_eq!(config.color, vec!["#000000", "red"]);
        assert_eq!(config.params.cmap, "magma");
        assert!(config.params.log);
        assert!(config.params.show);
    }

    #[test]
    fn test_palette_names_expand() {
        let config = PlotConfig::from_toml_str(r#"color = ["dark2", "black"]"#).unwrap();
        assert_eq!(config.color.len(), 9);
        assert_eq!(config.color[0], "#1b9e77");
        assert_eq!(config.color[8], "black");
    }

    #[test]
    fn test_rejects_empty_list() {
        let err = PlotConfig::from_toml_str("marker = []").unwrap_err();
        assert!(err.to_string().contains("marker"));
    }

    #[test]
    fn test_rejects_invalid_color() {
        assert!(PlotConfig::from_toml_str(r#"color = ["notacolor"]"#).is_err());
    }

    #[test]
    fn test_rejects_unknown_marker() {
        assert!(PlotConfig::from_toml_str(r#"marker = ["?"]"#).is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = PlotConfig::from_toml_str("width = ").unwrap_err();
        assert!(matches!(err, SciplotError::ConfigError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dpi = 72").unwrap();
        let config = PlotConfig::from_file(file.path()).unwrap();
        assert_eq!(config.dpi, 72);
    }

    #[test]
    fn test_from_missing_file() {
        let err = PlotConfig::from_file("/nonexistent/sciplot.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
