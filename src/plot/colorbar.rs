//! Colorbar parameters and normalization
//!
//! Colorbar settings are layered: configured defaults, then per-routine
//! defaults, then global options (only the ones that are set), then the
//! per-call parameters. When data is supplied the missing limits are taken
//! from its finite values and a normalization is built.

use palette::{IntoColor, LinSrgb, Mix, Oklab, Srgb};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::style::palettes::{color_to_hex, get_colormap};
use crate::{Result, SciplotError};

/// Number of colors a named colormap is resampled to
pub const COLORMAP_SIZE: usize = 32;

/// Resolved colorbar settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorbarParams {
    /// Colormap name
    pub cmap: String,
    /// Logarithmic color scale; limits are then given in decades
    pub log: bool,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    /// Single flat color replacing the colormap
    pub color: Option<String>,
    /// Whether the data is drawn at all
    pub show: bool,
    /// Whether the colorbar legend is drawn
    pub cbar: bool,
}

impl Default for ColorbarParams {
    fn default() -> Self {
        Self {
            cmap: "viridis".to_string(),
            log: false,
            vmin: None,
            vmax: None,
            color: None,
            show: true,
            cbar: true,
        }
    }
}

/// Partial colorbar settings; unset fields leave the current value alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorbarOverrides {
    pub cmap: Option<String>,
    pub log: Option<bool>,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub color: Option<String>,
    pub show: Option<bool>,
    pub cbar: Option<bool>,
}

impl From<bool> for ColorbarOverrides {
    /// A bare boolean toggles `show`
    fn from(show: bool) -> Self {
        Self {
            show: Some(show),
            ..Default::default()
        }
    }
}

impl ColorbarOverrides {
    fn apply(&self, params: &mut ColorbarParams) {
        if let Some(cmap) = &self.cmap {
            params.cmap = cmap.clone();
        }
        if let Some(log) = self.log {
            params.log = log;
        }
        if self.vmin.is_some() {
            params.vmin = self.vmin;
        }
        if self.vmax.is_some() {
            params.vmax = self.vmax;
        }
        if self.color.is_some() {
            params.color = self.color.clone();
        }
        if let Some(show) = self.show {
            params.show = show;
        }
        if let Some(cbar) = self.cbar {
            params.cbar = cbar;
        }
    }
}

/// Mapping from data values to the colormap range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Norm {
    Linear { vmin: f64, vmax: f64 },
    Log { vmin: f64, vmax: f64 },
}

impl Norm {
    /// Domain in data units
    pub fn domain(&self) -> [f64; 2] {
        match *self {
            Norm::Linear { vmin, vmax } | Norm::Log { vmin, vmax } => [vmin, vmax],
        }
    }
}

/// A named list of color stops
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Colormap {
    pub name: String,
    pub colors: Vec<String>,
}

impl Colormap {
    /// A single color spread over the whole range
    pub fn flat(color: &str) -> Result<Self> {
        let hex = color_to_hex(color)?;
        Ok(Self {
            name: "flat".to_string(),
            colors: vec![hex.clone(), hex],
        })
    }

    /// Look up a named colormap and resample its stops to `size` colors
    ///
    /// Stops are mixed in Oklab, so the linear interpolation the renderer
    /// does between neighbouring colors stays perceptually even.
    pub fn named(name: &str, size: usize) -> Result<Self> {
        let stops = get_colormap(name)
            .ok_or_else(|| SciplotError::StyleError(format!("Unknown colormap '{}'", name)))?
            .into_iter()
            .map(|stop| -> Result<Oklab<f32>> {
                let rgb = parse_stop(stop)?;
                Ok(rgb.into_linear::<f32>().into_color())
            })
            .collect::<Result<Vec<_>>>()?;

        let colors = match stops.as_slice() {
            [] => Vec::new(),
            [only] => vec![oklab_to_hex(*only); size],
            _ if size == 1 => vec![oklab_to_hex(stops[0])],
            _ => {
                let segments = stops.len() - 1;
                (0..size)
                    .map(|i| {
                        let t = i as f32 / (size - 1) as f32 * segments as f32;
                        let segment = (t.floor() as usize).min(segments - 1);
                        oklab_to_hex(stops[segment].mix(stops[segment + 1], t - segment as f32))
                    })
                    .collect()
            }
        };
        Ok(Self {
            name: name.to_string(),
            colors,
        })
    }
}

fn parse_stop(stop: &str) -> Result<Srgb<f32>> {
    let c = csscolorparser::parse(stop)
        .map_err(|e| SciplotError::StyleError(format!("Invalid color '{}': {}", stop, e)))?;
    Ok(Srgb::new(c.r, c.g, c.b))
}

fn oklab_to_hex(lab: Oklab<f32>) -> String {
    let linear: LinSrgb<f32> = lab.into_color();
    let rgb = Srgb::<f32>::from_linear(linear);
    csscolorparser::Color::new(
        rgb.red.clamp(0.0, 1.0),
        rgb.green.clamp(0.0, 1.0),
        rgb.blue.clamp(0.0, 1.0),
        1.0,
    )
    .to_css_hex()
}

/// Output of `parse_params`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedColorbar {
    pub params: ColorbarParams,
    pub norm: Option<Norm>,
    pub colormap: Colormap,
}

/// Inputs to `parse_params`
#[derive(Debug, Clone, Default)]
pub struct ColorbarRequest<'a> {
    /// Per-call parameters
    pub params: Option<&'a ColorbarOverrides>,
    /// Routine defaults
    pub defaults: Option<&'a ColorbarOverrides>,
    /// Global options
    pub globs: Option<&'a ColorbarOverrides>,
    /// Values to derive the limits from
    pub values: Option<&'a [f64]>,
    /// Lower bound the limits must include
    pub min_val: Option<f64>,
    /// Upper bound the limits must include
    pub max_val: Option<f64>,
}

/// Build colorbar settings from the configured base and the layered overrides
pub fn parse_params(base: &ColorbarParams, request: &ColorbarRequest<'_>) -> Result<ParsedColorbar> {
    let mut parsed = base.clone();
    for layer in [request.defaults, request.globs, request.params]
        .into_iter()
        .flatten()
    {
        layer.apply(&mut parsed);
    }

    let mut norm = None;
    if let Some(values) = request.values {
        find_min_max(values, &mut parsed);
        if let (Some(mut vmin), Some(mut vmax)) = (parsed.vmin, parsed.vmax) {
            if let Some(min_val) = request.min_val {
                vmin = vmin.min(min_val);
            }
            if let Some(max_val) = request.max_val {
                vmax = vmax.max(max_val);
            }
            parsed.vmin = Some(vmin);
            parsed.vmax = Some(vmax);
            norm = Some(if parsed.log {
                Norm::Log {
                    vmin: 10f64.powf(vmin),
                    vmax: 10f64.powf(vmax),
                }
            } else {
                Norm::Linear { vmin, vmax }
            });
        }
    }

    let colormap = match &parsed.color {
        Some(color) => Colormap::flat(color)?,
        None => Colormap::named(&parsed.cmap, COLORMAP_SIZE)?,
    };

    Ok(ParsedColorbar {
        params: parsed,
        norm,
        colormap,
    })
}

/// Fill unset limits from the finite values (decades of the positive values in log mode)
fn find_min_max(values: &[f64], params: &mut ColorbarParams) {
    if params.vmin.is_some() && params.vmax.is_some() {
        return;
    }
    let valid: Vec<f64> = if params.log {
        values
            .iter()
            .filter(|v| **v > 0.0 && v.is_finite())
            .map(|v| v.log10())
            .collect()
    } else {
        values.iter().copied().filter(|v| v.is_finite()).collect()
    };

    if valid.is_empty() {
        warn!("No finite values to derive colorbar limits from, using [0, 1]");
    }
    let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
    let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if params.vmin.is_none() {
        params.vmin = Some(if min.is_finite() { min } else { 0.0 });
    }
    if params.vmax.is_none() {
        params.vmax = Some(if max.is_finite() { max } else { 1.0 });
    }
}
