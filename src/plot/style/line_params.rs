//! Per-series line parameter resolution
//!
//! Every 1D series gets a color, marker, line style and line width. Each can be
//! left to the round-robin defaults, fixed for all series, given as a list
//! indexed by the series counter, given per series name, or pinned to a
//! default index.

use serde::Serialize;
use std::collections::HashMap;

use super::markers::{linestyle_to_dash, marker_to_shape};
use super::palettes::color_to_hex;
use crate::plot::config::PlotConfig;
use crate::plot::tools::get_line_param;
use crate::{Result, SciplotError};

/// A user override for one line parameter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LineParam<T> {
    /// Round-robin default at the current series counter
    #[default]
    Default,
    /// Same value for every series
    Fixed(T),
    /// Indexed by the series counter; negative counters index from the end
    List(Vec<T>),
    /// Keyed by series name; missing names fall back to the default
    PerName(HashMap<String, T>),
    /// Default value at a fixed index
    Index(i64),
}

impl<T: Clone> LineParam<T> {
    /// Resolve the value for series `name` at series counter `line_count`
    pub fn resolve(&self, param: &str, name: &str, line_count: i64, defaults: &[T]) -> Result<T> {
        match self {
            LineParam::Default => get_line_param(param, defaults, line_count),
            LineParam::Fixed(value) => Ok(value.clone()),
            LineParam::List(values) => list_item(param, values, line_count),
            LineParam::PerName(map) => match map.get(name) {
                Some(value) => Ok(value.clone()),
                None => get_line_param(param, defaults, line_count),
            },
            LineParam::Index(index) => get_line_param(param, defaults, *index),
        }
    }
}

fn list_item<T: Clone>(param: &str, values: &[T], index: i64) -> Result<T> {
    let len = values.len() as i64;
    let position = if index < 0 { len + index } else { index };
    if position < 0 || position >= len {
        return Err(SciplotError::StyleError(format!(
            "{} list has {} entries, no entry for series {}",
            param, len, index
        )));
    }
    Ok(values[position as usize].clone())
}

/// Overrides for all four line parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineParams {
    pub color: LineParam<String>,
    pub marker: LineParam<String>,
    pub linestyle: LineParam<String>,
    pub linewidth: LineParam<f64>,
}

/// Fully resolved style of one series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStyle {
    /// `#rrggbb`
    pub color: String,
    /// Marker code
    pub marker: String,
    /// Line style code
    pub linestyle: String,
    /// Width in points
    pub linewidth: f64,
}

impl LineParams {
    /// Resolve and normalize the style of series `name`
    pub fn resolve(&self, name: &str, line_count: i64, config: &PlotConfig) -> Result<SeriesStyle> {
        let color = self.color.resolve("color", name, line_count, &config.color)?;
        let marker = self.marker.resolve("marker", name, line_count, &config.marker)?;
        let linestyle = self
            .linestyle
            .resolve("linestyle", name, line_count, &config.linestyle)?;
        let linewidth = self
            .linewidth
            .resolve("linewidth", name, line_count, &config.linewidth)?;

        marker_to_shape(&marker)?;
        linestyle_to_dash(&linestyle)?;
        if !linewidth.is_finite() || linewidth < 0.0 {
            return Err(SciplotError::StyleError(format!(
                "Invalid line width {} for '{}'",
                linewidth, name
            )));
        }

        Ok(SeriesStyle {
            color: color_to_hex(&color)?,
            marker,
            linestyle,
            linewidth,
        })
    }
}
