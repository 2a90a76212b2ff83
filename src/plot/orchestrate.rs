//! The plot entry point
//!
//! Inventory entries are grouped into figures: 1D series that share their
//! dimension labels (or requested axes) and unit are drawn together, every
//! other entry gets a figure of its own. Each 1D series advances a line
//! counter that drives the round-robin styles.

use serde::Serialize;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::debug;

use super::colorbar::ColorbarOverrides;
use super::config::PlotConfig;
use super::dispatch::dispatch;
use super::events::BinSpec;
use super::style::{LineParams, SeriesStyle};
use crate::model::{DataArray, Inventory};
use crate::writer::Writer;
use crate::{Result, SciplotError};

/// Requested axes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Axes {
    /// Coordinate names, innermost (x) last
    List(Vec<String>),
    /// Coordinate name per data dimension
    ByDim(BTreeMap<String, String>),
}

impl Axes {
    /// Coordinate requested for `dim`, if any
    ///
    /// A list names the axes from the outside in, so its last entry belongs to
    /// the innermost of `dims`.
    pub fn for_dim(&self, dims: &[String], dim: &str) -> Option<String> {
        match self {
            Axes::ByDim(map) => map.get(dim).cloned(),
            Axes::List(names) => {
                let pos = dims.iter().position(|d| d == dim)?;
                let from_end = dims.len() - pos;
                names
                    .len()
                    .checked_sub(from_end)
                    .map(|idx| names[idx].clone())
            }
        }
    }
}

/// Options of a plot call
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// `"1d"`, `"2d"` or `"3d"`; defaults by dimensionality
    pub projection: Option<String>,
    pub axes: Option<Axes>,
    /// Color, marker, line style and line width overrides
    pub line: LineParams,
    /// Histogramming of event data, dimension to binning
    pub bins: Option<BTreeMap<String, BinSpec>>,
    pub logx: bool,
    pub logy: bool,
    pub logxy: bool,
    /// Draw variances as error bars
    pub errorbars: bool,
    pub title: Option<String>,
    /// Global colorbar settings
    pub colorbar: ColorbarOverrides,
    pub config: PlotConfig,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            projection: None,
            axes: None,
            line: LineParams::default(),
            bins: None,
            logx: false,
            logy: false,
            logxy: false,
            errorbars: true,
            title: None,
            colorbar: ColorbarOverrides::default(),
            config: PlotConfig::default(),
        }
    }
}

impl PlotOptions {
    pub fn log_x(&self) -> bool {
        self.logx || self.logxy
    }

    pub fn log_y(&self) -> bool {
        self.logy || self.logxy
    }

    fn is_1d_projection(&self) -> bool {
        self.projection
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case("1d"))
    }
}

/// Data arrays that end up in the same figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub key: String,
    pub ndims: usize,
    #[serde(skip)]
    pub data_arrays: BTreeMap<String, DataArray>,
    /// Resolved style per series name
    pub styles: BTreeMap<String, SeriesStyle>,
    pub axes: Option<Axes>,
}

impl Group {
    pub fn names(&self) -> Vec<&str> {
        self.data_arrays.keys().map(|k| k.as_str()).collect()
    }
}

/// Figures keyed by group, in the order the groups were formed
#[derive(Debug, Clone, PartialEq)]
pub struct SciPlot<T = serde_json::Value> {
    figures: IndexMap<String, T>,
}

impl<T> Default for SciPlot<T> {
    fn default() -> Self {
        Self {
            figures: IndexMap::new(),
        }
    }
}

impl<T> SciPlot<T> {
    /// Insert a figure; an existing key keeps its position
    pub fn insert(&mut self, key: String, figure: T) {
        self.figures.insert(key, figure);
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.figures.get(key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.figures.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.figures.iter().map(|(k, f)| (k.as_str(), f))
    }
}

impl<T> IntoIterator for SciPlot<T> {
    type Item = (String, T);
    type IntoIter = indexmap::map::IntoIter<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.figures.into_iter()
    }
}

impl<T: Serialize> SciPlot<T> {
    /// All figures as one JSON object keyed by group
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let mut map = serde_json::Map::new();
        for (key, figure) in &self.figures {
            map.insert(key.clone(), serde_json::to_value(figure)?);
        }
        Ok(serde_json::Value::Object(map))
    }
}

/// Group the inventory and resolve the style of every series
pub fn group_inventory(inventory: &Inventory, options: &PlotOptions) -> Result<Vec<Group>> {
    let mut groups: IndexMap<String, Group> = IndexMap::new();
    let mut line_count: i64 = -1;

    for (name, da) in inventory.iter() {
        if da.has_events() && options.bins.is_none() {
            return Err(SciplotError::InvalidInput(format!(
                "The `bins` argument must be specified when plotting event data ('{}')",
                name
            )));
        }

        let mut ndims = da.data.ndim();
        if options.bins.is_some() && da.has_events() {
            ndims += 1;
        }
        if ndims == 0 {
            debug!("Skipping 0-D entry '{}'", name);
            continue;
        }

        let mut axes = options.axes.clone();
        let key = if ndims == 1 || options.is_1d_projection() {
            let base = match &options.axes {
                Some(Axes::ByDim(map)) => {
                    let dim = da.data.dims.first().ok_or_else(|| {
                        SciplotError::InvalidInput(format!("'{}' has no dimensions", name))
                    })?;
                    let label = map.get(dim).ok_or_else(|| {
                        SciplotError::InvalidInput(format!(
                            "No axis given for dimension '{}' of '{}'",
                            dim, name
                        ))
                    })?;
                    axes = Some(Axes::List(vec![label.clone()]));
                    label.clone()
                }
                Some(Axes::List(labels)) => labels.join("."),
                None => da.data.dims.join("."),
            };
            line_count += 1;
            format!("{}.{}", base, da.data.unit_str())
        } else {
            name.clone()
        };

        let style = options.line.resolve(name, line_count, &options.config)?;
        debug!(
            "Entry '{}' ({} dims) goes to group '{}' with color {}",
            name, ndims, key, style.color
        );

        let group = groups.entry(key.clone()).or_insert_with(|| Group {
            key,
            ndims,
            data_arrays: BTreeMap::new(),
            styles: BTreeMap::new(),
            axes,
        });
        group.data_arrays.insert(name.clone(), da.clone());
        group.styles.insert(name.clone(), style);
    }

    Ok(groups.into_values().collect())
}

/// Plot every group of an inventory with the given writer
pub fn plot_inventory<W: Writer>(
    inventory: &Inventory,
    options: &PlotOptions,
    writer: &W,
) -> Result<SciPlot<W::Output>> {
    let groups = group_inventory(inventory, options)?;
    let mut output = SciPlot::default();
    for group in &groups {
        output.insert(group.key.clone(), dispatch(group, options, writer)?);
    }
    Ok(output)
}

/// Plot a JSON document describing a variable, data array or dataset
#[cfg(feature = "vegalite")]
pub fn plot(input: &serde_json::Value, options: &PlotOptions) -> Result<SciPlot> {
    options.config.validate()?;
    let inventory = Inventory::classify(input)?;
    plot_inventory(&inventory, options, &crate::writer::VegaLiteWriter::new())
}
