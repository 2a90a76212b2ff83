//! Coordinates, slicing and encoding channels for the Vega-Lite writer
//!
//! Data arrays are reduced to the dimensionality of the figure by slicing
//! extra leading dimensions, then every plotted dimension is paired with a
//! one-dimensional coordinate from which the channel values are taken.

use serde_json::{json, Value};
use tracing::warn;

use crate::model::{DataArray, Variable};
use crate::plot::tools::{centers_to_edges, edges_to_centers, make_fake_coord, value_to_string};
use crate::plot::Axes;
use crate::{Result, SciplotError};

/// Field naming the series (or panel) a row belongs to
pub(super) const SOURCE_FIELD: &str = "__sciplot_source__";

/// Slice leading dimensions at index 0 until `keep` dimensions remain
///
/// Returns the reduced array and one `dim = value` note per sliced dimension.
pub(super) fn reduce_dims(da: &DataArray, keep: usize) -> Result<(DataArray, Vec<String>)> {
    let mut current = da.clone();
    let mut notes = Vec::new();
    while current.data.ndim() > keep {
        let dim = current.data.dims[0].clone();
        let (sliced, selected) = current.slice(&dim, 0)?;
        notes.push(match selected {
            Some(value) => format!("{} = {}", dim, value_to_string(value, 3)),
            None => format!("{}[0]", dim),
        });
        current = sliced;
    }
    if !notes.is_empty() {
        warn!(
            "Showing a slice of '{}' at {}",
            da.name,
            notes.join(", ")
        );
    }
    Ok((current, notes))
}

/// A plotted dimension with the coordinate providing its positions
#[derive(Debug, Clone)]
pub(super) struct AxisCoord {
    /// Display name: the requested axis or the dimension
    pub name: String,
    pub coord: Variable,
    /// Size of the data dimension
    pub size: usize,
}

impl AxisCoord {
    /// Resolve the coordinate of `dim`
    ///
    /// A requested axis must name a one-dimensional coordinate along `dim`.
    /// Without one the dimension coordinate is used, or integer positions
    /// when the dimension has none.
    pub fn resolve(da: &DataArray, dim: &str, axes: Option<&Axes>) -> Result<Self> {
        let size = da.data.dim_size(dim).ok_or_else(|| {
            SciplotError::InvalidInput(format!("'{}' has no dimension '{}'", da.name, dim))
        })?;
        let requested = axes.and_then(|a| a.for_dim(da.dims(), dim));

        if let Some(label) = requested {
            let coord = da
                .coords
                .get(&label)
                .filter(|c| c.ndim() == 1 && c.dims[0] == dim)
                .ok_or_else(|| {
                    SciplotError::InvalidInput(format!(
                        "'{}' has no coordinate '{}' along dimension '{}'",
                        da.name, label, dim
                    ))
                })?;
            return Ok(Self {
                name: label,
                coord: coord.clone(),
                size,
            });
        }

        let coord = match da.coord(dim) {
            Some(c) if c.ndim() == 1 => c.clone(),
            _ => make_fake_coord(dim, size, None),
        };
        Ok(Self {
            name: dim.to_string(),
            coord,
            size,
        })
    }

    /// Whether the coordinate holds bin edges
    pub fn is_edges(&self) -> bool {
        self.coord.values.len() == self.size + 1
    }

    /// Bin edges, widening centers when needed
    pub fn edges(&self) -> Result<Vec<f64>> {
        if self.is_edges() {
            Ok(self.coord.values.clone())
        } else {
            centers_to_edges(&self.coord.values)
        }
    }

    /// Bin centers, one per data element
    pub fn centers(&self) -> Vec<f64> {
        if self.is_edges() {
            edges_to_centers(&self.coord.values)
        } else {
            self.coord.values.clone()
        }
    }

    pub fn title(&self) -> String {
        crate::plot::tools::name_with_unit(Some(&self.coord), Some(&self.name), false)
    }
}

/// Positional channel of a quantitative field
pub(super) fn position_channel(field: &str, title: Option<&str>, log: bool) -> Value {
    let mut channel = json!({
        "field": field,
        "type": "quantitative",
    });
    match title {
        Some(title) => channel["title"] = json!(title),
        None => channel["title"] = Value::Null,
    }
    let mut scale = json!({"zero": false});
    if log {
        scale["type"] = json!("log");
    }
    channel["scale"] = scale;
    channel
}

/// Filter selecting the rows of one source
pub(super) fn source_filter(source: &str) -> Value {
    json!({"filter": {"field": SOURCE_FIELD, "equal": source}})
}

/// Filter selecting the masked rows of one source
pub(super) fn masked_filter(source: &str) -> Value {
    json!({"filter": {"and": [
        {"field": SOURCE_FIELD, "equal": source},
        {"field": "masked", "equal": true}
    ]}})
}
