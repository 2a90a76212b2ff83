//! Histogramming of event data
//!
//! A data array holding event lists is turned into a regular data array with
//! one extra dimension: the bins along the event coordinate.

use std::str::FromStr;
use tracing::debug;

use crate::model::{DataArray, Variable};
use crate::{Result, SciplotError};

/// Binning along one dimension
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec {
    /// Number of equal-width bins spanning the events
    Count(usize),
    /// Explicit, strictly increasing bin edges
    Edges(Vec<f64>),
}

impl FromStr for BinSpec {
    type Err = SciplotError;

    /// `"20"` is a bin count, `"0,1,5,10"` a list of edges
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.contains(',') {
            if let Ok(count) = s.parse::<usize>() {
                return Ok(BinSpec::Count(count));
            }
        }
        let edges = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    SciplotError::InvalidInput(format!("Invalid bin specification '{}'", s))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(BinSpec::Edges(edges))
    }
}

impl BinSpec {
    /// Concrete edges for the given event positions
    pub fn edges(&self, positions: impl Iterator<Item = f64>) -> Result<Vec<f64>> {
        match self {
            BinSpec::Count(0) => Err(SciplotError::InvalidInput(
                "Bin count must be at least 1".to_string(),
            )),
            BinSpec::Count(n) => {
                let (mut lo, mut hi) = positions
                    .filter(|x| x.is_finite())
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                        (lo.min(x), hi.max(x))
                    });
                if lo > hi {
                    return Err(SciplotError::InvalidInput(
                        "Cannot derive bin edges without finite events".to_string(),
                    ));
                }
                if lo == hi {
                    lo -= 0.5;
                    hi += 0.5;
                }
                let width = (hi - lo) / *n as f64;
                let mut edges: Vec<f64> = (0..*n).map(|i| lo + i as f64 * width).collect();
                edges.push(hi);
                Ok(edges)
            }
            BinSpec::Edges(edges) => {
                if edges.len() < 2 {
                    return Err(SciplotError::InvalidInput(
                        "At least two bin edges are required".to_string(),
                    ));
                }
                if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[0] >= w[1])
                {
                    return Err(SciplotError::InvalidInput(
                        "Bin edges must be finite and strictly increasing".to_string(),
                    ));
                }
                Ok(edges.clone())
            }
        }
    }
}

/// Index of the bin holding `x`; the last bin is closed on the right
fn find_bin(edges: &[f64], x: f64) -> Option<usize> {
    let last = edges.len() - 1;
    if !(x >= edges[0] && x <= edges[last]) {
        return None;
    }
    if x == edges[last] {
        return Some(last - 1);
    }
    Some(edges.partition_point(|e| *e <= x) - 1)
}

/// Histogram the events of `da` along `dim`
///
/// The result gains `dim` as its innermost dimension with the bin edges as
/// coordinate. Values are event counts (or summed weights), variances the
/// summed squared weights.
pub fn histogram_events(da: &DataArray, dim: &str, spec: &BinSpec) -> Result<DataArray> {
    let events = da.events.as_ref().ok_or_else(|| {
        SciplotError::InvalidInput(format!("'{}' holds no event data to histogram", da.name))
    })?;
    if da.data.dim_size(dim).is_some() {
        return Err(SciplotError::InvalidInput(format!(
            "'{}' already has a dimension '{}'",
            da.name, dim
        )));
    }

    let edges = spec.edges(events.coord.iter().flatten().copied())?;
    let nbins = edges.len() - 1;
    let mut values = vec![0.0; da.data.len() * nbins];
    let mut variances = vec![0.0; da.data.len() * nbins];

    for (element, positions) in events.coord.iter().enumerate() {
        let weights = events.weights.as_ref().map(|w| &w[element]);
        for (i, x) in positions.iter().enumerate() {
            if let Some(bin) = find_bin(&edges, *x) {
                let w = weights.map_or(1.0, |w| w[i]);
                values[element * nbins + bin] += w;
                variances[element * nbins + bin] += w * w;
            }
        }
    }
    debug!(
        "Histogrammed {} events of '{}' into {} bins along '{}'",
        events.total(),
        da.name,
        nbins,
        dim
    );

    let mut dims = da.data.dims.clone();
    let mut shape = da.data.shape.clone();
    dims.push(dim.to_string());
    shape.push(nbins);
    let unit = if events.weights.is_some() {
        da.data.unit.clone()
    } else {
        Some("counts".to_string())
    };
    let data = Variable {
        dims,
        shape,
        values,
        variances: Some(variances),
        unit,
        dtype: "float64".to_string(),
    };

    // An existing coordinate for the event dimension only contributes its unit
    let coord_unit = da.coords.get(dim).and_then(|c| c.unit.as_deref());
    let mut result = DataArray {
        name: da.name.clone(),
        data,
        coords: da.coords.clone(),
        masks: da.masks.clone(),
        attrs: da.attrs.clone(),
        events: None,
    };
    result
        .coords
        .insert(dim.to_string(), Variable::new_1d(dim, edges, coord_unit));
    result.validate()?;
    Ok(result)
}
