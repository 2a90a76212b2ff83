//! Routing of plot groups to the 1D, 2D or 3D figure routines

use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

use super::events::{histogram_events, BinSpec};
use super::orchestrate::{Group, PlotOptions};
use crate::model::DataArray;
use crate::writer::{FigureRequest, Writer};
use crate::{Result, SciplotError};

/// Figure projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    OneD,
    TwoD,
    ThreeD,
}

impl Projection {
    /// Projection used when none is requested: 1D and 2D data map to
    /// themselves, anything higher is shown as 2D slices
    pub fn default_for(ndim: usize) -> Self {
        match ndim {
            1 => Projection::OneD,
            _ => Projection::TwoD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Projection::OneD => "1d",
            Projection::TwoD => "2d",
            Projection::ThreeD => "3d",
        }
    }
}

impl FromStr for Projection {
    type Err = SciplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "1d" => Ok(Projection::OneD),
            "2d" => Ok(Projection::TwoD),
            "3d" => Ok(Projection::ThreeD),
            _ => Err(SciplotError::InvalidProjection(s.to_string())),
        }
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Histogram every event-holding array of a group along the requested bins
pub fn apply_bins(
    data_arrays: &BTreeMap<String, DataArray>,
    bins: &BTreeMap<String, BinSpec>,
) -> Result<BTreeMap<String, DataArray>> {
    if bins.len() > 1 {
        return Err(SciplotError::InvalidInput(format!(
            "Event data can be histogrammed along one dimension, got bins for {}",
            bins.keys().cloned().collect::<Vec<_>>().join(", ")
        )));
    }
    let mut binned = BTreeMap::new();
    for (name, da) in data_arrays {
        let mut da = da.clone();
        if da.has_events() {
            for (dim, spec) in bins {
                da = histogram_events(&da, dim, spec)?;
            }
        }
        binned.insert(name.clone(), da);
    }
    Ok(binned)
}

/// Send one group to the writer routine matching its projection
pub fn dispatch<W: Writer>(group: &Group, options: &PlotOptions, writer: &W) -> Result<W::Output> {
    if group.ndims < 1 {
        return Err(SciplotError::InvalidDimensions(group.ndims));
    }

    let data_arrays = match &options.bins {
        Some(bins) => apply_bins(&group.data_arrays, bins)?,
        None => group.data_arrays.clone(),
    };

    let projection = match &options.projection {
        Some(p) => p.parse::<Projection>()?,
        None => Projection::default_for(group.ndims),
    };
    debug!(
        "Dispatching group '{}' ({} arrays, {} dims) as {}",
        group.key,
        data_arrays.len(),
        group.ndims,
        projection
    );

    let request = FigureRequest {
        key: &group.key,
        data_arrays: &data_arrays,
        styles: &group.styles,
        axes: group.axes.as_ref(),
        options,
    };
    match projection {
        Projection::OneD => writer.write_1d(&request),
        Projection::TwoD => writer.write_2d(&request),
        Projection::ThreeD => writer.write_3d(&request),
    }
}
