//! Figure output backends
//!
//! A writer turns one plot group into a figure. Dispatch picks the routine
//! by projection; every routine receives the same request.
//!
//! # Example
//!
//! ```rust,ignore
//! use sciplot::writer::{Writer, VegaLiteWriter};
//!
//! let writer = VegaLiteWriter::new();
//! let figure = writer.write_1d(&request)?;
//! ```

use std::collections::BTreeMap;

use crate::model::DataArray;
use crate::plot::{Axes, PlotOptions, SeriesStyle};
use crate::Result;

#[cfg(feature = "vegalite")]
mod vegalite;

#[cfg(feature = "vegalite")]
pub use vegalite::VegaLiteWriter;

/// Everything a figure routine needs to draw one group
#[derive(Debug, Clone, Copy)]
pub struct FigureRequest<'a> {
    /// Group key, used as the default figure title
    pub key: &'a str,
    /// Series to draw, keyed by name
    pub data_arrays: &'a BTreeMap<String, DataArray>,
    /// Resolved style per series name
    pub styles: &'a BTreeMap<String, SeriesStyle>,
    /// Requested axes
    pub axes: Option<&'a Axes>,
    pub options: &'a PlotOptions,
}

/// A figure backend
pub trait Writer {
    /// Figure type produced by the backend
    type Output;

    /// Line plot of 1D series
    fn write_1d(&self, request: &FigureRequest<'_>) -> Result<Self::Output>;

    /// Image plot of 2D data
    fn write_2d(&self, request: &FigureRequest<'_>) -> Result<Self::Output>;

    /// Three-dimensional scatter of N-D data
    fn write_3d(&self, request: &FigureRequest<'_>) -> Result<Self::Output>;
}
