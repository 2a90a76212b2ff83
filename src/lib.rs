/*!
# sciplot - plotting for labeled multi-dimensional arrays

sciplot takes labeled array data (variables, data arrays and datasets with
named dimensions, coordinates, units, variances and masks), groups it into
plottable series, resolves per-series styles and dispatches every group to
the routine matching its dimensionality.

## Example

```rust,ignore
use sciplot::{plot, PlotOptions};

let input: serde_json::Value = serde_json::from_str(json_text)?;
let figures = plot(&input, &PlotOptions::default())?;
for (key, figure) in figures.iter() {
    println!("{}: {}", key, figure);
}
```

## Core Components

- [`model`] - Variables, data arrays, datasets and input classification
- [`plot`] - Grouping, style resolution, colorbars and dispatch
- [`writer`] - Figure output backends (Vega-Lite)
*/

pub mod model;
pub mod plot;
pub mod writer;

pub use model::{DataArray, Dataset, EventList, Inventory, Mask, Variable};
pub use plot::{
    dispatch, Axes, BinSpec, ColorbarOverrides, Group, LineParam, PlotConfig, PlotOptions,
    Projection, SciPlot,
};

#[cfg(feature = "vegalite")]
pub use plot::plot;

#[cfg(feature = "vegalite")]
pub use writer::VegaLiteWriter;

pub use writer::Writer;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum SciplotError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid number of dimensions for plotting: {0}")]
    InvalidDimensions(usize),

    #[error("Wrong projection type. Expected either '1d', '2d' or '3d', got {0}.")]
    InvalidProjection(String),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),

    #[error("Style error: {0}")]
    StyleError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output generation error: {0}")]
    WriterError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SciplotError>;
