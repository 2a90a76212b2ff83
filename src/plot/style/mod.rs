//! Styling: palettes, markers and per-series line parameters

pub mod line_params;
pub mod markers;
pub mod palettes;

pub use line_params::{LineParam, LineParams, SeriesStyle};
