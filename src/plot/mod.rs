//! Grouping, styling and dispatch of labeled array data
//!
//! # Architecture
//!
//! - `orchestrate` - Groups inventory entries into figures and resolves series styles
//! - `dispatch` - Routes a group to the 1D, 2D or 3D writer routine
//! - `events` - Histograms event data before dispatch
//! - `colorbar` - Layered colorbar parameters and normalization
//! - `config` - Default styles and figure geometry
//! - `style` - Palettes, markers and per-series line parameters
//! - `tools` - Bin edges, labels and number formatting

pub mod colorbar;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod orchestrate;
pub mod style;
pub mod tools;

pub use colorbar::{ColorbarOverrides, ColorbarParams};
pub use config::{Aspect, PlotConfig};
pub use dispatch::{dispatch, Projection};
pub use events::BinSpec;
pub use orchestrate::{group_inventory, plot_inventory, Axes, Group, PlotOptions, SciPlot};
pub use style::{LineParam, LineParams, SeriesStyle};

#[cfg(feature = "vegalite")]
pub use orchestrate::plot;
