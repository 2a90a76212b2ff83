//! Labeled array data model
//!
//! This module contains the types that describe plottable input: variables
//! (dims, shape, values, variances, unit), data arrays (a data variable plus
//! coordinates, masks and attributes) and datasets (named data arrays).
//!
//! # Architecture
//!
//! - `variable` - `Variable` and `Mask`, flattened row-major storage
//! - `data_array` - `DataArray`, `Dataset` and `EventList`
//! - `inventory` - classification of an input document into named data arrays

mod data_array;
mod inventory;
mod variable;

pub use data_array::{DataArray, Dataset, EventList};
pub use inventory::Inventory;
pub use variable::{Mask, Variable};
