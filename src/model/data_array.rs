//! Data array, dataset and event list types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::variable::slice_flat;
use super::{Mask, Variable};
use crate::{Result, SciplotError};

/// Unbinned event data attached to a data array
///
/// Each element of the data array owns a list of events; `coord[i]` holds the
/// positions of the events of element `i` along the event dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventList {
    pub coord: Vec<Vec<f64>>,
    #[serde(default)]
    pub weights: Option<Vec<Vec<f64>>>,
}

impl EventList {
    /// Total number of events across all elements
    pub fn total(&self) -> usize {
        self.coord.iter().map(Vec::len).sum()
    }
}

/// A data variable with its coordinates, masks and attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataArray {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "unaligned")]
    pub data: Variable,
    #[serde(default)]
    pub coords: BTreeMap<String, Variable>,
    #[serde(default)]
    pub masks: BTreeMap<String, Mask>,
    #[serde(default)]
    pub attrs: BTreeMap<String, Variable>,
    #[serde(default)]
    pub events: Option<EventList>,
}

/// Named collection of data arrays
pub type Dataset = BTreeMap<String, DataArray>;

impl DataArray {
    /// Create a data array without coordinates
    pub fn new(name: impl Into<String>, data: Variable) -> Self {
        Self {
            name: name.into(),
            data,
            coords: BTreeMap::new(),
            masks: BTreeMap::new(),
            attrs: BTreeMap::new(),
            events: None,
        }
    }

    /// Builder: add a coordinate
    pub fn with_coord(mut self, name: impl Into<String>, coord: Variable) -> Self {
        self.coords.insert(name.into(), coord);
        self
    }

    /// Builder: add a mask
    pub fn with_mask(mut self, name: impl Into<String>, mask: Mask) -> Self {
        self.masks.insert(name.into(), mask);
        self
    }

    /// Builder: attach event lists
    pub fn with_events(mut self, events: EventList) -> Self {
        self.events = Some(events);
        self
    }

    pub fn dims(&self) -> &[String] {
        &self.data.dims
    }

    pub fn has_events(&self) -> bool {
        self.events.is_some()
    }

    /// Fill in omitted shapes and check structural consistency
    pub fn normalize(&mut self) -> Result<()> {
        self.data.infer_shape();
        for coord in self.coords.values_mut() {
            coord.infer_shape();
        }
        for attr in self.attrs.values_mut() {
            attr.infer_shape();
        }
        for mask in self.masks.values_mut() {
            mask.infer_shape(&self.data);
        }
        self.validate()
    }

    /// Check that coordinates, masks and events agree with the data
    pub fn validate(&self) -> Result<()> {
        self.data
            .validate()
            .map_err(|e| SciplotError::InvalidInput(format!("'{}': {}", self.name, e)))?;

        for (name, coord) in &self.coords {
            coord.validate().map_err(|e| {
                SciplotError::InvalidInput(format!("'{}' coord '{}': {}", self.name, name, e))
            })?;
            for (dim, size) in coord.dims.iter().zip(coord.shape.iter()) {
                if let Some(data_size) = self.data.dim_size(dim) {
                    if *size != data_size && *size != data_size + 1 {
                        return Err(SciplotError::InvalidInput(format!(
                            "'{}' coord '{}' has length {} along '{}', expected {} or {}",
                            self.name,
                            name,
                            size,
                            dim,
                            data_size,
                            data_size + 1
                        )));
                    }
                }
            }
        }

        for (name, mask) in &self.masks {
            let expected: usize = mask.shape.iter().product();
            if mask.dims.len() != mask.shape.len() || mask.values.len() != expected {
                return Err(SciplotError::InvalidInput(format!(
                    "'{}' mask '{}' is inconsistent with its shape {:?}",
                    self.name, name, mask.shape
                )));
            }
            for (dim, size) in mask.dims.iter().zip(mask.shape.iter()) {
                if self.data.dim_size(dim) != Some(*size) {
                    return Err(SciplotError::InvalidInput(format!(
                        "'{}' mask '{}' does not match data along '{}'",
                        self.name, name, dim
                    )));
                }
            }
        }

        if let Some(events) = &self.events {
            if events.coord.len() != self.data.len() {
                return Err(SciplotError::InvalidInput(format!(
                    "'{}' holds {} event lists for {} elements",
                    self.name,
                    events.coord.len(),
                    self.data.len()
                )));
            }
            if let Some(weights) = &events.weights {
                let matches = weights.len() == events.coord.len()
                    && weights
                        .iter()
                        .zip(events.coord.iter())
                        .all(|(w, c)| w.len() == c.len());
                if !matches {
                    return Err(SciplotError::InvalidInput(format!(
                        "'{}' event weights do not match event coordinates",
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Coordinate for a dimension, if any
    pub fn coord(&self, dim: &str) -> Option<&Variable> {
        self.coords.get(dim)
    }

    /// Whether the coordinate of `dim` holds bin edges
    pub fn is_edges(&self, dim: &str) -> bool {
        match (self.coords.get(dim), self.data.dim_size(dim)) {
            (Some(coord), Some(size)) => coord.dim_size(dim) == Some(size + 1),
            _ => false,
        }
    }

    /// Union of all masks, flattened along the data's dims
    ///
    /// Masks over a subset of dims are broadcast over the remaining ones.
    pub fn combined_mask(&self) -> Option<Vec<bool>> {
        if self.masks.is_empty() {
            return None;
        }
        let data_strides = self.data.strides();
        let mut combined = vec![false; self.data.len()];
        for mask in self.masks.values() {
            let mask_var_strides: Vec<usize> = {
                let mut strides = vec![1; mask.shape.len()];
                for i in (0..mask.shape.len().saturating_sub(1)).rev() {
                    strides[i] = strides[i + 1] * mask.shape[i + 1];
                }
                strides
            };
            for (flat, slot) in combined.iter_mut().enumerate() {
                let mut mask_index = 0;
                for (axis, dim) in self.data.dims.iter().enumerate() {
                    if let Some(m_axis) = mask.dims.iter().position(|d| d == dim) {
                        let idx = (flat / data_strides[axis]) % self.data.shape[axis];
                        mask_index += idx * mask_var_strides[m_axis];
                    }
                }
                *slot |= mask.values[mask_index];
            }
        }
        Some(combined)
    }

    /// Select index `index` of dimension `dim`
    ///
    /// Coordinates along `dim` are dropped from the result; the selected
    /// coordinate value is returned alongside for labelling.
    pub fn slice(&self, dim: &str, index: usize) -> Result<(DataArray, Option<f64>)> {
        let axis = self.data.dims.iter().position(|d| d == dim).ok_or_else(|| {
            SciplotError::InvalidInput(format!("'{}' has no dimension '{}'", self.name, dim))
        })?;
        let data = self.data.slice(dim, index)?;

        let selected = match self.coords.get(dim) {
            Some(coord) if coord.dims == [dim] => {
                let value = |i: usize| coord.values.get(i).copied();
                if self.is_edges(dim) {
                    value(index).zip(value(index + 1)).map(|(lo, hi)| 0.5 * (lo + hi))
                } else {
                    value(index)
                }
            }
            _ => None,
        };

        let mut coords = BTreeMap::new();
        for (name, coord) in &self.coords {
            if coord.dims.iter().any(|d| d == dim) {
                // 1-D coords along the sliced dim have nothing left to label
                if coord.ndim() == 1 {
                    continue;
                }
                let sliced = coord.slice(dim, index)?;
                coords.insert(name.clone(), sliced);
            } else {
                coords.insert(name.clone(), coord.clone());
            }
        }

        let masks = self
            .masks
            .iter()
            .map(|(name, mask)| (name.clone(), mask.slice(dim, index)))
            .collect();

        let events = self.events.as_ref().map(|events| EventList {
            coord: slice_flat(&events.coord, &self.data.shape, axis, index),
            weights: events
                .weights
                .as_ref()
                .map(|w| slice_flat(w, &self.data.shape, axis, index)),
        });

        Ok((
            DataArray {
                name: self.name.clone(),
                data,
                coords,
                masks,
                attrs: self.attrs.clone(),
                events,
            },
            selected,
        ))
    }
}
