//! Variable and mask types
//!
//! Values are stored flattened in row-major order; `shape[i]` is the length
//! of dimension `dims[i]`.

use serde::{Deserialize, Serialize};

use crate::{Result, SciplotError};

/// Select `index` along `axis` of a flattened row-major buffer
pub(crate) fn slice_flat<T: Clone>(src: &[T], shape: &[usize], axis: usize, index: usize) -> Vec<T> {
    let inner: usize = shape[axis + 1..].iter().product();
    let outer: usize = shape[..axis].iter().product();
    let mut out = Vec::with_capacity(outer * inner);
    for o in 0..outer {
        let start = (o * shape[axis] + index) * inner;
        out.extend_from_slice(&src[start..start + inner]);
    }
    out
}

fn default_dtype() -> String {
    "float64".to_string()
}

/// A labeled multi-dimensional array of numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Dimension labels, outermost first
    pub dims: Vec<String>,
    /// Extent of each dimension
    #[serde(default)]
    pub shape: Vec<usize>,
    /// Flattened values
    #[serde(default)]
    pub values: Vec<f64>,
    /// Flattened variances (same length as values)
    #[serde(default)]
    pub variances: Option<Vec<f64>>,
    /// Physical unit, `None` for dimensionless
    #[serde(default)]
    pub unit: Option<String>,
    /// Element type name, informational only
    #[serde(default = "default_dtype")]
    pub dtype: String,
}

impl Variable {
    /// Create a 1-D variable
    pub fn new_1d(dim: impl Into<String>, values: Vec<f64>, unit: Option<&str>) -> Self {
        Self {
            dims: vec![dim.into()],
            shape: vec![values.len()],
            values,
            variances: None,
            unit: unit.map(str::to_string),
            dtype: default_dtype(),
        }
    }

    /// Create a variable with arbitrary dimensionality
    pub fn new(dims: Vec<String>, shape: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        let var = Self {
            dims,
            shape,
            values,
            variances: None,
            unit: None,
            dtype: default_dtype(),
        };
        var.validate()?;
        Ok(var)
    }

    /// Builder: set the unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Builder: set the variances
    pub fn with_variances(mut self, variances: Vec<f64>) -> Self {
        self.variances = Some(variances);
        self
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements (1 for a 0-D variable)
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of a named dimension
    pub fn dim_size(&self, dim: &str) -> Option<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .map(|idx| self.shape[idx])
    }

    /// Unit as displayed in keys and labels
    pub fn unit_str(&self) -> &str {
        self.unit.as_deref().unwrap_or("dimensionless")
    }

    /// Check the structural consistency of dims, shape, values and variances
    pub fn validate(&self) -> Result<()> {
        if self.dims.len() != self.shape.len() {
            return Err(SciplotError::InvalidInput(format!(
                "Variable has {} dims but a shape of length {}",
                self.dims.len(),
                self.shape.len()
            )));
        }
        for (idx, dim) in self.dims.iter().enumerate() {
            if self.dims[..idx].contains(dim) {
                return Err(SciplotError::InvalidInput(format!(
                    "Duplicate dimension '{}'",
                    dim
                )));
            }
        }
        if self.values.len() != self.len() {
            return Err(SciplotError::InvalidInput(format!(
                "Variable with shape {:?} holds {} values, expected {}",
                self.shape,
                self.values.len(),
                self.len()
            )));
        }
        if let Some(variances) = &self.variances {
            if variances.len() != self.values.len() {
                return Err(SciplotError::InvalidInput(format!(
                    "Variable holds {} values but {} variances",
                    self.values.len(),
                    variances.len()
                )));
            }
        }
        Ok(())
    }

    /// Fill in the shape of a 1-D variable given without one
    pub(crate) fn infer_shape(&mut self) {
        if self.shape.is_empty() && self.dims.len() == 1 {
            self.shape = vec![self.values.len()];
        }
    }

    /// Row-major strides of each dimension
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.shape.len()];
        for i in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.shape[i + 1];
        }
        strides
    }

    /// Select index `index` of dimension `dim`, dropping that dimension
    pub fn slice(&self, dim: &str, index: usize) -> Result<Variable> {
        let axis = self.dims.iter().position(|d| d == dim).ok_or_else(|| {
            SciplotError::InvalidInput(format!("Variable has no dimension '{}'", dim))
        })?;
        if index >= self.shape[axis] {
            return Err(SciplotError::InvalidInput(format!(
                "Index {} out of range for dimension '{}' of size {}",
                index, dim, self.shape[axis]
            )));
        }
        let take = |src: &[f64]| slice_flat(src, &self.shape, axis, index);

        let mut dims = self.dims.clone();
        let mut shape = self.shape.clone();
        dims.remove(axis);
        shape.remove(axis);
        Ok(Variable {
            dims,
            shape,
            values: take(&self.values),
            variances: self.variances.as_deref().map(take),
            unit: self.unit.clone(),
            dtype: self.dtype.clone(),
        })
    }

    /// Standard deviations derived from the variances
    pub fn stddevs(&self) -> Option<Vec<f64>> {
        self.variances
            .as_ref()
            .map(|v| v.iter().map(|x| x.max(0.0).sqrt()).collect())
    }
}

/// A boolean mask over some of the dimensions of a data array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    pub dims: Vec<String>,
    #[serde(default)]
    pub shape: Vec<usize>,
    pub values: Vec<bool>,
}

impl Mask {
    pub fn new_1d(dim: impl Into<String>, values: Vec<bool>) -> Self {
        Self {
            dims: vec![dim.into()],
            shape: vec![values.len()],
            values,
        }
    }

    /// Fill in the shape from the owning data variable when omitted
    pub(crate) fn infer_shape(&mut self, data: &Variable) {
        if self.shape.is_empty() {
            self.shape = self
                .dims
                .iter()
                .map(|d| data.dim_size(d).unwrap_or(0))
                .collect();
        }
    }

    /// Select index `index` of `dim`; masks that do not depend on `dim` are unchanged
    pub fn slice(&self, dim: &str, index: usize) -> Mask {
        let Some(axis) = self.dims.iter().position(|d| d == dim) else {
            return self.clone();
        };
        let values = slice_flat(&self.values, &self.shape, axis, index);
        let mut dims = self.dims.clone();
        let mut shape = self.shape.clone();
        dims.remove(axis);
        shape.remove(axis);
        Mask {
            dims,
            shape,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var_2d() -> Variable {
        Variable::new(
            vec!["y".to_string(), "x".to_string()],
            vec![2, 3],
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap()
    }

    #[test]
    fn test_validate_shape_mismatch() {
        let result = Variable::new(vec!["x".to_string()], vec![3], vec![1.0, 2.0]);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("expected 3"));
    }

    #[test]
    fn test_validate_duplicate_dims() {
        let result = Variable::new(
            vec!["x".to_string(), "x".to_string()],
            vec![1, 1],
            vec![1.0],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_dim_variable_holds_one_value() {
        let var = Variable::new(vec![], vec![], vec![4.2]).unwrap();
        assert_eq!(var.ndim(), 0);
        assert_eq!(var.len(), 1);
    }

    #[test]
    fn test_variances_length_checked() {
        let var = Variable::new_1d("x", vec![1.0, 2.0], None).with_variances(vec![1.0]);
        assert!(var.validate().is_err());
    }

    #[test]
    fn test_strides() {
        assert_eq!(var_2d().strides(), vec![3, 1]);
    }

    #[test]
    fn test_slice_outer_dim() {
        let sliced = var_2d().slice("y", 1).unwrap();
        assert_eq!(sliced.dims, vec!["x"]);
        assert_eq!(sliced.values, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_slice_inner_dim() {
        let sliced = var_2d().slice("x", 2).unwrap();
        assert_eq!(sliced.dims, vec!["y"]);
        assert_eq!(sliced.values, vec![2.0, 5.0]);
    }

    #[test]
    fn test_slice_out_of_range() {
        assert!(var_2d().slice("y", 2).is_err());
        assert!(var_2d().slice("z", 0).is_err());
    }

    #[test]
    fn test_stddevs() {
        let var = Variable::new_1d("x", vec![1.0, 2.0], None).with_variances(vec![4.0, 9.0]);
        assert_eq!(var.stddevs(), Some(vec![2.0, 3.0]));
    }

    #[test]
    fn test_unit_str_defaults_to_dimensionless() {
        let var = Variable::new_1d("x", vec![1.0], None);
        assert_eq!(var.unit_str(), "dimensionless");
        assert_eq!(var.with_unit("m").unit_str(), "m");
    }

    #[test]
    fn test_mask_slice() {
        let mask = Mask {
            dims: vec!["y".to_string(), "x".to_string()],
            shape: vec![2, 2],
            values: vec![true, false, false, true],
        };
        let sliced = mask.slice("y", 1);
        assert_eq!(sliced.values, vec![false, true]);
        // Slicing a dim the mask does not depend on is a no-op
        assert_eq!(mask.slice("z", 0), mask);
    }
}
