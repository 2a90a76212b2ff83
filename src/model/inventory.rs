//! Classification of plot input into named data arrays
//!
//! Input documents are classified by the keys they hold:
//!
//! - `coords` with `data` (or `unaligned`): a single data array, keyed by its name
//! - `dims` with `values` (or `shape`): a bare variable, wrapped with integer
//!   coordinates and keyed as `"variable"`
//! - anything else: a dataset mapping names to data arrays

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use super::{DataArray, Dataset, Variable};
use crate::plot::tools::make_fake_coord;
use crate::{Result, SciplotError};

/// Inventory key used for a bare variable
pub const VARIABLE_KEY: &str = "variable";

/// Named data arrays to plot, iterated in ascending name order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    entries: BTreeMap<String, DataArray>,
}

impl Inventory {
    /// Classify a JSON document
    pub fn classify(input: &Value) -> Result<Self> {
        let obj = input.as_object().ok_or_else(|| {
            SciplotError::InvalidInput(format!(
                "Expected an object describing a variable, data array or dataset, got {}",
                json_kind(input)
            ))
        })?;

        if is_data_array(obj) {
            debug!("Classified input as a data array");
            let da: DataArray = serde_json::from_value(input.clone())
                .map_err(|e| SciplotError::InvalidInput(format!("Invalid data array: {}", e)))?;
            if da.name.is_empty() {
                return Err(SciplotError::InvalidInput(
                    "Data array input requires a 'name'".to_string(),
                ));
            }
            Self::from_data_array(da)
        } else if is_variable(obj) {
            debug!("Classified input as a variable");
            let var: Variable = serde_json::from_value(input.clone())
                .map_err(|e| SciplotError::InvalidInput(format!("Invalid variable: {}", e)))?;
            Self::from_variable(var)
        } else {
            debug!("Classified input as a dataset with {} entries", obj.len());
            let mut dataset = Dataset::new();
            for (name, entry) in obj {
                let mut da: DataArray = serde_json::from_value(entry.clone()).map_err(|e| {
                    SciplotError::InvalidInput(format!("Invalid dataset entry '{}': {}", name, e))
                })?;
                if da.name.is_empty() {
                    da.name = name.clone();
                }
                dataset.insert(name.clone(), da);
            }
            Self::from_dataset(dataset)
        }
    }

    /// Wrap a single data array
    pub fn from_data_array(mut da: DataArray) -> Result<Self> {
        da.normalize()?;
        let mut entries = BTreeMap::new();
        entries.insert(da.name.clone(), da);
        Ok(Self { entries })
    }

    /// Wrap a bare variable, giving every dimension an integer coordinate
    pub fn from_variable(mut var: Variable) -> Result<Self> {
        var.infer_shape();
        var.validate()?;
        let mut da = DataArray::new(VARIABLE_KEY, var);
        for (dim, size) in da.data.dims.clone().into_iter().zip(da.data.shape.clone()) {
            da.coords.insert(dim.clone(), make_fake_coord(&dim, size, None));
        }
        Self::from_data_array(da)
    }

    /// Wrap a dataset; entries keep their dataset keys
    pub fn from_dataset(dataset: Dataset) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (name, mut da) in dataset {
            da.normalize()?;
            entries.insert(name, da);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.entries.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }

    /// Iterate entries in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DataArray)> {
        self.entries.iter()
    }
}

fn is_data_array(obj: &Map<String, Value>) -> bool {
    obj.contains_key("coords") && (obj.contains_key("data") || obj.contains_key("unaligned"))
}

fn is_variable(obj: &Map<String, Value>) -> bool {
    obj.contains_key("dims") && (obj.contains_key("values") || obj.contains_key("shape"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_data_array() {
        let input = json!({
            "name": "sample",
            "data": {"dims": ["tof"], "shape": [3], "values": [1.0, 2.0, 3.0], "unit": "counts"},
            "coords": {"tof": {"dims": ["tof"], "shape": [3], "values": [0.0, 1.0, 2.0], "unit": "us"}}
        });
        let inventory = Inventory::classify(&input).unwrap();
        assert_eq!(inventory.names(), vec!["sample"]);
        assert_eq!(inventory.get("sample").unwrap().data.unit_str(), "counts");
    }

    #[test]
    fn test_classify_unaligned_data_array() {
        let input = json!({
            "name": "events",
            "unaligned": {"dims": ["x"], "values": [0.0, 0.0]},
            "coords": {},
            "events": {"coord": [[1.0], [2.0, 3.0]]}
        });
        let inventory = Inventory::classify(&input).unwrap();
        assert!(inventory.get("events").unwrap().has_events());
    }

    #[test]
    fn test_classify_data_array_requires_name() {
        let input = json!({
            "data": {"dims": ["x"], "values": [1.0]},
            "coords": {}
        });
        assert!(Inventory::classify(&input).is_err());
    }

    #[test]
    fn test_classify_variable_gets_fake_coords() {
        let input = json!({
            "dims": ["y", "x"],
            "shape": [2, 2],
            "values": [1.0, 2.0, 3.0, 4.0],
            "variances": null,
            "unit": "K"
        });
        let inventory = Inventory::classify(&input).unwrap();
        let da = inventory.get(VARIABLE_KEY).unwrap();
        assert_eq!(da.coords["x"].values, vec![0.0, 1.0]);
        assert_eq!(da.coords["y"].values, vec![0.0, 1.0]);
        assert_eq!(da.coords["x"].dtype, "int");
    }

    #[test]
    fn test_classify_dataset_sorted() {
        let input = json!({
            "b": {"data": {"dims": ["x"], "values": [1.0]}, "coords": {}},
            "a": {"data": {"dims": ["x"], "values": [2.0]}, "coords": {}}
        });
        let inventory = Inventory::classify(&input).unwrap();
        assert_eq!(inventory.names(), vec!["a", "b"]);
        assert_eq!(inventory.get("b").unwrap().name, "b");
    }

    #[test]
    fn test_classify_rejects_non_object() {
        let err = Inventory::classify(&json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_classify_rejects_inconsistent_variable() {
        let input = json!({"dims": ["x"], "shape": [3], "values": [1.0]});
        assert!(Inventory::classify(&input).is_err());
    }
}
