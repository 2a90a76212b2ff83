//! Plotting helpers: bin edges and centers, labels and number formatting

use crate::model::Variable;
use crate::{Result, SciplotError};

/// Default line parameter at `index`, wrapping around the list
///
/// Negative indices count from the end, so `-1` is the last entry.
pub fn get_line_param<T: Clone>(param: &str, values: &[T], index: i64) -> Result<T> {
    if values.is_empty() {
        return Err(SciplotError::StyleError(format!(
            "No default values configured for '{}'",
            param
        )));
    }
    let position = index.rem_euclid(values.len() as i64) as usize;
    Ok(values[position].clone())
}

/// Midpoints of consecutive bin edges
pub fn edges_to_centers(x: &[f64]) -> Vec<f64> {
    x.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Bin edges around the given centers
///
/// Inner edges are the midpoints; the outer edges mirror the first and last
/// half-widths. A single center gets a bin of width `|x0|` (or 1 at zero).
pub fn centers_to_edges(x: &[f64]) -> Result<Vec<f64>> {
    match x.len() {
        0 => Err(SciplotError::InvalidInput(
            "Cannot compute bin edges of an empty coordinate".to_string(),
        )),
        1 => {
            let mut dx = 0.5 * x[0].abs();
            if dx == 0.0 {
                dx = 0.5;
            }
            Ok(vec![x[0] - dx, x[0] + dx])
        }
        n => {
            let mids = edges_to_centers(x);
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(2.0 * x[0] - mids[0]);
            edges.extend_from_slice(&mids);
            edges.push(2.0 * x[n - 1] - mids[n - 2]);
            Ok(edges)
        }
    }
}

/// Axis or column title of the form `name [unit]`
///
/// Without a name the innermost dimension of `var` is used. `log` wraps the
/// text in `log₁₀(...)`.
pub fn name_with_unit(var: Option<&Variable>, name: Option<&str>, log: bool) -> String {
    let mut text = match (name, var) {
        (Some(name), _) => name.to_string(),
        (None, Some(var)) => var.dims.last().cloned().unwrap_or_default(),
        (None, None) => String::new(),
    };
    if log {
        text = format!("log\u{2081}\u{2080}({})", text);
    }
    if let Some(var) = var {
        text.push_str(&format!(" [{}]", var.unit_str()));
    }
    text
}

/// A number to format with `value_to_string`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<usize> for Scalar {
    fn from(v: usize) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

/// Human readable number
///
/// Integers and zero are printed as-is. Very large or very small magnitudes
/// switch to scientific notation with `precision` decimals; other values use
/// the shortest representation, cut to `precision` decimals when longer than
/// `precision + 2` characters (plus one for a sign).
pub fn value_to_string(val: impl Into<Scalar>, precision: usize) -> String {
    let val = match val.into() {
        Scalar::Int(i) => return i.to_string(),
        Scalar::Float(f) => f,
    };
    if val.is_nan() {
        return "nan".to_string();
    }
    if val.is_infinite() {
        return if val > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if val == 0.0 {
        return shortest_repr(val);
    }

    let upper = 10f64.powi(precision as i32 + 1);
    let lower = 10f64.powi(-(precision as i32) - 1);
    if val.abs() >= upper || val.abs() <= lower {
        return format!("{:.*e}", precision, val);
    }

    let text = shortest_repr(val);
    let limit = precision + 2 + usize::from(val < 0.0);
    if text.len() > limit {
        format!("{:.*}", precision, val)
    } else {
        text
    }
}

/// Shortest round-trip representation, always with a decimal point
fn shortest_repr(val: f64) -> String {
    let text = val.to_string();
    if text.contains('.') || text.contains('e') {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Integer coordinate `0..size` for a dimension without one
pub fn make_fake_coord(dim: &str, size: usize, unit: Option<&str>) -> Variable {
    let mut coord = Variable::new_1d(dim, (0..size).map(|i| i as f64).collect(), unit);
    coord.dtype = "int".to_string();
    coord
}
