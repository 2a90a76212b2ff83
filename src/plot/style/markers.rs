//! Marker and line style translation
//!
//! Styles are accepted as matplotlib-style codes (`"o"`, `"^"`, `"--"`) and
//! translated into Vega-Lite point shapes and stroke dash arrays.

use crate::{Result, SciplotError};

/// Default markers, used round-robin
pub const MARKERS: &[&str] = &[
    "o", "^", "s", "d", "*", "1", "P", "h", "X", "v", "<", ">", "2", "3", "4", "8", "p", "H",
    "+", "x", "D",
];

// SVG paths in Vega-Lite's unit square (-1..1)
const STAR: &str = "M0,-1L0.225,-0.309L0.951,-0.309L0.363,0.118L0.588,0.809L0,0.382L-0.588,0.809L-0.363,0.118L-0.951,-0.309L-0.225,-0.309Z";
const PENTAGON: &str = "M0,-1L0.951,-0.309L0.588,0.809L-0.588,0.809L-0.951,-0.309Z";
const HEXAGON_POINTY: &str = "M0,-1L0.866,-0.5L0.866,0.5L0,1L-0.866,0.5L-0.866,-0.5Z";
const HEXAGON_FLAT: &str = "M-1,0L-0.5,-0.866L0.5,-0.866L1,0L0.5,0.866L-0.5,0.866Z";
const OCTAGON: &str = "M-0.383,-0.924L0.383,-0.924L0.924,-0.383L0.924,0.383L0.383,0.924L-0.383,0.924L-0.924,0.383L-0.924,-0.383Z";
const PLUS_FILLED: &str = "M-0.33,-1H0.33V-0.33H1V0.33H0.33V1H-0.33V0.33H-1V-0.33H-0.33Z";
const X_FILLED: &str = "M-0.7,-1L0,-0.3L0.7,-1L1,-0.7L0.3,0L1,0.7L0.7,1L0,0.3L-0.7,1L-1,0.7L-0.3,0L-1,-0.7Z";
const PLUS_THIN: &str = "M0,-1V1M-1,0H1";
const X_THIN: &str = "M-1,-1L1,1M-1,1L1,-1";
const TRI_DOWN: &str = "M0,0V1M0,0L-0.866,-0.5M0,0L0.866,-0.5";
const TRI_UP: &str = "M0,0V-1M0,0L-0.866,0.5M0,0L0.866,0.5";
const TRI_LEFT: &str = "M0,0H-1M0,0L0.5,-0.866M0,0L0.5,0.866";
const TRI_RIGHT: &str = "M0,0H1M0,0L-0.5,-0.866M0,0L-0.5,0.866";
const THIN_DIAMOND: &str = "M0,-1L0.6,0L0,1L-0.6,0Z";

/// Translate a marker code to a Vega-Lite shape name or SVG path
pub fn marker_to_shape(marker: &str) -> Result<&'static str> {
    let shape = match marker {
        "o" | "circle" => "circle",
        "s" | "square" => "square",
        "D" | "diamond" => "diamond",
        "d" | "thin_diamond" => THIN_DIAMOND,
        "^" | "triangle-up" => "triangle-up",
        "v" | "triangle-down" => "triangle-down",
        "<" | "triangle-left" => "triangle-left",
        ">" | "triangle-right" => "triangle-right",
        "*" | "star" => STAR,
        "p" | "pentagon" => PENTAGON,
        "h" => HEXAGON_POINTY,
        "H" => HEXAGON_FLAT,
        "8" => OCTAGON,
        "P" => PLUS_FILLED,
        "X" => X_FILLED,
        "+" | "cross" => PLUS_THIN,
        "x" => X_THIN,
        "1" => TRI_DOWN,
        "2" => TRI_UP,
        "3" => TRI_LEFT,
        "4" => TRI_RIGHT,
        _ => {
            return Err(SciplotError::StyleError(format!(
                "Unknown marker '{}'",
                marker
            )))
        }
    };
    Ok(shape)
}

/// Whether a marker is drawn as strokes only (no fill)
pub fn is_stroked_marker(marker: &str) -> bool {
    matches!(marker, "+" | "cross" | "x" | "1" | "2" | "3" | "4")
}

/// Translate a line style to a stroke dash array
///
/// `Ok(None)` means no line is drawn; an empty array is a solid line.
pub fn linestyle_to_dash(style: &str) -> Result<Option<Vec<f64>>> {
    let dash = match style {
        "none" | "None" | "" | " " => None,
        "-" | "solid" => Some(vec![]),
        "--" | "dashed" => Some(vec![6.0, 4.0]),
        "-." | "dashdot" => Some(vec![6.0, 3.0, 1.0, 3.0]),
        ":" | "dotted" => Some(vec![1.0, 3.0]),
        _ => {
            return Err(SciplotError::StyleError(format!(
                "Unknown line style '{}'",
                style
            )))
        }
    };
    Ok(dash)
}
