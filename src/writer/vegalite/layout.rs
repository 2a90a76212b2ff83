//! Figure geometry

use serde_json::{json, Value};

use crate::plot::{Aspect, PlotConfig};

/// Data extent of an image along x and y
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Spans {
    pub x: f64,
    pub y: f64,
}

impl Spans {
    pub fn from_edges(xedges: &[f64], yedges: &[f64]) -> Self {
        let span = |edges: &[f64]| match (edges.first(), edges.last()) {
            (Some(first), Some(last)) => (last - first).abs(),
            _ => f64::NAN,
        };
        Self {
            x: span(xedges),
            y: span(yedges),
        }
    }
}

/// Width and height in pixels
///
/// With `aspect = "equal"` and usable spans the height follows the width so
/// one data unit is as tall as it is wide.
pub(super) fn panel_size(config: &PlotConfig, spans: Option<Spans>) -> (u32, u32) {
    let width = config.width;
    let height = match (config.aspect, spans) {
        (Aspect::Equal, Some(s)) if s.x.is_finite() && s.y.is_finite() && s.x > 0.0 && s.y > 0.0 => {
            ((width as f64 * s.y / s.x).round() as u32).max(1)
        }
        _ => config.height,
    };
    (width, height)
}

/// Figure title, with the sliced dimensions as subtitle
pub(super) fn figure_title(text: &str, notes: &[String]) -> Value {
    if notes.is_empty() {
        json!(text)
    } else {
        json!({"text": text, "subtitle": notes.join(", ")})
    }
}
