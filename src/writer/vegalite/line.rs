//! 1D figures: points, lines, histogram steps and error bars
//!
//! All series of a group share one inline dataset. Each row carries the
//! series name in `SOURCE_FIELD` and every layer filters its own rows, the
//! same way a single dataset feeds several marks.
//!
//! Per series, in drawing order:
//!
//! - histogram (bin-edge coordinate): a `step-after` line through the edges
//! - otherwise: point markers, plus a line when the line style draws one
//! - error bars as `rule` marks spanning `value +/- stddev`
//! - masked values redrawn as gray points

use serde_json::{json, Map, Value};
use tracing::debug;

use super::encoding::{
    masked_filter, position_channel, reduce_dims, source_filter, AxisCoord, SOURCE_FIELD,
};
use super::{Panel, POINTS_TO_PIXELS};
use crate::model::DataArray;
use crate::plot::style::markers::{is_stroked_marker, linestyle_to_dash, marker_to_shape};
use crate::plot::style::palettes::MASK_COLOR;
use crate::plot::style::SeriesStyle;
use crate::plot::tools::name_with_unit;
use crate::writer::FigureRequest;
use crate::{Result, SciplotError};

/// Suffix of the rows feeding a histogram step line
const STEP_SUFFIX: &str = "__step";

/// Rows and layers of one series
struct SeriesLayers {
    rows: Vec<Value>,
    layers: Vec<Value>,
    x_title: String,
    notes: Vec<String>,
}

/// Build the layered spec of a 1D figure (without schema and size)
pub(super) fn line_figure(request: &FigureRequest<'_>) -> Result<Panel> {
    let options = request.options;
    let mut rows = Vec::new();
    let mut layers = Vec::new();
    let mut x_titles: Vec<String> = Vec::new();
    let mut notes: Vec<String> = Vec::new();
    let mut domain = Vec::new();
    let mut range = Vec::new();

    for (name, da) in request.data_arrays {
        let style = request.styles.get(name).ok_or_else(|| {
            SciplotError::WriterError(format!("No style resolved for series '{}'", name))
        })?;
        let series = series_layers(name, da, style, request)?;
        rows.extend(series.rows);
        layers.extend(series.layers);
        if !x_titles.contains(&series.x_title) {
            x_titles.push(series.x_title);
        }
        for note in series.notes {
            if !notes.contains(&note) {
                notes.push(note);
            }
        }
        domain.push(json!(name));
        range.push(json!(style.color));
    }
    debug!(
        "1D figure '{}': {} series, {} rows",
        request.key,
        request.data_arrays.len(),
        rows.len()
    );

    let y_title = match request.data_arrays.iter().next() {
        Some((name, da)) if request.data_arrays.len() == 1 => {
            name_with_unit(Some(&da.data), Some(name), false)
        }
        Some((_, da)) => format!("[{}]", da.data.unit_str()),
        None => String::new(),
    };
    let x_title = x_titles.join(", ");

    // Shared channels; layers only add what differs
    let color = json!({
        "field": SOURCE_FIELD,
        "type": "nominal",
        "title": Value::Null,
        "scale": {"domain": domain, "range": range},
    });
    for layer in layers.iter_mut() {
        let encoding = layer["encoding"].as_object_mut().ok_or_else(|| {
            SciplotError::WriterError("Layer without encoding".to_string())
        })?;
        encoding
            .entry("x")
            .or_insert_with(|| position_channel("x", Some(&x_title), options.log_x()));
        match encoding.get_mut("y") {
            Some(y) => {
                y["title"] = json!(y_title);
                y["scale"] = position_channel("y", None, options.log_y())["scale"].clone();
            }
            None => {
                encoding.insert(
                    "y".to_string(),
                    position_channel("y", Some(&y_title), options.log_y()),
                );
            }
        }
        encoding.entry("color").or_insert_with(|| color.clone());
    }

    Ok(Panel {
        spec: json!({
            "data": {"values": rows},
            "layer": layers,
        }),
        notes,
    })
}

fn row(source: &str, x: f64, y: f64, masked: bool) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert(SOURCE_FIELD.to_string(), json!(source));
    row.insert("x".to_string(), json!(x));
    row.insert("y".to_string(), json!(y));
    row.insert("masked".to_string(), json!(masked));
    row
}

fn series_layers(
    name: &str,
    da: &DataArray,
    style: &SeriesStyle,
    request: &FigureRequest<'_>,
) -> Result<SeriesLayers> {
    let (da, notes) = reduce_dims(da, 1)?;
    let dim = da.data.dims.first().cloned().ok_or_else(|| {
        SciplotError::InvalidInput(format!("'{}' has no dimension to plot along", name))
    })?;
    let axis = AxisCoord::resolve(&da, &dim, request.axes)?;
    let centers = axis.centers();
    let stddevs = if request.options.errorbars {
        da.data.stddevs()
    } else {
        None
    };
    let mask = da.combined_mask();
    let width_px = style.linewidth * POINTS_TO_PIXELS;

    let mut rows = Vec::with_capacity(centers.len());
    for (i, (x, y)) in centers.iter().zip(&da.data.values).enumerate() {
        let mut entry = row(name, *x, *y, mask.as_ref().is_some_and(|m| m[i]));
        if let Some(stddevs) = &stddevs {
            entry.insert("ymin".to_string(), json!(y - stddevs[i]));
            entry.insert("ymax".to_string(), json!(y + stddevs[i]));
        }
        rows.push(Value::Object(entry));
    }

    let shape = marker_to_shape(&style.marker)?;
    let mut layers = Vec::new();

    if axis.is_edges() {
        // The last value is repeated so the step reaches the final edge
        let step_source = format!("{}{}", name, STEP_SUFFIX);
        let edges = &axis.coord.values;
        let values = &da.data.values;
        for (i, x) in edges.iter().enumerate() {
            let y = values.get(i).or(values.last()).copied().unwrap_or(f64::NAN);
            rows.push(Value::Object(row(&step_source, *x, y, false)));
        }
        let mut mark = json!({
            "type": "line",
            "interpolate": "step-after",
            "strokeWidth": width_px,
        });
        if let Some(dash) = linestyle_to_dash(&style.linestyle)?.filter(|d| !d.is_empty()) {
            mark["strokeDash"] = json!(dash);
        }
        layers.push(json!({
            "mark": mark,
            "transform": [source_filter(&step_source)],
            "encoding": {"color": {"value": style.color}},
        }));
    } else {
        if let Some(dash) = linestyle_to_dash(&style.linestyle)? {
            let mut mark = json!({"type": "line", "strokeWidth": width_px});
            if !dash.is_empty() {
                mark["strokeDash"] = json!(dash);
            }
            layers.push(json!({
                "mark": mark,
                "transform": [source_filter(name)],
                "encoding": {},
            }));
        }
        layers.push(json!({
            "mark": {
                "type": "point",
                "shape": shape,
                "filled": !is_stroked_marker(&style.marker),
                "opacity": 1,
            },
            "transform": [source_filter(name)],
            "encoding": {},
        }));
    }

    if stddevs.is_some() {
        layers.push(json!({
            "mark": {"type": "rule", "strokeWidth": width_px},
            "transform": [source_filter(name)],
            "encoding": {
                "y": {"field": "ymin", "type": "quantitative"},
                "y2": {"field": "ymax"},
            },
        }));
    }

    if mask.as_ref().is_some_and(|m| m.iter().any(|v| *v)) {
        layers.push(json!({
            "mark": {"type": "point", "shape": shape, "filled": true, "opacity": 1},
            "transform": [masked_filter(name)],
            "encoding": {"color": {"value": MASK_COLOR}},
        }));
    }

    Ok(SeriesLayers {
        rows,
        layers,
        x_title: axis.title(),
        notes,
    })
}
