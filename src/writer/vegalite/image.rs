//! 2D figures: `rect` heatmaps colored through the colorbar settings
//!
//! The innermost dimension runs along x and the next one along y. Each data
//! element becomes a rectangle spanning its bin edges; centers are widened
//! to edges first. Masked elements get a translucent gray overlay.

use serde_json::{json, Value};
use tracing::debug;

use super::encoding::{position_channel, reduce_dims, AxisCoord};
use super::layout::{panel_size, Spans};
use super::Panel;
use crate::model::DataArray;
use crate::plot::colorbar::{parse_params, ColorbarRequest};
use crate::plot::style::palettes::MASK_COLOR;
use crate::plot::tools::name_with_unit;
use crate::writer::FigureRequest;
use crate::{Result, SciplotError};

/// Opacity of the gray mask overlay
const MASK_OPACITY: f64 = 0.6;

/// Build the heatmap panel of one data array
pub(super) fn image_panel(name: &str, da: &DataArray, request: &FigureRequest<'_>) -> Result<Panel> {
    let options = request.options;
    if da.data.ndim() < 2 {
        return Err(SciplotError::InvalidInput(format!(
            "'{}' has {} dimension(s), an image needs at least 2",
            name,
            da.data.ndim()
        )));
    }
    let (da, notes) = reduce_dims(da, 2)?;
    let (ydim, xdim) = (da.data.dims[0].clone(), da.data.dims[1].clone());
    let xaxis = AxisCoord::resolve(&da, &xdim, request.axes)?;
    let yaxis = AxisCoord::resolve(&da, &ydim, request.axes)?;
    let xedges = xaxis.edges()?;
    let yedges = yaxis.edges()?;
    let (ny, nx) = (yaxis.size, xaxis.size);

    let mask = da.combined_mask();
    let mut rows = Vec::with_capacity(nx * ny);
    for iy in 0..ny {
        for ix in 0..nx {
            let idx = iy * nx + ix;
            rows.push(json!({
                "x": xedges[ix],
                "x2": xedges[ix + 1],
                "y": yedges[iy],
                "y2": yedges[iy + 1],
                "value": da.data.values[idx],
                "masked": mask.as_ref().is_some_and(|m| m[idx]),
            }));
        }
    }

    let parsed = parse_params(
        &options.config.params,
        &ColorbarRequest {
            globs: Some(&options.colorbar),
            values: Some(&da.data.values),
            ..Default::default()
        },
    )?;
    let params = &parsed.params;
    let mut scale = json!({
        "type": if params.log { "log" } else { "linear" },
        "range": parsed.colormap.colors.clone(),
    });
    if let Some(norm) = parsed.norm {
        scale["domain"] = json!(norm.domain());
    }
    let mut color = json!({
        "field": "value",
        "type": "quantitative",
        "title": name_with_unit(Some(&da.data), Some(name), false),
        "scale": scale,
    });
    if !params.cbar {
        color["legend"] = Value::Null;
    }
    debug!(
        "2D panel '{}': {}x{} with colormap {}",
        name, ny, nx, parsed.colormap.name
    );

    let mut image_mark = json!({"type": "rect"});
    if !params.show {
        image_mark["opacity"] = json!(0);
    }
    let mut layers = vec![json!({
        "mark": image_mark,
        "encoding": {"color": color},
    })];
    if mask.as_ref().is_some_and(|m| m.iter().any(|v| *v)) {
        layers.push(json!({
            "mark": {"type": "rect", "opacity": MASK_OPACITY},
            "transform": [{"filter": {"field": "masked", "equal": true}}],
            "encoding": {"color": {"value": MASK_COLOR}},
        }));
    }

    let x = position_channel("x", Some(&xaxis.title()), options.log_x());
    let y = position_channel("y", Some(&yaxis.title()), options.log_y());
    for layer in layers.iter_mut() {
        layer["encoding"]["x"] = x.clone();
        layer["encoding"]["x2"] = json!({"field": "x2"});
        layer["encoding"]["y"] = y.clone();
        layer["encoding"]["y2"] = json!({"field": "y2"});
    }

    let spans = if options.log_x() || options.log_y() {
        None
    } else {
        Some(Spans::from_edges(&xedges, &yedges))
    };
    let (width, height) = panel_size(&options.config, spans);

    Ok(Panel {
        spec: json!({
            "data": {"values": rows},
            "layer": layers,
            "width": width,
            "height": height,
        }),
        notes,
    })
}
