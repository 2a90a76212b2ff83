//! Vega-Lite JSON writer implementation
//!
//! Converts plot groups into Vega-Lite v6 specifications with inline data.
//!
//! # Mapping Strategy
//!
//! - 1D projection -> layered `point`/`line`/`rule` marks, one set per series
//! - 2D projection -> `rect` heatmap, horizontally concatenated per data array
//! - 3D projection -> not available, Vega-Lite has no 3D marks
//!
//! # Example
//!
//! ```rust,ignore
//! use sciplot::writer::{Writer, VegaLiteWriter};
//!
//! let writer = VegaLiteWriter::new();
//! let figure = writer.write_2d(&request)?;
//! // Can be rendered in browser with vega-embed
//! ```

mod encoding;
mod image;
mod layout;
mod line;

use serde_json::{json, Value};

use crate::writer::{FigureRequest, Writer};
use crate::{Result, SciplotError};

/// Conversion factor from points to pixels (CSS standard: 96 DPI, 72 points/inch)
const POINTS_TO_PIXELS: f64 = 96.0 / 72.0;

/// A single view and the slices it shows
pub(super) struct Panel {
    pub spec: Value,
    /// `dim = value` for every dimension sliced away
    pub notes: Vec<String>,
}

/// Vega-Lite JSON writer
///
/// Generates Vega-Lite v6 specifications from plot groups.
pub struct VegaLiteWriter {
    /// Vega-Lite schema version
    schema: String,
}

impl VegaLiteWriter {
    /// Create a new Vega-Lite writer with default settings
    pub fn new() -> Self {
        Self {
            schema: "https://vega.github.io/schema/vega-lite/v6.json".to_string(),
        }
    }

    /// Add schema and title to a finished figure
    fn finish(&self, mut figure: Value, request: &FigureRequest<'_>, notes: &[String]) -> Value {
        let text = request.options.title.as_deref().unwrap_or(request.key);
        figure["$schema"] = json!(self.schema);
        figure["title"] = layout::figure_title(text, notes);
        figure
    }
}

impl Default for VegaLiteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for VegaLiteWriter {
    type Output = Value;

    fn write_1d(&self, request: &FigureRequest<'_>) -> Result<Value> {
        let panel = line::line_figure(request)?;
        let (width, height) = layout::panel_size(&request.options.config, None);
        let mut figure = panel.spec;
        figure["width"] = json!(width);
        figure["height"] = json!(height);
        Ok(self.finish(figure, request, &panel.notes))
    }

    fn write_2d(&self, request: &FigureRequest<'_>) -> Result<Value> {
        let mut panels = request
            .data_arrays
            .iter()
            .map(|(name, da)| Ok((name, image::image_panel(name, da, request)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut notes: Vec<String> = Vec::new();
        for (_, panel) in &panels {
            for note in &panel.notes {
                if !notes.contains(note) {
                    notes.push(note.clone());
                }
            }
        }

        let figure = match panels.len() {
            0 => {
                return Err(SciplotError::WriterError(format!(
                    "Group '{}' holds no data to draw",
                    request.key
                )))
            }
            1 => panels.remove(0).1.spec,
            _ => {
                let views: Vec<Value> = panels
                    .into_iter()
                    .map(|(name, panel)| {
                        let mut view = panel.spec;
                        view["title"] = json!(name);
                        view
                    })
                    .collect();
                json!({
                    "hconcat": views,
                    "resolve": {"scale": {"color": "independent"}},
                })
            }
        };
        Ok(self.finish(figure, request, &notes))
    }

    fn write_3d(&self, request: &FigureRequest<'_>) -> Result<Value> {
        Err(SciplotError::UnsupportedProjection(format!(
            "3d (group '{}'): Vega-Lite output has no three-dimensional marks",
            request.key
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataArray, Mask, Variable};
    use crate::plot::colorbar::ColorbarOverrides;
    use crate::plot::{group_inventory, Axes, PlotOptions};
    use crate::{dispatch, Inventory};
    use std::collections::BTreeMap;

    fn figures(arrays: Vec<DataArray>, options: &PlotOptions) -> Vec<Value> {
        let dataset = arrays.into_iter().map(|da| (da.name.clone(), da)).collect();
        let inventory = Inventory::from_dataset(dataset).unwrap();
        group_inventory(&inventory, options)
            .unwrap()
            .iter()
            .map(|g| dispatch(g, options, &VegaLiteWriter::new()).unwrap())
            .collect()
    }

    fn line(name: &str, values: Vec<f64>) -> DataArray {
        let n = values.len();
        DataArray::new(name, Variable::new_1d("tof", values, Some("counts")))
            .with_coord(
                "tof",
                Variable::new_1d("tof", (0..n).map(|i| i as f64).collect(), Some("us")),
            )
    }

    fn image(name: &str) -> DataArray {
        let data = Variable::new(
            vec!["y".to_string(), "x".to_string()],
            vec![2, 3],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .unwrap()
        .with_unit("K");
        DataArray::new(name, data)
            .with_coord("x", Variable::new_1d("x", vec![0.0, 1.0, 2.0], Some("m")))
            .with_coord("y", Variable::new_1d("y", vec![0.0, 2.0, 4.0], Some("m")))
    }

    fn layers_with_mark<'a>(figure: &'a Value, mark: &str) -> Vec<&'a Value> {
        figure["layer"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|l| l["mark"]["type"] == mark)
            .collect()
    }

    #[test]
    fn test_1d_points_with_errorbars() {
        let mut da = line("sample", vec![1.0, 4.0, 9.0]);
        da.data.variances = Some(vec![1.0, 4.0, 9.0]);
        let figure = &figures(vec![da], &PlotOptions::default())[0];

        assert_eq!(figure["$schema"], "https://vega.github.io/schema/vega-lite/v6.json");
        assert_eq!(figure["title"], "tof.counts");
        assert_eq!(figure["width"], 800);
        assert_eq!(figure["height"], 533);

        let points = layers_with_mark(figure, "point");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0]["mark"]["shape"], "circle");
        assert_eq!(points[0]["encoding"]["x"]["title"], "tof [us]");
        assert_eq!(points[0]["encoding"]["y"]["title"], "sample [counts]");
        // Default line style draws no line
        assert!(layers_with_mark(figure, "line").is_empty());

        let rules = layers_with_mark(figure, "rule");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0]["encoding"]["y"]["field"], "ymin");
        let rows = figure["data"]["values"].as_array().unwrap();
        assert_eq!(rows[1]["ymin"], 2.0);
        assert_eq!(rows[1]["ymax"], 6.0);
    }

    #[test]
    fn test_1d_errorbars_disabled() {
        let mut da = line("sample", vec![1.0]);
        da.data.variances = Some(vec![1.0]);
        let options = PlotOptions {
            errorbars: false,
            ..Default::default()
        };
        let figure = &figures(vec![da], &options)[0];
        assert!(layers_with_mark(figure, "rule").is_empty());
        assert!(figure["data"]["values"][0].get("ymin").is_none());
    }

    #[test]
    fn test_1d_series_share_figure_and_color_scale() {
        let figure = &figures(
            vec![line("a", vec![1.0, 2.0]), line("b", vec![3.0, 4.0])],
            &PlotOptions::default(),
        )[0];
        let points = layers_with_mark(figure, "point");
        assert_eq!(points.len(), 2);
        assert_eq!(points[1]["mark"]["shape"], "triangle-up");
        let color = &points[0]["encoding"]["color"];
        assert_eq!(color["scale"]["domain"], json!(["a", "b"]));
        assert_eq!(color["scale"]["range"], json!(["#1f77b4", "#ff7f0e"]));
        assert_eq!(points[0]["encoding"]["y"]["title"], "[counts]");
    }

    #[test]
    fn test_1d_histogram_draws_steps() {
        let da = DataArray::new("hist", Variable::new_1d("tof", vec![1.0, 3.0], None))
            .with_coord("tof", Variable::new_1d("tof", vec![0.0, 1.0, 2.0], None));
        let figure = &figures(vec![da], &PlotOptions::default())[0];
        let lines = layers_with_mark(figure, "line");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["mark"]["interpolate"], "step-after");
        assert!(layers_with_mark(figure, "point").is_empty());

        let steps: Vec<&Value> = figure["data"]["values"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r[encoding::SOURCE_FIELD] == "hist__step")
            .collect();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2]["x"], 2.0);
        assert_eq!(steps[2]["y"], 3.0);
    }

    #[test]
    fn test_1d_line_style_and_log_axes() {
        let mut options = PlotOptions {
            logxy: true,
            ..Default::default()
        };
        options.line.linestyle = crate::LineParam::Fixed("--".to_string());
        options.line.linewidth = crate::LineParam::Fixed(3.0);
        let figure = &figures(vec![line("a", vec![1.0, 2.0])], &options)[0];
        let lines = layers_with_mark(figure, "line");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["mark"]["strokeDash"], json!([6.0, 4.0]));
        let width = lines[0]["mark"]["strokeWidth"].as_f64().unwrap();
        assert!((width - 4.0).abs() < 1e-9);
        assert_eq!(lines[0]["encoding"]["x"]["scale"]["type"], "log");
        assert_eq!(lines[0]["encoding"]["y"]["scale"]["type"], "log");
    }

    #[test]
    fn test_1d_masked_overlay() {
        let da = line("a", vec![1.0, 2.0, 3.0])
            .with_mask("bad", Mask::new_1d("tof", vec![false, true, false]));
        let figure = &figures(vec![da], &PlotOptions::default())[0];
        let points = layers_with_mark(figure, "point");
        assert_eq!(points.len(), 2);
        assert_eq!(points[1]["encoding"]["color"]["value"], "#7f7f7f");
        assert_eq!(figure["data"]["values"][1]["masked"], true);
    }

    #[test]
    fn test_1d_projection_slices_extra_dims() {
        let options = PlotOptions {
            projection: Some("1d".to_string()),
            ..Default::default()
        };
        let figure = &figures(vec![image("img")], &options)[0];
        assert_eq!(figure["title"]["text"], "y.x.K");
        // y holds edges, so the first bin center is reported
        assert_eq!(figure["title"]["subtitle"], "y = 1.0");
        assert_eq!(figure["data"]["values"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_1d_projection_skips_auxiliary_coords() {
        let data = Variable::new(vec!["z".to_string(), "x".to_string()], vec![1, 2], vec![1.0, 2.0])
            .unwrap();
        let da = DataArray::new("cube", data)
            .with_coord("z", Variable::new_1d("z", vec![0.0, 1.0], None))
            .with_coord("zz", Variable::new_1d("z", vec![5.0], None));
        let options = PlotOptions {
            projection: Some("1d".to_string()),
            ..Default::default()
        };
        let figure = &figures(vec![da], &options)[0];
        assert_eq!(figure["title"]["subtitle"], "z = 0.5");
        assert_eq!(figure["data"]["values"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_2d_heatmap() {
        let figure = &figures(vec![image("img")], &PlotOptions::default())[0];
        assert_eq!(figure["title"], "img");
        let rects = layers_with_mark(figure, "rect");
        assert_eq!(rects.len(), 1);
        let encoding = &rects[0]["encoding"];
        assert_eq!(encoding["x"]["title"], "x [m]");
        assert_eq!(encoding["x2"]["field"], "x2");
        assert_eq!(encoding["color"]["title"], "img [K]");
        assert_eq!(encoding["color"]["scale"]["type"], "linear");
        assert_eq!(encoding["color"]["scale"]["domain"], json!([1.0, 6.0]));
        assert_eq!(encoding["color"]["scale"]["range"][0], "#440154");

        // y holds edges, x holds centers widened to edges
        let rows = figure["data"]["values"].as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["x"], -0.5);
        assert_eq!(rows[0]["x2"], 0.5);
        assert_eq!(rows[0]["y"], 0.0);
        assert_eq!(rows[0]["y2"], 2.0);
        assert_eq!(rows[5]["value"], 6.0);
    }

    #[test]
    fn test_2d_colorbar_options() {
        let options = PlotOptions {
            colorbar: ColorbarOverrides {
                cmap: Some("magma".to_string()),
                log: Some(true),
                cbar: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        let figure = &figures(vec![image("img")], &options)[0];
        let color = &layers_with_mark(figure, "rect")[0]["encoding"]["color"];
        assert_eq!(color["scale"]["type"], "log");
        assert_eq!(color["scale"]["range"][0], "#000004");
        assert!(color["legend"].is_null());
        assert!(color.get("legend").is_some());
    }

    #[test]
    fn test_2d_equal_aspect() {
        let mut options = PlotOptions::default();
        options.config.aspect = crate::plot::Aspect::Equal;
        let figure = &figures(vec![image("img")], &options)[0];
        // x spans 3 units, y spans 4
        assert_eq!(figure["width"], 800);
        assert_eq!(figure["height"], 1067);
    }

    #[test]
    fn test_2d_slices_leading_dims() {
        let data = Variable::new(
            vec!["t".to_string(), "y".to_string(), "x".to_string()],
            vec![2, 1, 1],
            vec![1.0, 2.0],
        )
        .unwrap();
        let da = DataArray::new("cube", data)
            .with_coord("t", Variable::new_1d("t", vec![0.5, 1.5], Some("s")));
        let figure = &figures(vec![da], &PlotOptions::default())[0];
        assert_eq!(figure["title"]["text"], "cube");
        assert_eq!(figure["title"]["subtitle"], "t = 0.5");
        assert_eq!(figure["data"]["values"][0]["value"], 1.0);
    }

    #[test]
    fn test_2d_concatenates_group_members() {
        let options = PlotOptions {
            projection: Some("2d".to_string()),
            ..Default::default()
        };
        let mut data_arrays = BTreeMap::new();
        data_arrays.insert("a".to_string(), image("a"));
        data_arrays.insert("b".to_string(), image("b"));
        let styles = BTreeMap::new();
        let request = FigureRequest {
            key: "pair",
            data_arrays: &data_arrays,
            styles: &styles,
            axes: None,
            options: &options,
        };
        let figure = VegaLiteWriter::new().write_2d(&request).unwrap();
        let views = figure["hconcat"].as_array().unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[1]["title"], "b");
        assert_eq!(figure["title"], "pair");
    }

    #[test]
    fn test_2d_requested_axes() {
        let mut da = image("img");
        da.coords
            .insert("q".to_string(), Variable::new_1d("x", vec![10.0, 20.0, 30.0], Some("1/m")));
        let options = PlotOptions {
            axes: Some(Axes::List(vec!["y".to_string(), "q".to_string()])),
            ..Default::default()
        };
        let figure = &figures(vec![da], &options)[0];
        let encoding = &layers_with_mark(figure, "rect")[0]["encoding"];
        assert_eq!(encoding["x"]["title"], "q [1/m]");
        assert_eq!(figure["data"]["values"][0]["x"], 5.0);
    }

    #[test]
    fn test_2d_rejects_1d_data() {
        let options = PlotOptions {
            projection: Some("2d".to_string()),
            ..Default::default()
        };
        let dataset = std::iter::once(("a".to_string(), line("a", vec![1.0]))).collect();
        let inventory = Inventory::from_dataset(dataset).unwrap();
        let groups = group_inventory(&inventory, &options).unwrap();
        assert!(dispatch(&groups[0], &options, &VegaLiteWriter::new()).is_err());
    }

    #[test]
    fn test_3d_unsupported() {
        let options = PlotOptions {
            projection: Some("3d".to_string()),
            ..Default::default()
        };
        let dataset = std::iter::once(("img".to_string(), image("img"))).collect();
        let inventory = Inventory::from_dataset(dataset).unwrap();
        let groups = group_inventory(&inventory, &options).unwrap();
        let err = dispatch(&groups[0], &options, &VegaLiteWriter::new()).unwrap_err();
        assert!(matches!(err, SciplotError::UnsupportedProjection(_)));
    }
}
