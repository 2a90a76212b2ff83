/*!
sciplot Command Line Interface

Renders labeled array data stored as JSON into Vega-Lite figures, or shows
how the data would be grouped into figures.
*/

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sciplot::model::Inventory;
use sciplot::plot::group_inventory;
use sciplot::{Axes, BinSpec, ColorbarOverrides, LineParam, PlotConfig, PlotOptions, VERSION};

#[derive(Parser)]
#[command(name = "sciplot")]
#[command(about = "Plot labeled multi-dimensional array data")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the figures of a JSON document
    Render {
        /// Path to a JSON variable, data array or dataset
        input: PathBuf,

        #[command(flatten)]
        plot: PlotArgs,

        /// Directory receiving one `<key>.vl.json` per figure (prints to stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show how a JSON document is grouped into figures
    Inspect {
        /// Path to a JSON variable, data array or dataset
        input: PathBuf,

        #[command(flatten)]
        plot: PlotArgs,
    },
}

/// Options shared by all commands
#[derive(Args, Debug, Default)]
pub struct PlotArgs {
    /// Projection: 1d, 2d or 3d (default by dimensionality)
    #[arg(long)]
    projection: Option<String>,

    /// TOML file overriding the default styles and figure size
    #[arg(long)]
    config: Option<PathBuf>,

    /// Coordinate to plot against, outermost first (repeatable)
    #[arg(long = "axis")]
    axes: Vec<String>,

    /// Line color; repeat to give one per series
    #[arg(long)]
    color: Vec<String>,

    /// Marker code; repeat to give one per series
    #[arg(long)]
    marker: Vec<String>,

    /// Line style; repeat to give one per series
    #[arg(long)]
    linestyle: Vec<String>,

    /// Line width in points; repeat to give one per series
    #[arg(long)]
    linewidth: Vec<f64>,

    /// Histogram event data, `dim=20` or `dim=0,1,5,10`
    #[arg(long)]
    bins: Vec<String>,

    #[arg(long)]
    logx: bool,

    #[arg(long)]
    logy: bool,

    #[arg(long)]
    logxy: bool,

    /// Do not draw variances as error bars
    #[arg(long)]
    no_errorbars: bool,

    /// Figure title (defaults to the group key)
    #[arg(long)]
    title: Option<String>,

    /// Colormap of 2D figures
    #[arg(long)]
    cmap: Option<String>,

    /// Logarithmic color scale
    #[arg(long)]
    log_color: bool,

    /// Lower color limit
    #[arg(long)]
    vmin: Option<f64>,

    /// Upper color limit
    #[arg(long)]
    vmax: Option<f64>,

    /// Hide the colorbar legend
    #[arg(long)]
    no_cbar: bool,
}

/// No value keeps the default, one is used for every series, more are indexed per series
fn line_param<T>(mut values: Vec<T>) -> LineParam<T> {
    match values.len() {
        0 => LineParam::Default,
        1 => LineParam::Fixed(values.remove(0)),
        _ => LineParam::List(values),
    }
}

fn parse_bins(specs: &[String]) -> anyhow::Result<Option<BTreeMap<String, BinSpec>>> {
    if specs.is_empty() {
        return Ok(None);
    }
    let mut bins = BTreeMap::new();
    for spec in specs {
        let Some((dim, value)) = spec.split_once('=') else {
            bail!("Invalid --bins '{}', expected dim=count or dim=e0,e1,...", spec);
        };
        let bin_spec: BinSpec = value
            .parse()
            .with_context(|| format!("Invalid --bins '{}'", spec))?;
        bins.insert(dim.trim().to_string(), bin_spec);
    }
    Ok(Some(bins))
}

impl PlotArgs {
    fn to_options(&self) -> anyhow::Result<PlotOptions> {
        let config = match &self.config {
            Some(path) => PlotConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PlotConfig::default(),
        };

        let mut options = PlotOptions {
            projection: self.projection.clone(),
            axes: (!self.axes.is_empty()).then(|| Axes::List(self.axes.clone())),
            bins: parse_bins(&self.bins)?,
            logx: self.logx,
            logy: self.logy,
            logxy: self.logxy,
            errorbars: !self.no_errorbars,
            title: self.title.clone(),
            colorbar: ColorbarOverrides {
                cmap: self.cmap.clone(),
                log: self.log_color.then_some(true),
                vmin: self.vmin,
                vmax: self.vmax,
                cbar: self.no_cbar.then_some(false),
                ..Default::default()
            },
            config,
            ..Default::default()
        };
        options.line.color = line_param(self.color.clone());
        options.line.marker = line_param(self.marker.clone());
        options.line.linestyle = line_param(self.linestyle.clone());
        options.line.linewidth = line_param(self.linewidth.clone());
        Ok(options)
    }
}

fn read_input(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// File name for a figure key
fn figure_file_name(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{}.vl.json", stem)
}

#[cfg(feature = "vegalite")]
fn render(input: &Path, args: &PlotArgs, output: Option<&Path>) -> anyhow::Result<()> {
    let options = args.to_options()?;
    let figures = sciplot::plot(&read_input(input)?, &options)?;
    info!("Rendered {} figure(s) from {}", figures.len(), input.display());

    match output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            for (key, figure) in figures.iter() {
                let path = dir.join(figure_file_name(key));
                std::fs::write(&path, serde_json::to_string_pretty(figure)?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{}", path.display());
            }
        }
        None => println!("{}", serde_json::to_string_pretty(&figures.to_json()?)?),
    }
    Ok(())
}

#[cfg(not(feature = "vegalite"))]
fn render(_input: &Path, _args: &PlotArgs, _output: Option<&Path>) -> anyhow::Result<()> {
    bail!("sciplot was built without the vegalite writer")
}

fn inspect(input: &Path, args: &PlotArgs) -> anyhow::Result<()> {
    let options = args.to_options()?;
    let inventory = Inventory::classify(&read_input(input)?)?;
    let groups = group_inventory(&inventory, &options)?;
    println!("{}", serde_json::to_string_pretty(&groups)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sciplot=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            input,
            plot,
            output,
        } => render(&input, &plot, output.as_deref()),
        Commands::Inspect { input, plot } => inspect(&input, &plot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "sciplot",
            "render",
            "data.json",
            "--projection",
            "2d",
            "--color",
            "red",
            "--color",
            "blue",
            "--bins",
            "tof=10",
            "--output",
            "out",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                input,
                plot,
                output,
            } => {
                assert_eq!(input, PathBuf::from("data.json"));
                assert_eq!(plot.projection.as_deref(), Some("2d"));
                assert_eq!(plot.color, vec!["red", "blue"]);
                assert_eq!(output, Some(PathBuf::from("out")));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_line_param_from_repeats() {
        assert_eq!(line_param::<f64>(vec![]), LineParam::Default);
        assert_eq!(line_param(vec![2.0]), LineParam::Fixed(2.0));
        assert_eq!(line_param(vec![1.0, 2.0]), LineParam::List(vec![1.0, 2.0]));
    }

    #[test]
    fn test_parse_bins() {
        let bins = parse_bins(&["tof=4".to_string(), "energy=0,1,2".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(bins["tof"], BinSpec::Count(4));
        assert_eq!(bins["energy"], BinSpec::Edges(vec![0.0, 1.0, 2.0]));
        assert!(parse_bins(&[]).unwrap().is_none());
        assert!(parse_bins(&["tof".to_string()]).is_err());
    }

    #[test]
    fn test_options_from_args() {
        let args = PlotArgs {
            axes: vec!["tof".to_string()],
            marker: vec!["s".to_string()],
            no_errorbars: true,
            log_color: true,
            no_cbar: true,
            ..Default::default()
        };
        let options = args.to_options().unwrap();
        assert_eq!(options.axes, Some(Axes::List(vec!["tof".to_string()])));
        assert_eq!(options.line.marker, LineParam::Fixed("s".to_string()));
        assert!(!options.errorbars);
        assert_eq!(options.colorbar.log, Some(true));
        assert_eq!(options.colorbar.cbar, Some(false));
        assert_eq!(options.colorbar.cmap, None);
    }

    #[test]
    fn test_figure_file_name() {
        assert_eq!(figure_file_name("tof.counts"), "tof.counts.vl.json");
        assert_eq!(figure_file_name("1/s.counts"), "1_s.counts.vl.json");
    }

    #[test]
    fn test_config_file_option() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.toml");
        std::fs::write(&path, "width = 640\n").unwrap();
        let args = PlotArgs {
            config: Some(path),
            ..Default::default()
        };
        assert_eq!(args.to_options().unwrap().config.width, 640);
    }

    #[cfg(feature = "vegalite")]
    #[test]
    fn test_render_writes_one_file_per_figure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        std::fs::write(
            &input,
            r#"{"dims": ["x"], "values": [1.0, 2.0, 3.0], "unit": "m"}"#,
        )
        .unwrap();
        let out = dir.path().join("figures");
        render(&input, &PlotArgs::default(), Some(out.as_path())).unwrap();

        let written = std::fs::read_to_string(out.join("x.m.vl.json")).unwrap();
        let figure: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(figure["title"], "x.m");
    }

    #[test]
    fn test_inspect_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(inspect(&missing, &PlotArgs::default()).is_err());
    }
}
