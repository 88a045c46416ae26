use anyhow::{Context, Result, anyhow, bail};
use cbp_rs::pairs::{PairRequest, describe_defaults, resolve_pairs};
use cbp_rs::save::{DeleteOutcome, allocate_and_record, delete_save_dir};
use cbp_rs::stats::GroupBy;
use cbp_rs::storage::load_dataset;
use cbp_rs::viz::{
    Distribution, FigureSpec, Highlight, LegendLocation, Means, render_distributions,
    render_figure,
};
use cbp_rs::{Config, Dataset, Layout, PlotKind, prompt, stats};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "cbp.json";

#[derive(Parser, Debug)]
#[command(
    name = "cbp",
    version,
    about = "Plot, compare & save primate cerebellum/cerebrum scatter plots"
)]
struct Cli {
    /// JSON config file (defaults, colors, data path, save root).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Measurement CSV; overrides the config's data path.
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw scatter plots of column pairs.
    Plot(PlotArgs),
    /// Print species, data point, and family counts; optionally box plots.
    Describe(DescribeArgs),
    /// Show (or change) the default column indices.
    Defaults(DefaultsArgs),
    /// Delete a save folder and everything in it.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Column indices (e.g. 4 3 1) or X:Y name pairs. Omit for the defaults.
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    xy: Vec<String>,
    /// Plot natural-log values.
    #[arg(long)]
    logged: bool,
    /// Recolor a family, FAMILY=COLOR (hex or color name). Repeatable.
    #[arg(long)]
    color: Vec<String>,
    /// Figure size in inches, W,H.
    #[arg(long)]
    figsize: Option<String>,
    /// Subplot grid, ROWS,COLS.
    #[arg(long)]
    grid: Option<String>,
    /// Figure title.
    #[arg(long)]
    title: Option<String>,
    /// Marker: o, s, ^, D, + or x.
    #[arg(long, default_value = "o")]
    marker: String,
    /// Marker edge color.
    #[arg(long, default_value = "k")]
    edgecolor: String,
    /// Legend location inside each subplot (e.g. "upper left").
    #[arg(long, default_value = "upper left")]
    legend_loc: String,
    /// Plot per-species means.
    #[arg(long, conflicts_with = "family_means")]
    species_means: bool,
    /// Plot per-family means.
    #[arg(long)]
    family_means: bool,
    /// Draw the means over the raw points instead of replacing them.
    #[arg(long)]
    overlay: bool,
    /// Species (Homo_sapiens) or family (Hominidae) to emphasize.
    #[arg(long)]
    emphasize: Option<String>,
    /// Color of the emphasized points.
    #[arg(long, requires = "emphasize")]
    emph_color: Option<String>,
    /// Keep other points at full opacity when emphasizing.
    #[arg(long, requires = "emphasize")]
    no_highlight: bool,
    /// Point arrows at the emphasized points.
    #[arg(long, requires = "emphasize")]
    arrows: bool,
    /// Legend label `Homo sapiens` instead of `H. sapiens`.
    #[arg(long, requires = "emphasize")]
    common_name: bool,
    /// Write the figure to this path (.svg or .png).
    #[arg(long, conflicts_with = "save")]
    out: Option<PathBuf>,
    /// Save into the next free numbered slot of the save folder.
    #[arg(long)]
    save: bool,
    /// Do not ask before saving.
    #[arg(long, short)]
    yes: bool,
}

#[derive(Args, Debug)]
struct DescribeArgs {
    /// Also print per-column statistics.
    #[arg(long)]
    summary: bool,
    /// Box plots of the surface-area columns.
    #[arg(long, requires = "out")]
    surface_area_boxplot: bool,
    /// Box plots of the volume columns.
    #[arg(long, requires = "out")]
    volume_boxplot: bool,
    /// Write the box plots to this path (.svg or .png).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DefaultsArgs {
    /// New default column indices, written to the config file.
    #[arg(long, num_args = 1.., allow_negative_numbers = true, conflicts_with = "reset")]
    set: Vec<i64>,
    /// Restore the original defaults and colors in the config file.
    #[arg(long)]
    reset: bool,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    /// Delete the log plot folder instead of the simple one.
    #[arg(long)]
    logged: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_two<T: std::str::FromStr>(s: &str, what: &str) -> Result<(T, T)> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("invalid --{what} '{s}', expected two comma-separated values"))?;
    match (a.trim().parse(), b.trim().parse()) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        _ => bail!("invalid --{what} '{s}', expected two comma-separated numbers"),
    }
}

fn parse_color(s: &str) -> Result<(String, String)> {
    let (family, color) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid --color '{s}', expected FAMILY=COLOR"))?;
    Ok((family.trim().to_string(), color.trim().to_string()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config_path = cli.config.clone();
    let mut config = match &config_path {
        Some(p) => Config::from_file(p)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::from_file(DEFAULT_CONFIG)?,
        None => Config::default(),
    };
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    match cli.cmd {
        Command::Delete(args) => cmd_delete(&config, args),
        Command::Plot(args) => cmd_plot(&config, &load(&config)?, args),
        Command::Describe(args) => cmd_describe(&load(&config)?, args),
        Command::Defaults(args) => cmd_defaults(
            &mut config,
            config_path.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG)),
            args,
        ),
    }
}

fn load(config: &Config) -> Result<Dataset> {
    load_dataset(&config.data_path, &config.load_options())
        .context("could not load the measurement data")
}

fn cmd_plot(config: &Config, ds: &Dataset, args: PlotArgs) -> Result<()> {
    let kind = if args.logged {
        PlotKind::Logged
    } else {
        PlotKind::Simple
    };
    let schema = ds.schema();
    let request = PairRequest::parse(args.xy.as_slice())?;
    let res = resolve_pairs(&request, &schema, &config.default_indices)?;
    let is_default = match request {
        PairRequest::Default => true,
        _ => resolve_pairs(&PairRequest::Default, &schema, &config.default_indices)
            .is_ok_and(|defaults| defaults.pairs == res.pairs),
    };

    let overrides = args
        .color
        .iter()
        .map(|c| parse_color(c))
        .collect::<Result<Vec<_>>>()?;
    let colors = config.color_map()?.with_overrides(&overrides)?;

    let figsize = args
        .figsize
        .as_deref()
        .map(|s| parse_two::<f64>(s, "figsize"))
        .transpose()?;
    let grid = args
        .grid
        .as_deref()
        .map(|s| parse_two::<usize>(s, "grid"))
        .transpose()?;

    let mut spec = FigureSpec::new(res.pairs.clone(), kind, colors);
    spec.layout = Layout::custom(figsize, grid, res.pairs.len())?;
    spec.title = args.title;
    spec.marker = args.marker.parse().map_err(|e: String| anyhow!(e))?;
    spec.edgecolor = args.edgecolor;
    spec.legend_loc = args
        .legend_loc
        .parse::<LegendLocation>()
        .map_err(|e| anyhow!(e))?;
    let by = if args.species_means {
        Some(GroupBy::Species)
    } else if args.family_means {
        Some(GroupBy::Family)
    } else {
        None
    };
    if args.overlay && by.is_none() {
        bail!("--overlay needs --species-means or --family-means");
    }
    spec.means = by.map(|by| Means {
        by,
        overlay: args.overlay,
    });
    spec.highlight = args.emphasize.as_ref().map(|target| Highlight {
        with_highlight: !args.no_highlight,
        color: args.emph_color.clone(),
        with_arrows: args.arrows,
        scientific_name: !args.common_name,
        ..Highlight::new(target.as_str())
    });

    if let Some(out) = args.out.as_ref() {
        render_figure(ds, &spec, out)?;
        eprintln!("Wrote plot to {}", out.display());
        return Ok(());
    }
    if !args.save {
        bail!("nothing to write: pass --out FILE or --save");
    }

    if !args.yes {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        if !prompt::confirm(&mut input, &mut output, "Would you like to save the plot?")? {
            println!("Plot not saved.");
            return Ok(());
        }
    }
    let target_dir = config.save_root.join(kind.dir_name());
    let saved = allocate_and_record(
        kind,
        &res.pairs,
        is_default,
        &target_dir,
        args.emphasize.as_deref(),
        |path| render_figure(ds, &spec, path),
    )?;
    println!("Saved plot to {}", saved.path.display());
    Ok(())
}

fn cmd_describe(ds: &Dataset, args: DescribeArgs) -> Result<()> {
    let d = stats::describe(ds);
    println!("Unique species: {}", d.unique_species);
    println!("Data points: {}", d.data_points);
    println!("Unique families: {}", d.unique_families);

    if args.summary {
        for s in stats::column_summaries(ds) {
            println!(
                "{}  count={} missing={}  min={} max={} mean={} median={}",
                s.column,
                s.count,
                s.missing,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }

    let mut kinds = Vec::new();
    if args.surface_area_boxplot {
        kinds.push(Distribution::SurfaceArea);
    }
    if args.volume_boxplot {
        kinds.push(Distribution::Volume);
    }
    match (kinds.is_empty(), args.out.as_ref()) {
        (false, Some(out)) => {
            render_distributions(ds, &kinds, out)?;
            eprintln!("Wrote box plots to {}", out.display());
        }
        (false, None) => bail!("box plots need --out FILE"),
        (true, Some(_)) => bail!("--out needs --surface-area-boxplot or --volume-boxplot"),
        (true, None) => {}
    }
    Ok(())
}

fn cmd_defaults(config: &mut Config, config_path: &Path, args: DefaultsArgs) -> Result<()> {
    let changed = if args.reset {
        config.reset_defaults();
        true
    } else if !args.set.is_empty() {
        config.set_default_indices(&args.set)?;
        true
    } else {
        false
    };
    if changed {
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(config_path, json)
            .with_context(|| format!("could not write {}", config_path.display()))?;
        eprintln!("Updated {}", config_path.display());
    }

    match load_dataset(&config.data_path, &config.load_options()) {
        Ok(ds) => println!("{}", describe_defaults(&ds.schema(), &config.default_indices)),
        Err(e) => {
            log::warn!("{e}");
            println!(
                "Current default variable combinations are {:?}",
                config.default_indices
            );
        }
    }
    Ok(())
}

fn cmd_delete(config: &Config, args: DeleteArgs) -> Result<()> {
    let kind = if args.logged {
        PlotKind::Logged
    } else {
        PlotKind::Simple
    };
    match delete_save_dir(&config.save_root, kind)? {
        DeleteOutcome::Deleted(dir) => println!("Deleted '{}'", dir.display()),
        DeleteOutcome::Missing(msg) => println!("{msg}"),
    }
    Ok(())
}
