use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use bin_grid_core::layout::{GridLayout, LayoutItem};
use bin_grid_core::{ExportFormat, GridConfig, Item, PackResult, pack, pack_sweep};
use clap::{ArgAction, Parser, Subcommand};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "bin-grid",
    about = "Pack cell-sized items onto a fixed-column grid",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack an item list and export the layout
    Pack(PackArgs),
    /// Pack once per column count and report grid heights
    Sweep(SweepArgs),
    /// Simple timing bench (packs N times, prints time + occupancy)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct GridArgs {
    /// Fixed column count (overrides --width)
    #[arg(short, long, help_heading = "Grid")]
    columns: Option<u32>,
    /// Container width in pixels; columns = width / (cell + gutter)
    #[arg(short, long, help_heading = "Grid")]
    width: Option<u32>,
    /// Cell size in pixels
    #[arg(long, default_value_t = 100, help_heading = "Grid")]
    cell_size: u32,
    /// Gutter between cells in pixels
    #[arg(long, default_value_t = 5, help_heading = "Grid")]
    gutter_size: u32,
    /// Report enclosed gaps as fillers (all output formats)
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Grid")]
    fillers: bool,
    /// YAML config file path (fields override the flags above)
    #[arg(long, help_heading = "Grid")]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Item list (JSON, or YAML by .yaml/.yml extension)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output file (stdout when omitted)
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    #[command(flatten)]
    grid: GridArgs,
    /// Output format: json | json-hash | pixels | ascii
    #[arg(long, default_value = "json", help_heading = "Export")]
    format: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct SweepArgs {
    /// Item list (JSON or YAML)
    input: PathBuf,
    /// First column count (defaults to the widest item)
    #[arg(long)]
    min_columns: Option<u32>,
    /// Last column count
    #[arg(long, default_value_t = 12)]
    max_columns: u32,
    /// Print JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Item list (JSON or YAML)
    input: PathBuf,
    /// Column count
    #[arg(short, long)]
    columns: u32,
    /// Number of packs to time
    #[arg(long, default_value_t = 100)]
    iterations: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Sweep(args) => run_sweep(args),
        Commands::Bench(b) => run_bench(b),
    }
}

/// One entry of an item file. `width`/`height` are accepted as aliases of `cols`/`rows`.
#[derive(Debug, Clone, Deserialize)]
struct ItemSpec {
    #[serde(alias = "name")]
    key: String,
    #[serde(alias = "width")]
    cols: u32,
    #[serde(alias = "height")]
    rows: u32,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemFile {
    List(Vec<ItemSpec>),
    Wrapped { items: Vec<ItemSpec> },
}

fn load_items(path: &Path) -> anyhow::Result<Vec<ItemSpec>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read items {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let file: ItemFile = if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("parse YAML {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse JSON {}", path.display()))?
    };
    let items = match file {
        ItemFile::List(v) => v,
        ItemFile::Wrapped { items } => items,
    };
    info!(count = items.len(), "loaded items");
    Ok(items)
}

fn visible_items(specs: &[ItemSpec]) -> Vec<Item<String>> {
    specs
        .iter()
        .filter(|s| !s.hidden)
        .map(|s| Item::new(s.key.clone(), s.cols, s.rows))
        .collect()
}

fn build_config(args: &GridArgs) -> anyhow::Result<GridConfig> {
    let cfg = GridConfig {
        cell_size: args.cell_size,
        gutter_size: args.gutter_size,
        columns: args.columns,
        container_width: args.width,
        fillers: args.fillers,
    };
    let cfg = if let Some(path) = &args.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_grid_config(cfg)
    } else {
        cfg
    };
    cfg.validate()?;
    Ok(cfg)
}

fn run_pack(cli: &PackArgs) -> anyhow::Result<()> {
    let mut cfg = build_config(&cli.grid)?;
    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }
    let format: ExportFormat = cli
        .format
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown format: {}", cli.format))?;

    let specs = load_items(&cli.input)?;
    let items = visible_items(&specs);
    let widest = items.iter().map(|it| it.width).max().unwrap_or(0);
    let columns = cfg.resolve_columns(widest)?;
    debug!(columns, widest, "resolved column count");

    let result = pack(items, columns)?;
    info!(summary = %result.stats().summary(), "packed");

    let rendered = match format {
        ExportFormat::Json | ExportFormat::JsonHash => {
            let mut value = if format == ExportFormat::Json {
                bin_grid_core::to_json(&result)
            } else {
                bin_grid_core::to_json_hash(&result)
            };
            if !cfg.fillers {
                bin_grid_core::drop_fillers(&mut value);
            }
            serde_json::to_string_pretty(&value)?
        }
        ExportFormat::Ascii => bin_grid_core::to_ascii_with(&result, cfg.fillers),
        ExportFormat::Pixels => {
            cfg.columns = Some(columns);
            let mut layout = GridLayout::new(cfg);
            layout.set_items(
                specs
                    .iter()
                    .map(|s| LayoutItem::new(s.key.clone(), s.cols, s.rows).hidden(s.hidden))
                    .collect(),
            );
            let out = layout.layout()?;
            serde_json::to_string_pretty(&bin_grid_core::layout_to_json(&out))?
        }
    };
    match &cli.out {
        Some(path) => {
            fs::write(path, &rendered).with_context(|| format!("write {}", path.display()))?;
            info!(?path, "layout written");
        }
        None => println!("{}", rendered.trim_end()),
    }

    if let Some(stats_path) = &cli.export_stats {
        write_stats(stats_path, &result)?;
    }
    Ok(())
}

fn write_stats(path: &Path, result: &PackResult) -> anyhow::Result<()> {
    let stats = result.stats();
    fs::write(path, serde_json::to_string_pretty(&stats)?)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn run_sweep(args: &SweepArgs) -> anyhow::Result<()> {
    let specs = load_items(&args.input)?;
    let items = visible_items(&specs);
    let widest = items.iter().map(|it| it.width).max().unwrap_or(1).max(1);
    let min = args.min_columns.unwrap_or(widest);
    anyhow::ensure!(
        min <= args.max_columns,
        "min columns {} exceeds max columns {}",
        min,
        args.max_columns
    );
    let entries = pack_sweep(&items, min..=args.max_columns)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    println!("{:>8} {:>8} {:>10} {:>8}", "columns", "rows", "occupancy", "fillers");
    for e in &entries {
        println!(
            "{:>8} {:>8} {:>9.2}% {:>8}",
            e.columns,
            e.grid_height,
            e.occupancy * 100.0,
            e.fillers
        );
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    let specs = load_items(&b.input)?;
    let items = visible_items(&specs);
    let iterations = b.iterations.max(1);
    let start = Instant::now();
    let mut last = None;
    for _ in 0..iterations {
        last = Some(pack(items.clone(), b.columns)?);
    }
    let dur = start.elapsed();
    let stats = last.map(|r| r.stats()).context("no pack ran")?;
    println!(
        "items={} rows={} occupancy={:.2}% time/pack={}",
        stats.num_items,
        stats.grid_height,
        stats.occupancy * 100.0,
        bench_fmt_dur(dur / iterations)
    );
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    cell_size: Option<u32>,
    gutter_size: Option<u32>,
    columns: Option<u32>,
    container_width: Option<u32>,
    fillers: Option<bool>,
}

impl YamlConfig {
    fn into_grid_config(self, mut cfg: GridConfig) -> GridConfig {
        if let Some(v) = self.cell_size {
            cfg.cell_size = v;
        }
        if let Some(v) = self.gutter_size {
            cfg.gutter_size = v;
        }
        if let Some(v) = self.columns {
            cfg.columns = Some(v);
        }
        if let Some(v) = self.container_width {
            cfg.container_width = Some(v);
        }
        if let Some(v) = self.fillers {
            cfg.fillers = v;
        }
        cfg
    }
}
