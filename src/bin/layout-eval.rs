use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "layout-eval", version)]
struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a generated design against a ground-truth design.
    Compare(CompareArgs),
    /// Score grid and sibling alignment of one design.
    Grid(SingleArgs),
    /// List the alignment groups of one design.
    Groups(SingleArgs),
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Ground-truth design JSON.
    #[arg(long)]
    gt: PathBuf,

    /// Generated design JSON.
    #[arg(long = "gen")]
    gen_path: PathBuf,

    /// Evaluation config JSON; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct SingleArgs {
    /// Design JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Evaluation config JSON; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Compare(args) => cmd_compare(args),
        Command::Grid(args) => cmd_grid(args),
        Command::Groups(args) => cmd_groups(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

fn read_document(path: &Path) -> anyhow::Result<layout_eval::DesignDocument> {
    let f = File::open(path).with_context(|| format!("open design '{}'", path.display()))?;
    let doc = layout_eval::DesignDocument::from_reader(BufReader::new(f))
        .with_context(|| format!("parse design '{}'", path.display()))?;
    Ok(doc)
}

fn read_config(path: Option<&Path>) -> anyhow::Result<layout_eval::EvalConfig> {
    let Some(path) = path else {
        return Ok(layout_eval::EvalConfig::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg = layout_eval::EvalConfig::from_reader(BufReader::new(f))
        .with_context(|| format!("parse config '{}'", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate config '{}'", path.display()))?;
    Ok(cfg)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .with_context(|| "serialize output JSON")?;
    println!("{out}");
    Ok(())
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let gt = read_document(&args.gt)?;
    let generated = read_document(&args.gen_path)?;
    let report = layout_eval::evaluate(&gt, &generated, &cfg).with_context(|| {
        format!(
            "evaluate '{}' against '{}'",
            args.gen_path.display(),
            args.gt.display()
        )
    })?;
    print_json(&report, args.pretty)
}

fn cmd_grid(args: SingleArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let doc = read_document(&args.in_path)?;
    let elements = layout_eval::flatten_forest(doc.roots(), &cfg.flatten);
    let report = layout_eval::analyze_grid(&elements, &cfg.grid);
    print_json(&report, args.pretty)
}

fn cmd_groups(args: SingleArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let doc = read_document(&args.in_path)?;
    let root = doc.root()?;
    let layout = layout_eval::flatten_normalized(root, &cfg.flatten)
        .with_context(|| format!("normalize '{}'", args.in_path.display()))?;
    let rects = layout_eval::matchable_rects(&layout.elements);
    let groups = layout_eval::detect_groups(&rects, &cfg.groups);
    print_json(&groups, args.pretty)
}
