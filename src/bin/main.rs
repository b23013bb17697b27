use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use dronegrid::{write_json, GridFileLoader, PartialConfig, SecondStep, Strategy, Vec2};

/// Greedy lookahead drones collecting regrowing value on a square grid.
///
/// Grid file format: first line N (grid size), then N lines of N integers (initial cell
/// values). `#` starts a comment.
#[derive(Parser, Debug)]
#[command(name = "dronegrid")]
#[command(version)]
struct Args {
    /// Grid file
    #[arg(long = "file", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Grid file, given positionally
    #[arg(value_name = "FILE", conflicts_with = "file")]
    positional_file: Option<PathBuf>,

    /// Total time steps, including the start cell at t=0
    #[arg(long)]
    steps: Option<u32>,

    /// Wall-clock budget in milliseconds
    #[arg(long = "time_ms")]
    time_ms: Option<u64>,

    #[arg(long = "start_x", allow_negative_numbers = true)]
    start_x: Option<i32>,

    #[arg(long = "start_y", allow_negative_numbers = true)]
    start_y: Option<i32>,

    /// Start position of an additional drone as X,Y (repeatable, replaces start_x/start_y)
    #[arg(long = "start", value_name = "X,Y", allow_hyphen_values = true)]
    #[arg(value_parser = parse_start)]
    starts: Vec<Vec2>,

    /// Fraction of a cell's base value that regrows per step, in [0.0, 1.0]
    #[arg(long = "regrowth_rate")]
    regrowth_rate: Option<f64>,

    /// Lookahead depth, 1 or 2
    #[arg(long)]
    horizon: Option<u8>,

    #[arg(long = "allow-stay", overrides_with = "no_stay")]
    allow_stay: bool,

    #[arg(long = "no-stay", overrides_with = "allow_stay")]
    no_stay: bool,

    /// How the 2-step horizon picks its second move
    #[arg(long = "second-step", value_enum)]
    second_step: Option<SecondStep>,

    /// TOML config file with the same keys as the flags; flags win
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn parse_start(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x = x.trim().parse().map_err(|_| format!("bad x in '{s}'"))?;
    let y = y.trim().parse().map_err(|_| format!("bad y in '{s}'"))?;
    Ok(Vec2::new(x, y))
}

impl Args {
    fn to_partial(&self) -> PartialConfig {
        let allow_stay = if self.no_stay {
            Some(false)
        } else if self.allow_stay {
            Some(true)
        } else {
            None
        };

        let starts = if self.starts.is_empty() {
            None
        } else {
            Some(self.starts.iter().map(|p| [p.x, p.y]).collect())
        };

        PartialConfig {
            file: self.file.clone().or_else(|| self.positional_file.clone()),
            steps: self.steps,
            time_ms: self.time_ms,
            start_x: self.start_x,
            start_y: self.start_y,
            starts,
            regrowth_rate: self.regrowth_rate,
            horizon: self.horizon,
            allow_stay,
            second_step: self.second_step,
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: Args) -> Result<()> {
    let from_file = match &args.config {
        Some(path) => PartialConfig::load(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?,
        None => PartialConfig::default(),
    };
    let cfg = from_file.overlay(args.to_partial()).resolve()?;

    info!(file = %cfg.file.display(), drones = cfg.starts.len(), "configured");

    let loader = GridFileLoader::new(cfg.file.clone(), cfg.regrowth_rate)?;
    let mut strategy = Strategy::greedy(Box::new(loader), cfg.starts.clone(), cfg.run.clone());

    strategy.load().context("failed to load grid")?;
    let result = strategy.run().context("algorithm failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, &result, !args.compact)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[fatal] {e:#}");
            ExitCode::FAILURE
        }
    }
}
