use std::path::PathBuf;

use anyhow::Context as _;
use brickfall_engine::{Difficulty, EngineConfig, ShapeSeed};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use crate::util::{self, RecordWriter};

use self::{script::ScriptArg, simulate::SimulateArg};

mod script;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v = INFO, -vv = DEBUG, -vvv = TRACE); logs go to stderr
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a headless game with a random input policy and record the result
    Simulate(#[clap(flatten)] SimulateArg),
    /// Replay a command script against a fixed shape sequence
    Script(#[clap(flatten)] ScriptArg),
}

/// Engine settings shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct EngineArg {
    /// JSON engine configuration file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Difficulty tier (easy, medium or hard)
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// 32-character hex seed for the shape generator
    #[arg(long)]
    seed: Option<ShapeSeed>,
    /// Minimum milliseconds between accepted horizontal moves
    #[arg(long)]
    move_repeat_ms: Option<u64>,
}

impl EngineArg {
    pub fn load_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<EngineConfig, _>("engine config", path)?,
            None => EngineConfig::default(),
        };
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(ms) = self.move_repeat_ms {
            config.move_repeat_delay = std::time::Duration::from_millis(ms);
        }
        config.validate().context("Invalid engine configuration")?;
        tracing::debug!(?config, "engine configuration loaded");
        Ok(config)
    }
}

/// Where the JSON record of a run goes.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArg {
    /// Write the JSON record here instead of standard output (`-` is standard output)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write the record on a single line instead of pretty-printing it
    #[arg(long)]
    compact: bool,
}

impl OutputArg {
    pub fn write_record<T>(&self, record: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        RecordWriter::open(self.output.as_deref(), !self.compact)?.write_record(record)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(level)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Script(arg) => script::run(&arg)?,
    }
    Ok(())
}
