//! ARENASIM CLI - step through an allocator, one snapshot per operation.

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use arenasim::{
    init_tracing, DisplayConfig, Domain, HarnessConfig, HarnessError, HarnessResult, Renderer,
    RunSummary, Runner, Scenario,
};
use arenasim_core::{StrategyKind, Word};
use clap::{Parser, Subcommand};

/// ARENASIM - watch allocation strategies place, split and coalesce blocks.
#[derive(Parser)]
#[command(name = "arenasim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Harness config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Terminal width in columns
    #[arg(short, long, global = true)]
    width: Option<usize>,

    /// Disable ANSI colours
    #[arg(long, global = true)]
    no_color: bool,

    /// Wait for ENTER between snapshots
    #[arg(short, long, global = true)]
    step: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file
    Run {
        /// Path to the scenario TOML file
        scenario: PathBuf,
    },

    /// Run the built-in walkthrough (all strategies if none given)
    Demo {
        /// linear, free-list or boundary-tag
        strategy: Option<StrategyKind>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> HarnessResult<()> {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if cli.width.is_some() {
        config.display.width = cli.width;
    }
    if cli.no_color {
        config.display.color = false;
    }
    if cli.step {
        config.display.step = true;
    }

    init_tracing(&config.logging, cli.verbose)?;

    let scenarios = match cli.command {
        Commands::Run { scenario } => vec![Scenario::load(&scenario)?],
        Commands::Demo { strategy: Some(kind) } => vec![Scenario::demo(kind)],
        Commands::Demo { strategy: None } => StrategyKind::ALL.map(Scenario::demo).to_vec(),
    };

    for scenario in &scenarios {
        let summary = match scenario.domain {
            Domain::U8 => play::<u8>(scenario, &config.display)?,
            Domain::U16 => play::<u16>(scenario, &config.display)?,
            Domain::U32 => play::<u32>(scenario, &config.display)?,
            Domain::U64 => play::<u64>(scenario, &config.display)?,
        };
        println!(
            "\n{} steps: {} allocations, {} releases\n",
            summary.steps, summary.allocations, summary.releases
        );
    }
    Ok(())
}

fn play<W: Word>(scenario: &Scenario, display: &DisplayConfig) -> HarnessResult<RunSummary> {
    let mut runner = Runner::<W>::new(scenario)?;
    let renderer = Renderer::new(display.resolved_width(), display.color);

    println!("Memory size: {}", scenario.capacity);
    println!("Allocator type: {}", runner.strategy().name());
    if display.step {
        println!("Press ENTER to print the next snapshot");
    }
    println!();

    runner.run(|report| {
        if display.step && report.index > 0 {
            wait_for_enter()?;
        }
        println!("{}", report.heading());
        print!("{}", renderer.render(&report.snapshot));
        Ok(())
    })
}

fn wait_for_enter() -> HarnessResult<()> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map(|_| ())
        .map_err(HarnessError::Terminal)
}
