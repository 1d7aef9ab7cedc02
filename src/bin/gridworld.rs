//! Command line front end: collects the grid world from arguments, a TOML
//! file or interactive prompts, solves it and prints the report.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, LevelPadding, TermLogger, TerminalMode};

use gridworld_mdp::mdp::MIN_TERMINALS;
use gridworld_mdp::{Coord, Drift, GridWorld, GridWorldConfig, TerminalSpec};

/// Markov Decision Process over a grid world.
#[derive(Parser, Debug)]
#[clap(name = "gridworld", version, allow_negative_numbers = true)]
struct Args {
    /// Number of rows.
    #[clap(value_parser, required_unless_present = "config")]
    rows: Option<usize>,
    /// Number of columns.
    #[clap(value_parser, required_unless_present = "config")]
    cols: Option<usize>,
    /// Standard reward.
    #[clap(value_parser, required_unless_present = "config")]
    reward: Option<f64>,
    /// Gamma.
    #[clap(value_parser, required_unless_present = "config")]
    gamma: Option<f64>,
    /// Probability of forward.
    #[clap(value_parser, required_unless_present = "config")]
    forward: Option<f64>,
    /// Probability of left.
    #[clap(value_parser, required_unless_present = "config")]
    left: Option<f64>,
    /// Probability of right.
    #[clap(value_parser, required_unless_present = "config")]
    right: Option<f64>,

    /// Read the grid world from a TOML file instead of positional arguments.
    #[clap(long, value_parser, conflicts_with_all = &["rows", "cols", "reward", "gamma", "forward", "left", "right"])]
    config: Option<PathBuf>,

    /// Terminal cell as `r,c,val`. Repeatable.
    #[clap(long = "terminal", value_parser)]
    terminals: Vec<TerminalSpec>,

    /// Obstacle cell as `r,c`. Repeatable.
    #[clap(long = "obstacle", value_parser)]
    obstacles: Vec<Coord>,

    /// Give up after this many sweeps.
    #[clap(long, value_parser)]
    max_sweeps: Option<usize>,

    /// More output per occurrence.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_log(args.verbose);

    let mut config = build_config(&args)?;

    if config.terminals.len() < MIN_TERMINALS {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        collect_terminals(&mut config, &mut input, &mut output)?;
        collect_obstacles(&mut config, &mut input, &mut output)?;
    }

    let mut world = GridWorld::new(config).context("invalid grid world")?;
    let solution = world.solve()?;

    println!();
    println!("Number of iterations: {}", solution.sweeps);
    println!();
    print!("{}", solution);

    Ok(())
}

fn init_log(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let config = ConfigBuilder::default()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_level_padding(LevelPadding::Right)
        .build();

    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

fn build_config(args: &Args) -> Result<GridWorldConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            GridWorldConfig::from_toml_str(&source)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => {
            let (Some(rows), Some(cols), Some(reward), Some(gamma), Some(forward), Some(left), Some(right)) = (
                args.rows,
                args.cols,
                args.reward,
                args.gamma,
                args.forward,
                args.left,
                args.right,
            ) else {
                bail!("rows, cols, reward, gamma, forward, left and right are required without --config");
            };
            GridWorldConfig::new(rows, cols, reward, gamma, Drift::new(forward, left, right))
        }
    };

    config.terminals.extend(args.terminals.iter().copied());
    config.obstacles.extend(args.obstacles.iter().copied());
    if args.max_sweeps.is_some() {
        config.max_sweeps = args.max_sweeps;
    }

    debug!("Configuration: {:?}", config);
    Ok(config)
}

fn read_entry(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompts for `r,c,val` lines until `fin`, re-prompting on bad entries and
/// refusing to finish with fewer than two terminals.
fn collect_terminals(
    config: &mut GridWorldConfig,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<()> {
    loop {
        writeln!(output, "Enter r,c,val, or enter 'fin' when done")?;
        let Some(line) = read_entry(input)? else {
            bail!("input ended before {} terminal cells were entered", MIN_TERMINALS);
        };

        if line == "fin" {
            if config.terminals.len() < MIN_TERMINALS {
                writeln!(output, "\nYou need at least two terminal cells\n")?;
                continue;
            }
            return Ok(());
        }

        let entry = line
            .parse::<TerminalSpec>()
            .and_then(|terminal| config.check_new_terminal(&terminal).map(|_| terminal));
        match entry {
            Ok(terminal) => config.terminals.push(terminal),
            Err(e) => {
                debug!("Rejected terminal entry `{}`", line);
                writeln!(output, "\n{}\n", e)?;
            }
        }
    }
}

/// Prompts for `r,c` obstacle lines until `fin` or end of input.
fn collect_obstacles(
    config: &mut GridWorldConfig,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<()> {
    loop {
        writeln!(output, "Enter r,c for an obstacle, or enter 'fin' when done")?;
        let Some(line) = read_entry(input)? else {
            return Ok(());
        };

        if line == "fin" {
            return Ok(());
        }

        let entry = line
            .parse::<Coord>()
            .and_then(|coord| config.check_new_obstacle(coord).map(|_| coord));
        match entry {
            Ok(coord) => config.obstacles.push(coord),
            Err(e) => {
                debug!("Rejected obstacle entry `{}`", line);
                writeln!(output, "\n{}\n", e)?;
            }
        }
    }
}
