//! Tariff Game runner
//!
//! Plays the repeated tariff game between a home country and its trading
//! partners, once or as a Monte Carlo batch, and prints the report.
//!
//! Usage:
//!   tariff-sim run --rounds 10 --seed 42
//!   tariff-sim monte-carlo --runs 1000 --rounds 5 --metric partner-payoff:China
//!   tariff-sim scenario > game.json   # edit, then pass --config game.json

mod error;
mod logging;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rand::Rng;
use tariff_game::{
    run_monte_carlo, run_single, run_stream, Game, GameConfig, Metric, TariffBounds,
    TracingObserver,
};
use tracing::info;

use crate::error::{CliError, Result};

#[derive(Parser)]
#[command(name = "tariff-sim")]
#[command(about = "Simulate tariff decisions as a repeated Prisoner's Dilemma")]
struct Cli {
    /// Log at info level (TARIFF_SIM_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a single run and print per-partner results
    Run {
        #[command(flatten)]
        game: GameArgs,

        /// Narrate every round through the log (shown with -v)
        #[arg(long)]
        trace_rounds: bool,

        /// Write the run result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Play many independent runs and report distribution statistics
    MonteCarlo {
        #[command(flatten)]
        game: GameArgs,

        /// Number of independent runs
        #[arg(short = 'n', long, default_value = "1000")]
        runs: usize,

        /// Extra metric to summarize, e.g. `partner-tariff:China` or
        /// `home-defection-rate:EU` (repeatable)
        #[arg(short, long)]
        metric: Vec<Metric>,

        /// Write the summary as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write every run record as JSON Lines
        #[arg(long)]
        jsonl: Option<PathBuf>,
    },

    /// Print the built-in baseline configuration as JSON
    Scenario,
}

#[derive(Args)]
struct GameArgs {
    /// JSON game configuration (built-in baseline when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rounds per run
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Base random seed (drawn at random and printed when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Divisor applied to trade volumes before scaling payoffs
    #[arg(long)]
    normalization: Option<f64>,

    /// Lowest tariff rate in percent
    #[arg(long)]
    tariff_min: Option<f64>,

    /// Most likely tariff rate in percent
    #[arg(long)]
    tariff_mode: Option<f64>,

    /// Highest tariff rate in percent
    #[arg(long)]
    tariff_max: Option<f64>,
}

impl GameArgs {
    /// Load the configuration and apply command line overrides
    fn config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GameConfig::baseline(),
        };
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(normalization) = self.normalization {
            config.normalization = normalization;
        }
        let TariffBounds { min, mode, max } = config.tariff;
        config.tariff = TariffBounds {
            min: self.tariff_min.unwrap_or(min),
            mode: self.tariff_mode.unwrap_or(mode),
            max: self.tariff_max.unwrap_or(max),
        };
        Ok(config)
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::thread_rng().gen())
    }
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run { game: args, trace_rounds, json } => {
            let game = Game::new(&args.config()?)?;
            let seed = args.seed();
            info!(seed, "single run");

            // Same stream as run 0 of a Monte Carlo batch with this seed
            let result = if trace_rounds {
                game.run_observed(&mut run_stream(seed, 0), &mut TracingObserver)
            } else {
                run_single(&game, seed)
            };

            report::print_header(&game, seed);
            report::print_run(&result);
            if let Some(path) = json {
                report::write_run_json(&path, &result)?;
                println!("  Result saved to: {}\n", path.display());
            }
        }
        Command::MonteCarlo { game: args, runs, metric, json, jsonl } => {
            let game = Game::new(&args.config()?)?;
            let seed = args.seed();

            let sample = run_monte_carlo(&game, runs, seed)?;
            let summary = sample.summary();
            let extra = metric
                .into_iter()
                .map(|m| sample.stats(&m).map(|stats| (m, stats)))
                .collect::<tariff_game::Result<Vec<_>>>()?;

            report::print_header(&game, seed);
            report::print_monte_carlo(&summary, &extra);
            if let Some(path) = json {
                report::write_json(&path, &summary, &extra)?;
                println!("  Summary saved to: {}", path.display());
            }
            if let Some(path) = jsonl {
                report::write_jsonl(&path, &sample)?;
                println!("  Runs saved to: {}", path.display());
            }
        }
        Command::Scenario => {
            println!("{}", serde_json::to_string_pretty(&GameConfig::baseline())?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init_tracing(cli.verbose, cli.json_logs) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tariff-sim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_overrides_apply_to_baseline() {
        let cli = parse(&[
            "run", "--rounds", "7", "--normalization", "1", "--tariff-max", "60", "--seed", "3",
        ]);
        let Command::Run { game, .. } = cli.command else {
            panic!("expected run command");
        };
        let config = game.config().unwrap();
        assert_eq!(config.rounds, 7);
        assert_eq!(config.normalization, 1.0);
        assert_eq!(config.tariff, TariffBounds { min: 10.0, mode: 20.0, max: 60.0 });
        assert_eq!(game.seed(), 3);
    }

    #[test]
    fn test_monte_carlo_metrics_parse() {
        let cli = parse(&[
            "monte-carlo", "-n", "50", "-m", "home-payoff", "-m", "partner-tariff:China",
        ]);
        let Command::MonteCarlo { runs, metric, .. } = cli.command else {
            panic!("expected monte-carlo command");
        };
        assert_eq!(runs, 50);
        assert_eq!(
            metric,
            vec![Metric::HomeTotalPayoff, Metric::PartnerAverageTariff("China".into())]
        );
        assert!(Cli::try_parse_from(["tariff-sim", "monte-carlo", "-m", "welfare"]).is_err());
    }

    #[test]
    fn test_single_run_matches_first_monte_carlo_run() {
        let game = Game::new(&GameConfig::baseline().with_rounds(4)).unwrap();
        let traced = game.run_observed(&mut run_stream(17, 0), &mut TracingObserver);
        let sample = run_monte_carlo(&game, 2, 17).unwrap();
        assert_eq!(run_single(&game, 17), traced);
        assert_eq!(sample.runs[0].result, traced);
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config(Path::new("/nonexistent/game.json")).unwrap_err();
        assert!(matches!(err, CliError::ReadConfig { .. }));
    }

    #[test]
    fn test_bad_override_rejected_by_game() {
        let cli = parse(&["run", "--tariff-mode", "5"]);
        let Command::Run { game, .. } = cli.command else {
            panic!("expected run command");
        };
        let err = Game::new(&game.config().unwrap()).unwrap_err();
        assert!(matches!(err, tariff_game::GameError::InvalidTariffBounds { .. }));
    }
}
