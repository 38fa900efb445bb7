//! Report formatting and export for single runs and Monte Carlo batches

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tariff_game::{describe_strategy, Game, Metric, MonteCarloSample, MonteCarloSummary, RunResult, Stats};

use crate::error::{CliError, Result};

// ─── Single Run ─────────────────────────────────────────────────────────────

pub fn print_header(game: &Game, seed: u64) {
    let rules = game.rules();
    let bounds = rules.tariff.bounds();
    println!("\n  Tariff Game | home: {} | rounds: {} | seed: {}", game.home(), game.rounds(), seed);
    println!("  Home strategy:    {}", describe_strategy(&rules.home_strategy));
    println!("  Partner strategy: {}", describe_strategy(&rules.partner_strategy));
    println!(
        "  Tariff draw: triangular(min {:.1}%, mode {:.1}%, max {:.1}%)\n",
        bounds.min, bounds.mode, bounds.max
    );
}

pub fn print_run(result: &RunResult) {
    println!(
        "  {:<12} {:>12} {:>12} {:>10} {:>10} {:>11} {:>11}",
        "Partner", "HomePayoff", "PartnerPay", "HomeTar%", "PartTar%", "HomeGDP%", "PartGDP%"
    );
    println!("  {}", "-".repeat(84));
    for p in &result.partners {
        println!(
            "  {:<12} {:>12.2} {:>12.2} {:>10.2} {:>10.2} {:>11.5} {:>11.5}",
            p.partner,
            p.home_payoff,
            p.partner_payoff,
            p.home_average_tariff,
            p.partner_average_tariff,
            p.home_gdp_impact_pct,
            p.partner_gdp_impact_pct,
        );
    }
    println!("  {}", "-".repeat(84));
    println!("  Total home payoff:      {:.2}", result.home_total_payoff);
    println!("  Home GDP impact:        {:.5}%", result.home_gdp_impact_pct);
    println!("  Average tariff faced:   {:.2}%\n", result.home_average_tariff);
}

// ─── Monte Carlo ────────────────────────────────────────────────────────────

fn stats_row(label: &str, stats: &Stats) {
    println!(
        "  {:<30} {:>11.4} {:>10.4} {:>11.4} {:>11.4} {:>11.4} {:>11.4}",
        label, stats.mean, stats.std_dev, stats.p05, stats.median, stats.p95, stats.ci_half_width()
    );
}

pub fn print_monte_carlo(summary: &MonteCarloSummary, extra: &[(Metric, Stats)]) {
    println!(
        "  Monte Carlo: {} runs x {} rounds | base seed {}\n",
        summary.n_runs, summary.rounds, summary.base_seed
    );
    println!(
        "  {:<30} {:>11} {:>10} {:>11} {:>11} {:>11} {:>11}",
        "Metric", "Mean", "StdDev", "P5", "Median", "P95", "±CI95"
    );
    println!("  {}", "-".repeat(102));
    stats_row("Total home payoff", &summary.home_total_payoff);
    stats_row("Home avg tariff faced (%)", &summary.home_average_tariff);
    stats_row("Home GDP impact (%)", &summary.home_gdp_impact_pct);
    for p in &summary.partners {
        stats_row(&format!("Home payoff from {}", p.partner), &p.home_payoff);
        stats_row(&format!("{} payoff", p.partner), &p.partner_payoff);
    }
    for (metric, stats) in extra {
        stats_row(&metric.to_string(), stats);
    }
    println!();
}

// ─── Export ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MonteCarloReport<'a> {
    summary: &'a MonteCarloSummary,
    metrics: Vec<MetricStats<'a>>,
}

#[derive(Serialize)]
struct MetricStats<'a> {
    metric: String,
    stats: &'a Stats,
}

fn create(path: &Path) -> Result<std::fs::File> {
    let wrap = |source| CliError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    std::fs::File::create(path).map_err(wrap)
}

/// Summary plus requested metric statistics as pretty JSON
pub fn write_json(path: &Path, summary: &MonteCarloSummary, extra: &[(Metric, Stats)]) -> Result<()> {
    let report = MonteCarloReport {
        summary,
        metrics: extra
            .iter()
            .map(|(metric, stats)| MetricStats {
                metric: metric.to_string(),
                stats,
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    let mut file = create(path)?;
    writeln!(file, "{}", json).map_err(|source| CliError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// One run record per line
pub fn write_jsonl(path: &Path, sample: &MonteCarloSample) -> Result<()> {
    let mut file = create(path)?;
    for record in &sample.runs {
        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line).map_err(|source| CliError::WriteOutput {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Single run result as pretty JSON
pub fn write_run_json(path: &Path, result: &RunResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    let mut file = create(path)?;
    writeln!(file, "{}", json).map_err(|source| CliError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}
