//! Monte Carlo runs
//!
//! Repeats a validated [`Game`] N times, each run on its own ChaCha stream
//! (`base_seed`, run index), and aggregates any scalar of the run results.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GameError, Result};
use crate::game::{Game, PartnerOutcome, RunResult};
use crate::random::run_stream;
use crate::stats::Stats;

/// One run of the sample, tagged with its index
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_index: u64,
    pub result: RunResult,
}

/// Ordered collection of independent runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSample {
    pub base_seed: u64,
    pub rounds: u32,
    pub runs: Vec<RunRecord>,
}

/// A scalar field of [`RunResult`]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    HomeTotalPayoff,
    HomeAverageTariff,
    HomeGdpImpact,
    /// Home payoff earned against one partner
    HomePayoffFrom(String),
    /// Average tariff home faced from one partner
    HomeTariffFrom(String),
    /// Home payoff from one partner as a share of home GDP
    HomeGdpImpactFrom(String),
    /// Share of rounds home defected against one partner
    HomeDefectionRate(String),
    /// The partner's own payoff
    PartnerPayoff(String),
    /// Average tariff the partner faced from home
    PartnerAverageTariff(String),
    PartnerGdpImpact(String),
    PartnerDefectionRate(String),
}

impl Metric {
    /// The metrics every report carries
    pub fn headline() -> [Metric; 3] {
        [
            Metric::HomeTotalPayoff,
            Metric::HomeAverageTariff,
            Metric::HomeGdpImpact,
        ]
    }

    pub fn partner(&self) -> Option<&str> {
        match self {
            Metric::HomePayoffFrom(p)
            | Metric::HomeTariffFrom(p)
            | Metric::HomeGdpImpactFrom(p)
            | Metric::HomeDefectionRate(p)
            | Metric::PartnerPayoff(p)
            | Metric::PartnerAverageTariff(p)
            | Metric::PartnerGdpImpact(p)
            | Metric::PartnerDefectionRate(p) => Some(p),
            Metric::HomeTotalPayoff | Metric::HomeAverageTariff | Metric::HomeGdpImpact => None,
        }
    }

    /// Value of this metric in one run; `None` when the partner is absent
    pub fn extract(&self, result: &RunResult) -> Option<f64> {
        let field: fn(&PartnerOutcome) -> f64 = match self {
            Metric::HomeTotalPayoff => return Some(result.home_total_payoff),
            Metric::HomeAverageTariff => return Some(result.home_average_tariff),
            Metric::HomeGdpImpact => return Some(result.home_gdp_impact_pct),
            Metric::HomePayoffFrom(_) => |o: &PartnerOutcome| o.home_payoff,
            Metric::HomeTariffFrom(_) => |o: &PartnerOutcome| o.home_average_tariff,
            Metric::HomeGdpImpactFrom(_) => |o: &PartnerOutcome| o.home_gdp_impact_pct,
            Metric::HomeDefectionRate(_) => |o: &PartnerOutcome| o.home_defection_rate,
            Metric::PartnerPayoff(_) => |o: &PartnerOutcome| o.partner_payoff,
            Metric::PartnerAverageTariff(_) => |o: &PartnerOutcome| o.partner_average_tariff,
            Metric::PartnerGdpImpact(_) => |o: &PartnerOutcome| o.partner_gdp_impact_pct,
            Metric::PartnerDefectionRate(_) => |o: &PartnerOutcome| o.partner_defection_rate,
        };
        result.partner(self.partner()?).map(field)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::HomeTotalPayoff => write!(f, "home-payoff"),
            Metric::HomeAverageTariff => write!(f, "home-tariff"),
            Metric::HomeGdpImpact => write!(f, "home-gdp-impact"),
            Metric::HomePayoffFrom(p) => write!(f, "home-payoff-from:{}", p),
            Metric::HomeTariffFrom(p) => write!(f, "home-tariff-from:{}", p),
            Metric::HomeGdpImpactFrom(p) => write!(f, "home-gdp-impact-from:{}", p),
            Metric::HomeDefectionRate(p) => write!(f, "home-defection-rate:{}", p),
            Metric::PartnerPayoff(p) => write!(f, "partner-payoff:{}", p),
            Metric::PartnerAverageTariff(p) => write!(f, "partner-tariff:{}", p),
            Metric::PartnerGdpImpact(p) => write!(f, "partner-gdp-impact:{}", p),
            Metric::PartnerDefectionRate(p) => write!(f, "partner-defection-rate:{}", p),
        }
    }
}

impl FromStr for Metric {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let unknown = || GameError::UnknownMetric(s.to_string());
        match s.split_once(':') {
            None => match s {
                "home-payoff" => Ok(Metric::HomeTotalPayoff),
                "home-tariff" => Ok(Metric::HomeAverageTariff),
                "home-gdp-impact" => Ok(Metric::HomeGdpImpact),
                _ => Err(unknown()),
            },
            Some((_, "")) => Err(unknown()),
            Some((kind, partner)) => {
                let partner = partner.to_string();
                match kind {
                    "home-payoff-from" => Ok(Metric::HomePayoffFrom(partner)),
                    "home-tariff-from" => Ok(Metric::HomeTariffFrom(partner)),
                    "home-gdp-impact-from" => Ok(Metric::HomeGdpImpactFrom(partner)),
                    "home-defection-rate" => Ok(Metric::HomeDefectionRate(partner)),
                    "partner-payoff" => Ok(Metric::PartnerPayoff(partner)),
                    "partner-tariff" => Ok(Metric::PartnerAverageTariff(partner)),
                    "partner-gdp-impact" => Ok(Metric::PartnerGdpImpact(partner)),
                    "partner-defection-rate" => Ok(Metric::PartnerDefectionRate(partner)),
                    _ => Err(unknown()),
                }
            }
        }
    }
}

/// Per-partner statistics across the sample
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartnerSummary {
    pub partner: String,
    pub home_payoff: Stats,
    pub partner_payoff: Stats,
    pub home_average_tariff: Stats,
    pub partner_gdp_impact_pct: Stats,
}

/// Headline statistics for a Monte Carlo sample
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub n_runs: usize,
    pub rounds: u32,
    pub base_seed: u64,
    pub home_total_payoff: Stats,
    pub home_average_tariff: Stats,
    pub home_gdp_impact_pct: Stats,
    pub partners: Vec<PartnerSummary>,
}

impl MonteCarloSample {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Metric value for every run, in run order
    pub fn values(&self, metric: &Metric) -> Result<Vec<f64>> {
        self.runs
            .iter()
            .map(|record| {
                metric.extract(&record.result).ok_or_else(|| {
                    GameError::UnknownPartner(metric.partner().unwrap_or_default().to_string())
                })
            })
            .collect()
    }

    pub fn stats(&self, metric: &Metric) -> Result<Stats> {
        Ok(Stats::from_samples(&self.values(metric)?))
    }

    pub fn summary(&self) -> MonteCarloSummary {
        let column = |f: fn(&RunResult) -> f64| -> Stats {
            Stats::from_samples(&self.runs.iter().map(|r| f(&r.result)).collect::<Vec<_>>())
        };

        let partner_ids: Vec<String> = self
            .runs
            .first()
            .map(|r| r.result.partners.iter().map(|p| p.partner.clone()).collect())
            .unwrap_or_default();

        let partners = partner_ids
            .into_iter()
            .map(|id| {
                let outcomes: Vec<&PartnerOutcome> = self
                    .runs
                    .iter()
                    .filter_map(|r| r.result.partner(&id))
                    .collect();
                let column = |f: fn(&PartnerOutcome) -> f64| -> Stats {
                    Stats::from_samples(&outcomes.iter().map(|o| f(o)).collect::<Vec<_>>())
                };
                PartnerSummary {
                    home_payoff: column(|o| o.home_payoff),
                    partner_payoff: column(|o| o.partner_payoff),
                    home_average_tariff: column(|o| o.home_average_tariff),
                    partner_gdp_impact_pct: column(|o| o.partner_gdp_impact_pct),
                    partner: id,
                }
            })
            .collect();

        MonteCarloSummary {
            n_runs: self.runs.len(),
            rounds: self.rounds,
            base_seed: self.base_seed,
            home_total_payoff: column(|r| r.home_total_payoff),
            home_average_tariff: column(|r| r.home_average_tariff),
            home_gdp_impact_pct: column(|r| r.home_gdp_impact_pct),
            partners,
        }
    }
}

fn play(game: &Game, base_seed: u64, run_index: u64) -> RunRecord {
    let mut rng = run_stream(base_seed, run_index);
    RunRecord {
        run_index,
        result: game.run(&mut rng),
    }
}

/// One run on stream 0 of `base_seed`, identical to run 0 of a Monte Carlo
/// batch started from the same seed
pub fn run_single(game: &Game, base_seed: u64) -> RunResult {
    play(game, base_seed, 0).result
}

/// Run `game` `n_runs` times
///
/// Run `i` always uses stream `i` of `base_seed`, so the sample is the same
/// whether runs execute sequentially or in parallel.
pub fn run_monte_carlo(game: &Game, n_runs: usize, base_seed: u64) -> Result<MonteCarloSample> {
    if n_runs < 1 {
        return Err(GameError::InvalidRuns(n_runs));
    }
    info!(n_runs, rounds = game.rounds(), base_seed, "starting Monte Carlo");

    #[cfg(feature = "parallel")]
    let runs: Vec<RunRecord> = (0..n_runs)
        .into_par_iter()
        .map(|i| play(game, base_seed, i as u64))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let runs: Vec<RunRecord> = (0..n_runs)
        .map(|i| play(game, base_seed, i as u64))
        .collect();

    info!(n_runs = runs.len(), "Monte Carlo finished");

    Ok(MonteCarloSample {
        base_seed,
        rounds: game.rounds(),
        runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn baseline_game(rounds: u32) -> Game {
        Game::new(&GameConfig::baseline().with_rounds(rounds)).unwrap()
    }

    #[test]
    fn test_run_count_and_order() {
        let sample = run_monte_carlo(&baseline_game(5), 40, 7).unwrap();
        assert_eq!(sample.len(), 40);
        for (i, record) in sample.runs.iter().enumerate() {
            assert_eq!(record.run_index, i as u64);
            assert_eq!(record.result.rounds, 5);
        }
    }

    #[test]
    fn test_runs_reproducible() {
        let game = baseline_game(5);
        let a = run_monte_carlo(&game, 20, 99).unwrap();
        let b = run_monte_carlo(&game, 20, 99).unwrap();
        assert_eq!(a, b);

        // A run is reproducible on its own from (seed, index)
        let single = play(&game, 99, 13);
        assert_eq!(single, a.runs[13]);
    }

    #[test]
    fn test_single_run_matches_first_batch_run() {
        let game = baseline_game(6);
        let sample = run_monte_carlo(&game, 3, 2024).unwrap();
        assert_eq!(run_single(&game, 2024), sample.runs[0].result);
        assert_eq!(game.run(&mut run_stream(2024, 0)), sample.runs[0].result);
        assert_ne!(run_single(&game, 2025), sample.runs[0].result);
    }

    #[test]
    fn test_runs_differ() {
        let sample = run_monte_carlo(&baseline_game(10), 10, 1).unwrap();
        let payoffs = sample.values(&Metric::HomeTotalPayoff).unwrap();
        assert!(payoffs.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_zero_runs_rejected() {
        assert_eq!(
            run_monte_carlo(&baseline_game(5), 0, 1).unwrap_err(),
            GameError::InvalidRuns(0)
        );
    }

    #[test]
    fn test_partner_metric_values() {
        let sample = run_monte_carlo(&baseline_game(5), 8, 3).unwrap();
        let fields: [(Metric, fn(&PartnerOutcome) -> f64); 8] = [
            (Metric::HomePayoffFrom("China".into()), |o: &PartnerOutcome| o.home_payoff),
            (Metric::HomeTariffFrom("China".into()), |o: &PartnerOutcome| o.home_average_tariff),
            (Metric::HomeGdpImpactFrom("China".into()), |o: &PartnerOutcome| o.home_gdp_impact_pct),
            (Metric::HomeDefectionRate("China".into()), |o: &PartnerOutcome| o.home_defection_rate),
            (Metric::PartnerPayoff("China".into()), |o: &PartnerOutcome| o.partner_payoff),
            (Metric::PartnerAverageTariff("China".into()), |o: &PartnerOutcome| o.partner_average_tariff),
            (Metric::PartnerGdpImpact("China".into()), |o: &PartnerOutcome| o.partner_gdp_impact_pct),
            (Metric::PartnerDefectionRate("China".into()), |o: &PartnerOutcome| o.partner_defection_rate),
        ];
        for (metric, field) in fields {
            let values = sample.values(&metric).unwrap();
            let expected: Vec<f64> = sample
                .runs
                .iter()
                .map(|r| field(r.result.partner("China").unwrap()))
                .collect();
            assert_eq!(values, expected, "{} reads the wrong field", metric);
        }
        assert_eq!(
            sample.values(&Metric::PartnerPayoff("Atlantis".into())).unwrap_err(),
            GameError::UnknownPartner("Atlantis".to_string())
        );
    }

    #[test]
    fn test_tariff_metrics_follow_direction() {
        let sample = run_monte_carlo(&baseline_game(5), 5, 11).unwrap();
        let faced_by_partner = sample.values(&Metric::PartnerAverageTariff("China".into())).unwrap();
        let faced_by_home = sample.values(&Metric::HomeTariffFrom("China".into())).unwrap();
        for ((partner, home), record) in faced_by_partner.iter().zip(&faced_by_home).zip(&sample.runs) {
            let china = record.result.partner("China").unwrap();
            assert_eq!(*partner, china.partner_average_tariff);
            assert_eq!(*home, china.home_average_tariff);
        }
    }

    #[test]
    fn test_summary_matches_stats() {
        let sample = run_monte_carlo(&baseline_game(5), 25, 5).unwrap();
        let summary = sample.summary();
        assert_eq!(summary.n_runs, 25);
        assert_eq!(summary.home_total_payoff, sample.stats(&Metric::HomeTotalPayoff).unwrap());
        assert_eq!(summary.home_gdp_impact_pct, sample.stats(&Metric::HomeGdpImpact).unwrap());
        assert_eq!(summary.partners.len(), 5);
        let china = summary.partners.iter().find(|p| p.partner == "China").unwrap();
        assert_eq!(
            china.partner_payoff,
            sample.stats(&Metric::PartnerPayoff("China".into())).unwrap()
        );
    }

    #[test]
    fn test_metric_parse() {
        for metric in [
            Metric::HomeTotalPayoff,
            Metric::HomeAverageTariff,
            Metric::HomeGdpImpact,
            Metric::HomePayoffFrom("EU".into()),
            Metric::HomeTariffFrom("China".into()),
            Metric::HomeGdpImpactFrom("Mexico".into()),
            Metric::HomeDefectionRate("Canada".into()),
            Metric::PartnerPayoff("Canada".into()),
            Metric::PartnerAverageTariff("China".into()),
            Metric::PartnerGdpImpact("Japan".into()),
            Metric::PartnerDefectionRate("EU".into()),
        ] {
            assert_eq!(metric.to_string().parse::<Metric>().unwrap(), metric);
        }
        assert!("partner-payoff:".parse::<Metric>().is_err());
        assert!("welfare".parse::<Metric>().is_err());
        assert!("bogus:Canada".parse::<Metric>().is_err());
        assert_eq!(
            "partner-tariff:China".parse::<Metric>().unwrap(),
            Metric::PartnerAverageTariff("China".into())
        );
        assert_eq!(
            "home-tariff-from:China".parse::<Metric>().unwrap(),
            Metric::HomeTariffFrom("China".into())
        );
    }
}
