//! Game execution engine

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GameConfig, TradeRecord};
use crate::error::{GameError, Result};
use crate::observer::{NoopObserver, RoundObserver};
use crate::payoff_pair;
use crate::random::partner_stream;
use crate::strategy::{choose_move, Move, Strategy};
use crate::tariff::TariffSampler;

/// Running state of one home/partner relationship during a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartnerState {
    pub previous_home_move: Move,
    pub previous_partner_move: Move,
    pub cumulative_home_payoff: f64,
    pub cumulative_partner_payoff: f64,
    /// Sum of tariff rates home faced (imposed by the partner)
    pub cumulative_home_tariff: f64,
    /// Sum of tariff rates the partner faced (imposed by home)
    pub cumulative_partner_tariff: f64,
    pub rounds_played: u32,
    pub home_defections: u32,
    pub partner_defections: u32,
}

impl PartnerState {
    /// Both sides start as if the other had cooperated
    pub fn new() -> Self {
        Self {
            previous_home_move: Move::Cooperate,
            previous_partner_move: Move::Cooperate,
            cumulative_home_payoff: 0.0,
            cumulative_partner_payoff: 0.0,
            cumulative_home_tariff: 0.0,
            cumulative_partner_tariff: 0.0,
            rounds_played: 0,
            home_defections: 0,
            partner_defections: 0,
        }
    }

    fn record(&mut self, outcome: &RoundOutcome) {
        self.previous_home_move = outcome.home_move;
        self.previous_partner_move = outcome.partner_move;
        self.cumulative_home_payoff += outcome.home_payoff;
        self.cumulative_partner_payoff += outcome.partner_payoff;
        self.cumulative_home_tariff += outcome.home_tariff;
        self.cumulative_partner_tariff += outcome.partner_tariff;
        self.rounds_played += 1;
        self.home_defections += outcome.home_move.is_defect() as u32;
        self.partner_defections += outcome.partner_move.is_defect() as u32;
    }
}

impl Default for PartnerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a single round against one partner
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// 1-based round number
    pub round: u32,
    pub home_move: Move,
    pub partner_move: Move,
    pub home_payoff: f64,
    pub partner_payoff: f64,
    pub home_tariff: f64,
    pub partner_tariff: f64,
}

/// Everything a round needs besides the partner's state and trade volume
#[derive(Clone, Debug)]
pub struct RoundRules {
    pub home_strategy: Strategy,
    pub partner_strategy: Strategy,
    pub tariff: TariffSampler,
}

/// Play one round against one partner and fold it into `state`
///
/// Moves are simultaneous: each side reacts to the other's previous move.
/// Draw order is home move, partner move, home tariff, partner tariff.
pub fn simulate_round<R: Rng + ?Sized>(
    state: &mut PartnerState,
    rules: &RoundRules,
    trade_volume: f64,
    rng: &mut R,
) -> RoundOutcome {
    let home_move = choose_move(&rules.home_strategy, state.previous_partner_move, rng);
    let partner_move = choose_move(&rules.partner_strategy, state.previous_home_move, rng);

    let home_tariff = rules.tariff.faced(partner_move, rng);
    let partner_tariff = rules.tariff.faced(home_move, rng);

    let (home_payoff, partner_payoff) = payoff_pair(home_move, partner_move, trade_volume);

    let outcome = RoundOutcome {
        round: state.rounds_played + 1,
        home_move,
        partner_move,
        home_payoff,
        partner_payoff,
        home_tariff,
        partner_tariff,
    };
    state.record(&outcome);
    outcome
}

/// Per-partner totals at the end of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartnerOutcome {
    pub partner: String,
    pub home_payoff: f64,
    pub partner_payoff: f64,
    /// Average tariff rate home faced from this partner, per round
    pub home_average_tariff: f64,
    /// Average tariff rate this partner faced from home, per round
    pub partner_average_tariff: f64,
    /// Home payoff from this partner as a percentage of home GDP
    pub home_gdp_impact_pct: f64,
    /// Partner payoff as a percentage of partner GDP
    pub partner_gdp_impact_pct: f64,
    pub home_defection_rate: f64,
    pub partner_defection_rate: f64,
}

/// Result of a complete run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub home: String,
    pub rounds: u32,
    pub home_total_payoff: f64,
    /// Unweighted mean of the per-partner `home_average_tariff`
    pub home_average_tariff: f64,
    pub home_gdp_impact_pct: f64,
    pub partners: Vec<PartnerOutcome>,
}

impl RunResult {
    pub fn partner(&self, partner: &str) -> Option<&PartnerOutcome> {
        self.partners.iter().find(|p| p.partner == partner)
    }
}

/// Payoff as a percentage of GDP
pub fn gdp_impact_pct(payoff: f64, gdp: f64) -> f64 {
    payoff / gdp * 100.0
}

#[derive(Clone, Debug)]
struct PartnerEntry {
    id: String,
    trade: TradeRecord,
    gdp: f64,
    volume: f64,
}

/// A validated game, ready to run any number of times
#[derive(Clone, Debug)]
pub struct Game {
    home: String,
    home_gdp: f64,
    rounds: u32,
    rules: RoundRules,
    partners: Vec<PartnerEntry>,
}

impl Game {
    /// Validate `config`; every lookup and bound is checked here so a run
    /// can never fail halfway
    pub fn new(config: &GameConfig) -> Result<Self> {
        if config.rounds < 1 {
            return Err(GameError::InvalidRounds(config.rounds));
        }
        if !(config.normalization > 0.0 && config.normalization.is_finite()) {
            return Err(GameError::InvalidNormalization(config.normalization));
        }
        let tariff = TariffSampler::new(config.tariff)?;
        config.home_strategy.validate()?;
        config.partner_strategy.validate()?;

        let home_gdp = lookup_gdp(config, &config.home)?;

        let ids = config.partner_ids();
        if ids.is_empty() {
            return Err(GameError::NoPartners);
        }

        let mut partners: Vec<PartnerEntry> = Vec::with_capacity(ids.len());
        for id in ids {
            if id == config.home {
                return Err(GameError::HomeAsPartner(id));
            }
            if partners.iter().any(|p| p.id == id) {
                return Err(GameError::DuplicatePartner(id));
            }
            let trade = *config
                .trade
                .get(&id)
                .ok_or_else(|| GameError::MissingTrade(id.clone()))?;
            check_volume(&id, "exports", trade.exports)?;
            check_volume(&id, "imports", trade.imports)?;
            let gdp = lookup_gdp(config, &id)?;

            partners.push(PartnerEntry {
                volume: trade.imports / config.normalization,
                id,
                trade,
                gdp,
            });
        }

        debug!(
            home = %config.home,
            partners = partners.len(),
            rounds = config.rounds,
            "game configuration validated"
        );

        Ok(Self {
            home: config.home.clone(),
            home_gdp,
            rounds: config.rounds,
            rules: RoundRules {
                home_strategy: config.home_strategy,
                partner_strategy: config.partner_strategy,
                tariff,
            },
            partners,
        })
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn rules(&self) -> &RoundRules {
        &self.rules
    }

    pub fn partners(&self) -> impl Iterator<Item = &str> + '_ {
        self.partners.iter().map(|p| p.id.as_str())
    }

    pub fn trade(&self, partner: &str) -> Option<&TradeRecord> {
        self.partners.iter().find(|p| p.id == partner).map(|p| &p.trade)
    }

    /// Run the game silently
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> RunResult {
        self.run_observed(rng, &mut NoopObserver)
    }

    /// Run the game, reporting every round to `observer`
    ///
    /// One seed is drawn from `rng`; each partner then plays from its own
    /// stream, so partner order never changes per-partner results.
    pub fn run_observed<R, O>(&self, rng: &mut R, observer: &mut O) -> RunResult
    where
        R: Rng + ?Sized,
        O: RoundObserver + ?Sized,
    {
        let run_seed: u64 = rng.gen();
        let mut slots: Vec<_> = self
            .partners
            .iter()
            .map(|p| (PartnerState::new(), partner_stream(run_seed, &p.id)))
            .collect();

        for _ in 0..self.rounds {
            for (entry, (state, partner_rng)) in self.partners.iter().zip(slots.iter_mut()) {
                let outcome = simulate_round(state, &self.rules, entry.volume, partner_rng);
                observer.on_round(&entry.id, &outcome, state);
            }
        }

        let result = self.summarize(slots.iter().map(|(state, _)| state));
        debug!(
            home_total_payoff = result.home_total_payoff,
            home_average_tariff = result.home_average_tariff,
            "run finished"
        );
        result
    }

    fn summarize<'a>(&self, states: impl Iterator<Item = &'a PartnerState>) -> RunResult {
        let rounds = self.rounds as f64;
        let partners: Vec<PartnerOutcome> = self
            .partners
            .iter()
            .zip(states)
            .map(|(entry, state)| PartnerOutcome {
                partner: entry.id.clone(),
                home_payoff: state.cumulative_home_payoff,
                partner_payoff: state.cumulative_partner_payoff,
                home_average_tariff: state.cumulative_home_tariff / rounds,
                partner_average_tariff: state.cumulative_partner_tariff / rounds,
                home_gdp_impact_pct: gdp_impact_pct(state.cumulative_home_payoff, self.home_gdp),
                partner_gdp_impact_pct: gdp_impact_pct(state.cumulative_partner_payoff, entry.gdp),
                home_defection_rate: state.home_defections as f64 / rounds,
                partner_defection_rate: state.partner_defections as f64 / rounds,
            })
            .collect();

        let home_total_payoff: f64 = partners.iter().map(|p| p.home_payoff).sum();
        let home_average_tariff = partners.iter().map(|p| p.home_average_tariff).sum::<f64>()
            / partners.len() as f64;

        RunResult {
            home: self.home.clone(),
            rounds: self.rounds,
            home_total_payoff,
            home_average_tariff,
            home_gdp_impact_pct: gdp_impact_pct(home_total_payoff, self.home_gdp),
            partners,
        }
    }
}

fn lookup_gdp(config: &GameConfig, country: &str) -> Result<f64> {
    let gdp = *config
        .gdp
        .get(country)
        .ok_or_else(|| GameError::MissingGdp(country.to_string()))?;
    if gdp > 0.0 && gdp.is_finite() {
        Ok(gdp)
    } else {
        Err(GameError::NonPositiveGdp {
            country: country.to_string(),
            gdp,
        })
    }
}

fn check_volume(partner: &str, field: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GameError::InvalidTrade {
            partner: partner.to_string(),
            field,
            value,
        })
    }
}

/// Validate `config` and play one run
pub fn run_game<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<RunResult> {
    Ok(Game::new(config)?.run(rng))
}
