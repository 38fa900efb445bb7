//! Tariff Game
//!
//! Core logic for the repeated tariff game: a home country plays an iterated
//! Prisoner's Dilemma against each trading partner, with payoffs scaled by
//! trade volume and tariff rates sampled on every defection.
//! This crate is compiled to:
//! - Native (for the `tariff-sim` runner)
//! - WASM (for in-browser runs)

mod config;
mod error;
mod game;
mod monte_carlo;
mod observer;
mod random;
mod stats;
mod strategy;
mod tariff;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{GameConfig, TradeRecord};
pub use error::{GameError, Result};
pub use game::{
    gdp_impact_pct, run_game, simulate_round, Game, PartnerOutcome, PartnerState, RoundOutcome,
    RoundRules, RunResult,
};
pub use monte_carlo::{run_monte_carlo, run_single, Metric, MonteCarloSample, MonteCarloSummary, PartnerSummary, RunRecord};
pub use observer::{NoopObserver, RoundLog, RoundObserver, TracingObserver};
pub use random::{partner_key, partner_stream, run_stream};
pub use stats::{quantile, Stats};
pub use strategy::{choose_move, describe_strategy, Move, ReactiveParams, Strategy};
pub use tariff::{TariffBounds, TariffSampler};

/// Payoff for the acting side, scaled by trade volume
///
/// Temptation (5) > reward (3) > punishment (1) > sucker (0).
pub fn payoff(acting: Move, other: Move, trade_volume: f64) -> f64 {
    let multiplier = match (acting, other) {
        (Move::Cooperate, Move::Cooperate) => 3.0,
        (Move::Cooperate, Move::Defect) => 0.0,
        (Move::Defect, Move::Cooperate) => 5.0,
        (Move::Defect, Move::Defect) => 1.0,
    };
    multiplier * trade_volume
}

/// Payoffs for both sides of a round
/// Returns (payoff_a, payoff_b)
pub fn payoff_pair(a: Move, b: Move, trade_volume: f64) -> (f64, f64) {
    (payoff(a, b, trade_volume), payoff(b, a, trade_volume))
}
