//! Round event sinks
//!
//! The driver calls an observer after every simulated round. The engine is
//! silent by default; narration and recording are opt-in.

use crate::game::{PartnerState, RoundOutcome};

pub trait RoundObserver {
    fn on_round(&mut self, partner: &str, outcome: &RoundOutcome, state: &PartnerState);
}

/// Ignores every round
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RoundObserver for NoopObserver {
    fn on_round(&mut self, _partner: &str, _outcome: &RoundOutcome, _state: &PartnerState) {}
}

/// Narrates each round as a `tracing` event
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RoundObserver for TracingObserver {
    fn on_round(&mut self, partner: &str, outcome: &RoundOutcome, state: &PartnerState) {
        tracing::info!(
            partner,
            round = outcome.round,
            home_move = ?outcome.home_move,
            partner_move = ?outcome.partner_move,
            home_payoff = outcome.home_payoff,
            partner_payoff = outcome.partner_payoff,
            home_tariff = outcome.home_tariff,
            partner_tariff = outcome.partner_tariff,
            cumulative_home = state.cumulative_home_payoff,
            cumulative_partner = state.cumulative_partner_payoff,
            "round played"
        );
    }
}

/// Records every round in play order
#[derive(Clone, Debug, Default)]
pub struct RoundLog {
    pub entries: Vec<(String, RoundOutcome)>,
}

impl RoundLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds played against one partner, in round order
    pub fn for_partner<'a>(&'a self, partner: &'a str) -> impl Iterator<Item = &'a RoundOutcome> + 'a {
        self.entries
            .iter()
            .filter(move |(p, _)| p == partner)
            .map(|(_, outcome)| outcome)
    }
}

impl RoundObserver for RoundLog {
    fn on_round(&mut self, partner: &str, outcome: &RoundOutcome, _state: &PartnerState) {
        self.entries.push((partner.to_string(), *outcome));
    }
}

impl<O: RoundObserver + ?Sized> RoundObserver for &mut O {
    fn on_round(&mut self, partner: &str, outcome: &RoundOutcome, state: &PartnerState) {
        (**self).on_round(partner, outcome, state);
    }
}
