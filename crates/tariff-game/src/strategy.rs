//! Strategy definitions and execution

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// A move in the tariff game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Free trade, no tariff.
    Cooperate,
    /// Impose a tariff on the other side.
    Defect,
}

impl Move {
    pub fn is_defect(self) -> bool {
        self == Move::Defect
    }
}

/// Defection probabilities for the reactive rule, keyed on the opponent's last move
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactiveParams {
    /// Chance to defect after the opponent cooperated (lenient retaliation)
    pub defect_after_cooperate: f64,
    /// Chance to defect after the opponent defected (strong retaliation)
    pub defect_after_defect: f64,
}

impl Default for ReactiveParams {
    fn default() -> Self {
        Self {
            defect_after_cooperate: 0.2,
            defect_after_defect: 0.8,
        }
    }
}

impl ReactiveParams {
    pub fn validate(&self) -> Result<()> {
        check_probability("defect_after_cooperate", self.defect_after_cooperate)?;
        check_probability("defect_after_defect", self.defect_after_defect)
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GameError::InvalidProbability { field, value })
    }
}

/// How one side picks its next move
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Two-state Markov rule conditioned on the opponent's last move.
    Reactive(ReactiveParams),
    /// Copy the opponent's last move.
    TitForTat,
    /// Never impose a tariff.
    AlwaysCooperate,
    /// Always impose a tariff.
    AlwaysDefect,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Reactive(ReactiveParams::default())
    }
}

impl Strategy {
    pub fn validate(&self) -> Result<()> {
        match self {
            Strategy::Reactive(params) => params.validate(),
            _ => Ok(()),
        }
    }
}

/// Execute a strategy for one round
///
/// # Arguments
/// * `strategy` - The strategy to execute
/// * `previous_opponent` - The opponent's move in the previous round
/// * `rng` - Random source; only the reactive rule draws from it
pub fn choose_move<R: Rng + ?Sized>(
    strategy: &Strategy,
    previous_opponent: Move,
    rng: &mut R,
) -> Move {
    match strategy {
        Strategy::Reactive(params) => execute_reactive(params, previous_opponent, rng),
        Strategy::TitForTat => previous_opponent,
        Strategy::AlwaysCooperate => Move::Cooperate,
        Strategy::AlwaysDefect => Move::Defect,
    }
}

/// Reactive: one uniform draw in [0, 1), defect when it falls under the
/// probability selected by the opponent's last move
fn execute_reactive<R: Rng + ?Sized>(
    params: &ReactiveParams,
    previous_opponent: Move,
    rng: &mut R,
) -> Move {
    let threshold = match previous_opponent {
        Move::Cooperate => params.defect_after_cooperate,
        Move::Defect => params.defect_after_defect,
    };
    let draw: f64 = rng.gen();

    if draw < threshold {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

/// Get a human-readable description of a strategy
pub fn describe_strategy(strategy: &Strategy) -> String {
    match strategy {
        Strategy::Reactive(params) => format!(
            "Defects {:.0}% of the time after cooperation and {:.0}% after a tariff.",
            params.defect_after_cooperate * 100.0,
            params.defect_after_defect * 100.0,
        ),
        Strategy::TitForTat => "Copies the other side's last move.".to_string(),
        Strategy::AlwaysCooperate => "Never imposes a tariff.".to_string(),
        Strategy::AlwaysDefect => "Always imposes a tariff.".to_string(),
    }
}
