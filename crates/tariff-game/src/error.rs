//! Configuration errors
//!
//! Every variant is fatal and raised before any round is simulated.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    #[error("rounds per run must be at least 1 (got {0})")]
    InvalidRounds(u32),

    #[error("number of Monte Carlo runs must be at least 1 (got {0})")]
    InvalidRuns(usize),

    #[error("no trading partners configured")]
    NoPartners,

    #[error("partner `{0}` is listed more than once")]
    DuplicatePartner(String),

    #[error("partner `{0}` cannot be the home country")]
    HomeAsPartner(String),

    #[error("no trade record for partner `{0}`")]
    MissingTrade(String),

    #[error("no GDP entry for country `{0}`")]
    MissingGdp(String),

    #[error("GDP for `{country}` must be positive (got {gdp})")]
    NonPositiveGdp { country: String, gdp: f64 },

    #[error("trade record for `{partner}` has invalid {field}: {value}")]
    InvalidTrade {
        partner: String,
        field: &'static str,
        value: f64,
    },

    #[error("tariff bounds must satisfy min <= mode <= max (got min={min}, mode={mode}, max={max})")]
    InvalidTariffBounds { min: f64, mode: f64, max: f64 },

    #[error("trade normalization divisor must be positive and finite (got {0})")]
    InvalidNormalization(f64),

    #[error("{field} must be a probability in [0, 1] (got {value})")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("unknown metric `{0}`")]
    UnknownMetric(String),

    #[error("partner `{0}` does not appear in the simulated runs")]
    UnknownPartner(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
