//! Game configuration
//!
//! Static input tables and simulation parameters. Loaded from JSON by the
//! runner or built in code; validated once by [`crate::Game::new`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;
use crate::tariff::TariffBounds;

/// Bilateral trade with one partner, same unit as the GDP table
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Home exports to the partner
    pub exports: f64,
    /// Home imports from the partner; scales the payoffs
    pub imports: f64,
}

impl TradeRecord {
    pub fn new(exports: f64, imports: f64) -> Self {
        Self { exports, imports }
    }

    /// Exports minus imports, from the home side
    pub fn balance(&self) -> f64 {
        self.exports - self.imports
    }
}

fn default_rounds() -> u32 {
    10
}

fn default_normalization() -> f64 {
    1.0
}

/// Complete description of one simulated game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Home country id; must have a GDP entry
    pub home: String,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Trade volumes are divided by this before scaling payoffs
    #[serde(default = "default_normalization")]
    pub normalization: f64,
    #[serde(default)]
    pub tariff: TariffBounds,
    #[serde(default)]
    pub home_strategy: Strategy,
    #[serde(default)]
    pub partner_strategy: Strategy,
    /// Partners to simulate; every trade entry when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partners: Vec<String>,
    pub trade: BTreeMap<String, TradeRecord>,
    pub gdp: BTreeMap<String, f64>,
}

impl GameConfig {
    /// Empty configuration for `home`, to be filled with the builder methods
    pub fn new(home: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            rounds: default_rounds(),
            normalization: default_normalization(),
            tariff: TariffBounds::default(),
            home_strategy: Strategy::default(),
            partner_strategy: Strategy::default(),
            partners: Vec::new(),
            trade: BTreeMap::new(),
            gdp: BTreeMap::new(),
        }
    }

    /// United States against its five largest trading partners.
    /// Values in billions of USD.
    pub fn baseline() -> Self {
        Self::new("USA")
            .with_gdp("USA", 21_000.0)
            .with_partner("Canada", TradeRecord::new(354.0, 418.0), 2_140.0)
            .with_partner("Mexico", TradeRecord::new(323.0, 475.0), 1_790.0)
            .with_partner("China", TradeRecord::new(148.0, 427.0), 17_700.0)
            .with_partner("EU", TradeRecord::new(368.0, 576.0), 18_350.0)
            .with_partner("Japan", TradeRecord::new(76.0, 148.0), 4_210.0)
            .with_normalization(100.0)
    }

    pub fn with_partner(mut self, partner: &str, trade: TradeRecord, gdp: f64) -> Self {
        self.trade.insert(partner.to_string(), trade);
        self.gdp.insert(partner.to_string(), gdp);
        self
    }

    pub fn with_gdp(mut self, country: &str, gdp: f64) -> Self {
        self.gdp.insert(country.to_string(), gdp);
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_normalization(mut self, normalization: f64) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_tariff(mut self, tariff: TariffBounds) -> Self {
        self.tariff = tariff;
        self
    }

    pub fn with_strategies(mut self, home: Strategy, partner: Strategy) -> Self {
        self.home_strategy = home;
        self.partner_strategy = partner;
        self
    }

    /// Partners that will be simulated, in order
    pub fn partner_ids(&self) -> Vec<String> {
        if self.partners.is_empty() {
            self.trade.keys().cloned().collect()
        } else {
            self.partners.clone()
        }
    }
}
