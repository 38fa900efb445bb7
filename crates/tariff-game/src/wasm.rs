//! WASM bindings for in-browser runs

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::strategy::describe_strategy;
use crate::{run_monte_carlo, run_single, Game, GameConfig, ReactiveParams, Strategy};

fn parse_game(config_json: &str) -> Result<Game, JsError> {
    let config: GameConfig = serde_json::from_str(config_json)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    Game::new(&config).map_err(|e| JsError::new(&e.to_string()))
}

/// Play a single run
///
/// # Arguments
/// * `config_json` - JSON serialized GameConfig
/// * `seed` - Base seed; the run matches run 0 of a Monte Carlo batch with
///   the same seed
///
/// # Returns
/// JSON serialized RunResult
#[wasm_bindgen]
pub fn simulate_game(config_json: &str, seed: u64) -> Result<JsValue, JsError> {
    let game = parse_game(config_json)?;
    let result = run_single(&game, seed);

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Run a Monte Carlo batch and return its summary statistics
#[wasm_bindgen]
pub fn simulate_monte_carlo(config_json: &str, runs: usize, seed: u64) -> Result<JsValue, JsError> {
    let game = parse_game(config_json)?;
    let sample = run_monte_carlo(&game, runs, seed).map_err(|e| JsError::new(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&sample.summary())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get the built-in baseline configuration as JSON
#[wasm_bindgen]
pub fn get_baseline_config() -> Result<String, JsError> {
    serde_json::to_string(&GameConfig::baseline())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

#[derive(serde::Serialize)]
struct StrategyInfo {
    id: String,
    name: String,
    description: String,
}

/// Get all available strategy types
#[wasm_bindgen]
pub fn get_strategy_types() -> Result<JsValue, JsError> {
    let types: Vec<StrategyInfo> = [
        ("Reactive", "Reactive", Strategy::Reactive(ReactiveParams::default())),
        ("TitForTat", "Tit for Tat", Strategy::TitForTat),
        ("AlwaysCooperate", "Always Cooperate", Strategy::AlwaysCooperate),
        ("AlwaysDefect", "Always Defect", Strategy::AlwaysDefect),
    ]
    .iter()
    .map(|(id, name, strategy)| StrategyInfo {
        id: id.to_string(),
        name: name.to_string(),
        description: describe_strategy(strategy),
    })
    .collect();

    serde_wasm_bindgen::to_value(&types)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
