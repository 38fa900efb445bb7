use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tariff_game::{
    run_game, run_monte_carlo, Game, GameConfig, GameError, Metric, Stats, Strategy, TradeRecord,
};

fn canada_only(home: Strategy, partner: Strategy) -> GameConfig {
    GameConfig::new("USA")
        .with_gdp("USA", 21_000.0)
        .with_partner("Canada", TradeRecord::new(350.0, 300.0), 2_000.0)
        .with_normalization(100.0)
        .with_rounds(1)
        .with_strategies(home, partner)
}

#[test]
fn mutual_cooperation_pays_reward() {
    let config = canada_only(Strategy::AlwaysCooperate, Strategy::AlwaysCooperate);
    let result = run_game(&config, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
    assert_eq!(result.home_total_payoff, 9.0);
}

#[test]
fn home_defection_pays_temptation() {
    let config = canada_only(Strategy::AlwaysDefect, Strategy::AlwaysCooperate);
    let result = run_game(&config, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
    assert_eq!(result.home_total_payoff, 15.0);
    assert_eq!(result.partner("Canada").unwrap().partner_payoff, 0.0);
}

#[test]
fn home_gdp_impact_percentage() {
    let config = canada_only(Strategy::AlwaysCooperate, Strategy::AlwaysCooperate);
    let result = run_game(&config, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
    let expected = 9.0 / 21_000.0 * 100.0;
    assert!((result.home_gdp_impact_pct - expected).abs() < 1e-15);
    assert!((result.home_gdp_impact_pct - 0.042857).abs() < 1e-6);
}

#[test]
fn config_loaded_from_json() {
    let json = r#"{
        "home": "USA",
        "rounds": 3,
        "normalization": 100.0,
        "tariff": { "min": 10.0, "mode": 25.0, "max": 50.0 },
        "home_strategy": "AlwaysDefect",
        "partner_strategy": "AlwaysDefect",
        "trade": { "Canada": { "exports": 350.0, "imports": 300.0 } },
        "gdp": { "USA": 21000.0, "Canada": 2000.0 }
    }"#;
    let config: GameConfig = serde_json::from_str(json).unwrap();
    let result = run_game(&config, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();

    // Mutual defection: punishment payoff every round, tariffs both ways
    assert!((result.home_total_payoff - 9.0).abs() < 1e-12);
    let canada = result.partner("Canada").unwrap();
    assert!((10.0..=50.0).contains(&canada.home_average_tariff));
    assert!((10.0..=50.0).contains(&canada.partner_average_tariff));
    assert_eq!(result.home_average_tariff, canada.home_average_tariff);
}

#[test]
fn bad_config_fails_before_running() {
    let mut config = GameConfig::baseline();
    config.gdp.remove("Japan");
    assert_eq!(
        Game::new(&config).unwrap_err(),
        GameError::MissingGdp("Japan".to_string())
    );

    let config = GameConfig::baseline().with_gdp("EU", -1.0);
    assert_eq!(
        run_game(&config, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err(),
        GameError::NonPositiveGdp { country: "EU".to_string(), gdp: -1.0 }
    );
}

#[test]
fn monte_carlo_mean_stabilizes_with_more_runs() {
    let game = Game::new(&GameConfig::baseline().with_rounds(5)).unwrap();
    let means = |n_runs: usize| -> Vec<f64> {
        (0..12u64)
            .map(|seed| {
                run_monte_carlo(&game, n_runs, seed)
                    .unwrap()
                    .stats(&Metric::HomeTotalPayoff)
                    .unwrap()
                    .mean
            })
            .collect()
    };

    let spread_small = Stats::from_samples(&means(10)).std_dev;
    let spread_large = Stats::from_samples(&means(1_000)).std_dev;
    // Standard error shrinks by sqrt(100) = 10
    assert!(
        spread_large < spread_small / 3.0,
        "spread with 1000 runs {} not well below spread with 10 runs {}",
        spread_large,
        spread_small
    );
}

#[test]
fn monte_carlo_headline_summary() {
    let game = Game::new(&GameConfig::baseline().with_rounds(5)).unwrap();
    let sample = run_monte_carlo(&game, 200, 2024).unwrap();
    let summary = sample.summary();

    assert_eq!(summary.n_runs, 200);
    for stats in [
        &summary.home_total_payoff,
        &summary.home_average_tariff,
        &summary.home_gdp_impact_pct,
    ] {
        assert_eq!(stats.n, 200);
        assert!(stats.min <= stats.p05 && stats.p05 <= stats.median);
        assert!(stats.median <= stats.p95 && stats.p95 <= stats.max);
    }
    assert!(summary.home_average_tariff.max <= 30.0);
    assert!(summary.home_total_payoff.min > 0.0);
}
