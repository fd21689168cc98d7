//! Configuration layering tests: overrides > file > defaults

use option_selector::config::{
    FutureSelectorOverrides, OptionSelectorOverrides,
};
use option_selector::{FutureSelectorConfig, OptionSelectorConfig};
use rstest::*;
use std::fs;

fn write_config(dir: &std::path::Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[rstest]
fn defaults_without_file() {
    let config = OptionSelectorConfig::load(
        std::path::Path::new("/nonexistent/domain_service"),
        &OptionSelectorOverrides::default(),
    )
    .unwrap();
    assert_eq!(config, OptionSelectorConfig::default());
}

#[rstest]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        "selection/option_selector.toml",
        r#"
[filter]
strike_level = 2
min_bid_price = 5.0

[score_weight]
liquidity_weight = 0.5
otm_weight = 0.25
expiry_weight = 0.25

[score_weight.liquidity_detail]
spread_weight = 0.7
volume_weight = 0.3
"#,
    );

    let config =
        OptionSelectorConfig::load(dir.path(), &OptionSelectorOverrides::default()).unwrap();
    assert_eq!(config.strike_level, 2);
    assert!((config.min_bid_price - 5.0).abs() < 1e-12);
    assert!((config.score_liquidity_weight - 0.5).abs() < 1e-12);
    assert!((config.liq_spread_weight - 0.7).abs() < 1e-12);
    // Untouched fields keep their defaults.
    assert_eq!(config.min_bid_volume, OptionSelectorConfig::default().min_bid_volume);
    assert_eq!(config.max_trading_days, OptionSelectorConfig::default().max_trading_days);
}

#[rstest]
fn overrides_beat_file_values() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        "selection/option_selector.toml",
        "[filter]\nstrike_level = 2\nmin_bid_volume = 20\n",
    );

    let config = OptionSelectorConfig::load(
        dir.path(),
        &OptionSelectorOverrides {
            strike_level: Some(5),
            ..OptionSelectorOverrides::default()
        },
    )
    .unwrap();
    // Non-null override wins; null override preserves the file layer.
    assert_eq!(config.strike_level, 5);
    assert_eq!(config.min_bid_volume, 20);
}

#[rstest]
fn future_selector_layering() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        "selection/future_selector.toml",
        "[dominant]\nvolume_weight = 0.7\noi_weight = 0.3\n\n[rollover]\ndays = 7\n",
    );

    let from_file =
        FutureSelectorConfig::load(dir.path(), &FutureSelectorOverrides::default()).unwrap();
    assert!((from_file.volume_weight - 0.7).abs() < 1e-12);
    assert_eq!(from_file.rollover_days, 7);

    let overridden = FutureSelectorConfig::load(
        dir.path(),
        &FutureSelectorOverrides {
            rollover_days: Some(3),
            ..FutureSelectorOverrides::default()
        },
    )
    .unwrap();
    assert_eq!(overridden.rollover_days, 3);
    assert!((overridden.volume_weight - 0.7).abs() < 1e-12);
}
