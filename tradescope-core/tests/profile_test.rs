//! Strategy profile loading: strict TOML, validation and lookups.

use std::io::Write;

use tradescope_core::profile::{ProfileError, StrategyRegistry};
use tradescope_core::regression::ConfidenceLevel;

const WEIGHTS: &str = r#"
[profile.weights]
macd = 15.0
ma_alignment = 15.0
trend = 12.0
ema_cross = 8.0
regression = 10.0
adx = 8.0
rsi = 10.0
stochastic = 8.0
williams = 6.0
vwap = 8.0
bollinger = 6.0
patterns = 15.0
volume = 10.0
"#;

fn profile_toml(id: &str, extra: &str) -> String {
    format!(
        r#"
[[profile]]
id = "{id}"
timeframe = "1d"
holding_period = "3-10 days"
min_risk_reward = 2.0
stop_loss_percent = 5.0
target_percent = 10.0
min_confidence = 70.0
min_indicator_align = 4
max_volatility_percent = 6.0
atr_multiplier = 2.0
regression_length = 50
prediction_bars = 10
confidence_level = 95
{extra}
{WEIGHTS}"#
    )
}

#[test]
fn custom_profile_loads() {
    let registry = StrategyRegistry::from_toml_str(&profile_toml("custom", "")).unwrap();
    assert_eq!(registry.len(), 1);
    let profile = registry.get("custom").unwrap();
    assert_eq!(profile.confidence_level, ConfidenceLevel::P95);
    assert_eq!(profile.weights.patterns, 15.0);
}

#[test]
fn unknown_field_is_rejected() {
    let toml = profile_toml("custom", "leverage = 3.0");
    let err = StrategyRegistry::from_toml_str(&toml).unwrap_err();
    assert!(matches!(err, ProfileError::Parse(_)), "{err}");
    assert!(err.to_string().contains("leverage"), "{err}");
}

#[test]
fn missing_field_is_rejected() {
    let toml = profile_toml("custom", "").replace("atr_multiplier = 2.0\n", "");
    let err = StrategyRegistry::from_toml_str(&toml).unwrap_err();
    assert!(matches!(err, ProfileError::Parse(_)), "{err}");
    assert!(err.to_string().contains("atr_multiplier"), "{err}");
}

#[test]
fn missing_weight_is_rejected() {
    let toml = profile_toml("custom", "").replace("volume = 10.0\n", "");
    assert!(matches!(
        StrategyRegistry::from_toml_str(&toml),
        Err(ProfileError::Parse(_))
    ));
}

#[test]
fn unsupported_confidence_level_is_rejected() {
    let toml = profile_toml("custom", "").replace("confidence_level = 95", "confidence_level = 80");
    assert!(matches!(
        StrategyRegistry::from_toml_str(&toml),
        Err(ProfileError::Parse(_))
    ));
}

#[test]
fn invalid_values_are_rejected() {
    let toml = profile_toml("custom", "").replace("min_risk_reward = 2.0", "min_risk_reward = -1.0");
    let err = StrategyRegistry::from_toml_str(&toml).unwrap_err();
    assert!(matches!(err, ProfileError::Invalid { ref id, .. } if id == "custom"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let toml = format!("{}{}", profile_toml("twin", ""), profile_toml("twin", ""));
    let err = StrategyRegistry::from_toml_str(&toml).unwrap_err();
    assert!(matches!(err, ProfileError::Duplicate(ref id) if id == "twin"));
}

#[test]
fn unknown_id_has_no_fallback() {
    let registry = StrategyRegistry::builtin().unwrap();
    let err = registry.get("default").unwrap_err();
    assert!(matches!(err, ProfileError::UnknownProfile { .. }));
}

#[test]
fn profiles_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(profile_toml("from_file", "").as_bytes()).unwrap();
    let registry = StrategyRegistry::from_file(file.path()).unwrap();
    assert_eq!(registry.ids().collect::<Vec<_>>(), ["from_file"]);
}
