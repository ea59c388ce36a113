use std::fs;
use std::path::PathBuf;

use chanlun::{ChanConfig, ChanConfigPatch, DataError, StrokeMode, Timeframe};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("chanlun_{}_{}", std::process::id(), name))
}

#[test]
fn defaults_match_documented_values() {
    let config = ChanConfig::default();
    assert_eq!(config.stroke_mode, StrokeMode::New);
    assert_eq!(config.stroke_bar_count, 5);
    assert_eq!(
        (config.macd_fast, config.macd_slow, config.macd_signal),
        (12, 26, 9)
    );
    assert_eq!(config.min_bars, 10);
    assert_eq!(config.stroke_divergence_ratio, 0.9);
    assert_eq!(config.segment_divergence_ratio, 0.8);
    assert_eq!(config.divergence_window_bars, 10);
    assert_eq!(config.timeframe, None);
}

#[test]
fn yaml_patch_overrides_only_given_fields() {
    let yaml = r#"
stroke_mode: old
macd_fast: 5
timeframe: 1h
"#;
    let config = ChanConfig::from_yaml_str(yaml).expect("yaml");

    assert_eq!(config.stroke_mode, StrokeMode::Old);
    assert_eq!(config.macd_fast, 5);
    assert_eq!(config.macd_slow, 26);
    assert_eq!(config.timeframe, Some(Timeframe::H1));
}

#[test]
fn json_patch_applies_ratios() {
    let json = r#"{"stroke_mode":"custom","stroke_bar_count":7,"stroke_divergence_ratio":0.75}"#;
    let config = ChanConfig::from_json_str(json).expect("json");

    assert_eq!(config.stroke_mode, StrokeMode::Custom);
    assert_eq!(config.stroke_bar_count, 7);
    assert_eq!(config.stroke_divergence_ratio, 0.75);
    assert_eq!(config.segment_divergence_ratio, 0.8);
}

#[test]
fn empty_patch_keeps_defaults() {
    let config = ChanConfig::default().apply_patch(ChanConfigPatch::default());
    assert_eq!(config, ChanConfig::default());
}

#[test]
fn invalid_stroke_mode_is_rejected() {
    let err = ChanConfig::from_yaml_str("stroke_mode: sideways").unwrap_err();
    assert!(matches!(err, DataError::Yaml(_)));
    assert!(err.to_string().contains("invalid stroke mode"));

    assert!(matches!(
        StrokeMode::parse("sideways"),
        Err(DataError::InvalidStrokeMode(_))
    ));
    assert_eq!(StrokeMode::parse(" Fractal ").ok(), Some(StrokeMode::Fractal));
}

#[test]
fn from_file_dispatches_on_extension() {
    let yaml = temp_path("config.yaml");
    fs::write(&yaml, "divergence_window_bars: 3\n").expect("write yaml");
    let json = temp_path("config.json");
    fs::write(&json, r#"{"min_bars": 20}"#).expect("write json");
    let toml = temp_path("config.toml");
    fs::write(&toml, "min_bars = 20\n").expect("write toml");

    assert_eq!(
        ChanConfig::from_file(&yaml).expect("yaml file").divergence_window_bars,
        3
    );
    assert_eq!(ChanConfig::from_file(&json).expect("json file").min_bars, 20);
    assert!(matches!(
        ChanConfig::from_file(&toml),
        Err(DataError::UnsupportedFormat(_))
    ));

    for path in [yaml, json, toml] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn missing_file_reports_io_error() {
    let err = ChanConfig::from_file(temp_path("missing.yaml")).unwrap_err();
    assert!(matches!(err, DataError::Io(_)));
}

#[test]
fn config_serializes_with_lowercase_names() {
    let config = ChanConfig {
        timeframe: Some(Timeframe::M15),
        ..ChanConfig::default()
    };
    let value = serde_json::to_value(&config).expect("serialize");
    assert_eq!(value["stroke_mode"], "new");
    assert_eq!(value["timeframe"], "15m");

    let back = ChanConfig::from_json_str(&value.to_string()).expect("reparse");
    assert_eq!(back, config);
}
