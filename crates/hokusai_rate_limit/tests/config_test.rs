//! Tests for layered configuration.

use hokusai_core::StyleMode;
use hokusai_rate_limit::HokusaiConfig;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_bundled_defaults() {
    let config = HokusaiConfig::from_toml_str("").unwrap();

    assert_eq!(config.generation.image_model, "gemini-2.5-flash-image");
    assert_eq!(config.generation.text_model, "gemini-2.5-flash");
    assert_eq!(config.generation.default_style, StyleMode::Anime);
    assert_eq!(config.generation.requests_per_minute, None);
    assert_eq!(config.batch.cooldown_secs, 60);
    assert_eq!(config.batch.success_delay(), Duration::from_secs(2));
    assert_eq!(config.batch.skip_delay(), Duration::from_secs(1));
    assert_eq!(*config.retry.max_retries(), 5);
    assert_eq!(config.aliases.get("sparky").map(String::as_str), Some("aurakinetic"));
    assert_eq!(config.aliases.len(), 11);
}

#[test]
fn test_overrides_merge_with_defaults() {
    let config = HokusaiConfig::from_toml_str(
        r#"
        [generation]
        default_style = "pixar"
        requests_per_minute = 8

        [aliases]
        boss = "jaxiron"
        "#,
    )
    .unwrap();

    assert_eq!(config.generation.default_style, StyleMode::Pixar);
    assert_eq!(config.generation.requests_per_minute, Some(8));
    assert_eq!(config.generation.aspect_ratio, "16:9");
    assert_eq!(config.aliases["boss"], "jaxiron");
    assert_eq!(config.aliases["ayo"], "auraayo");
}

#[test]
fn test_from_file_fills_missing_sections() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[retry]\ninitial_delay_ms = 100\nmultiplier = 2.0\nmax_retries = 2").unwrap();

    let config = HokusaiConfig::from_file(&path).unwrap();
    assert_eq!(
        config.retry.delays(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
    assert_eq!(config.batch.cooldown_secs, 60);
    assert!(config.aliases.is_empty());
}

#[test]
fn test_invalid_multiplier_rejected() {
    let err = HokusaiConfig::from_toml_str("[retry]\nmultiplier = 0.5\n").unwrap_err();
    assert!(format!("{}", err).contains("multiplier"));
}

#[test]
fn test_unknown_style_rejected() {
    assert!(HokusaiConfig::from_toml_str("[generation]\ndefault_style = \"noir\"\n").is_err());
}
