//! Loading harness configuration from TOML files

use lazyprop_harness::{
    Harness, HarnessConfig, HarnessError, MemoryUnits, ProbeScope,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
counts = [10, 20]
access_handles = true
strategies = ["named-map", "eager"]
units = "binary"
probe = "global"
"#,
    );
    let config = HarnessConfig::load(file.path()).unwrap();
    assert_eq!(config.counts, vec![10, 20]);
    assert!(config.access_handles);
    assert_eq!(config.units, MemoryUnits::Binary);
    assert_eq!(config.probe, ProbeScope::Global);

    let harness = Harness::from_config(&config).unwrap();
    assert_eq!(harness.strategies().names(), vec!["named-map", "eager"]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = HarnessConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, HarnessError::ConfigRead { .. }));
    assert!(err.is_config());
}

#[test]
fn test_unknown_strategy_in_config() {
    let file = write_config("strategies = [\"eager\", \"soup\"]");
    let config = HarnessConfig::load(file.path()).unwrap();
    let err = Harness::from_config(&config).unwrap_err();
    assert_eq!(err.to_string(), "unknown strategy `soup`");
}

#[test]
fn test_repeated_strategy_in_config() {
    let config = HarnessConfig::new().with_strategies(vec!["eager".into(), "eager".into()]);
    assert!(matches!(
        Harness::from_config(&config),
        Err(HarnessError::DuplicateStrategy(ref n)) if n == "eager"
    ));
}

#[test]
fn test_empty_selection() {
    let config = HarnessConfig::new().with_strategies(Vec::new());
    assert!(matches!(
        Harness::from_config(&config),
        Err(HarnessError::NoStrategies)
    ));
}

#[test]
fn test_written_config_loads_back() {
    let config = HarnessConfig::new().with_counts(vec![3]).with_units(MemoryUnits::Binary);
    let file = write_config(&config.to_toml().unwrap());
    assert_eq!(HarnessConfig::load(file.path()).unwrap(), config);
}
