/*!
 * Config Tests
 * JSON config files and override layering
 */

use memsim::config::{ConfigError, ENV_CAPACITY, ENV_STRATEGY};
use memsim::{SimConfig, Strategy};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_file_overrides_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "capacity": 250, "strategy": "worst_fit" }}"#).unwrap();

    let config = SimConfig::from_file(file.path()).unwrap();
    assert_eq!(
        config,
        SimConfig {
            capacity: 250,
            strategy: Strategy::WorstFit,
            quantum: 10,
        }
    );
}

#[test]
fn test_overrides_apply_on_top_of_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "capacity": 250, "quantum": 5 }}"#).unwrap();

    let config = SimConfig::from_file(file.path())
        .unwrap()
        .with_overrides(|key| match key {
            k if k == ENV_CAPACITY => Some("900".to_string()),
            k if k == ENV_STRATEGY => Some("next".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.capacity, 900);
    assert_eq!(config.strategy, Strategy::NextFit);
    assert_eq!(config.quantum, 5);
}

#[test]
fn test_malformed_file_is_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "capacity = 100").unwrap();

    let err = SimConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_bad_strategy_in_file_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "strategy": "fastest-fit" }}"#).unwrap();

    assert!(SimConfig::from_file(file.path()).is_err());
}
