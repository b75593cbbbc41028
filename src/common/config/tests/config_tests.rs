//! Unit tests for common-config crate

use common_config::{IndexWidth, MemoryConfig, SelectionConfig, SiftConfig};

#[test]
fn test_sift_config_default() {
    let config = SiftConfig::default();

    assert_eq!(config.selection.index_width, IndexWidth::Auto);
    assert_eq!(config.memory.limit, None);
}

#[test]
fn test_index_width_default() {
    assert_eq!(IndexWidth::default(), IndexWidth::Auto);
    assert_ne!(IndexWidth::Int16, IndexWidth::Int32);
}

#[test]
fn test_sift_config_roundtrip() {
    let config = SiftConfig {
        selection: SelectionConfig {
            index_width: IndexWidth::Int32,
        },
        memory: MemoryConfig {
            limit: Some(4096),
        },
    };

    let json = config.to_json().unwrap();
    let parsed = SiftConfig::from_json(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_json_uses_defaults() {
    let config = SiftConfig::from_json(r#"{"selection": {"index_width": "int16"}}"#).unwrap();

    assert_eq!(config.selection.index_width, IndexWidth::Int16);
    assert_eq!(config.memory, MemoryConfig::default());
}

#[test]
fn test_empty_json_is_default() {
    let config = SiftConfig::from_json("{}").unwrap();
    assert_eq!(config, SiftConfig::default());
}

#[test]
fn test_invalid_json_is_error() {
    let err = SiftConfig::from_json(r#"{"selection": {"index_width": "int8"}}"#).unwrap_err();
    assert_eq!(err.kind(), "SerdeJsonError");
}
