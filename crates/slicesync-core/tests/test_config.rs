use slicesync_core::sync::SyncConfig;

#[test]
fn test_default_config() {
    let config = SyncConfig::default();
    assert!(config.initial_sync);
    assert!(!config.invert_wheel);
}

#[test]
fn test_missing_fields_fall_back_to_defaults() {
    let config: SyncConfig = serde_json::from_str("{}").unwrap();
    assert!(config.initial_sync);
    assert!(!config.invert_wheel);
}

#[test]
fn test_round_trip() {
    let config = SyncConfig {
        initial_sync: false,
        invert_wheel: true,
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: SyncConfig = serde_json::from_str(&json).unwrap();
    assert!(!back.initial_sync);
    assert!(back.invert_wheel);
}
