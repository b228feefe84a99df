use std::path::PathBuf;

use slipbook_config::{Config, ConfigManager};
use tempfile::tempdir;

#[test]
fn loading_without_a_saved_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let config = manager.load().expect("load");
    assert_eq!(config, Config::default());
    assert_eq!(config.currency, "USD");
    assert!(!config.allow_self_linked_slips);
}

#[test]
fn saved_preferences_round_trip() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut config = Config::default();
    config.currency = "EUR".into();
    config.allow_self_linked_slips = true;
    config.last_opened_book = Some("household".into());
    manager.save(&config).expect("save");

    let loaded = manager.load().expect("load");
    assert_eq!(loaded, config);
    assert!(manager.config_path().exists());
}

#[test]
fn book_root_prefers_the_configured_override() {
    let mut config = Config::default();
    assert!(config
        .resolve_default_book_root()
        .ends_with("Slipbook"));

    config.default_book_root = Some(PathBuf::from("/srv/books"));
    assert_eq!(config.resolve_default_book_root(), PathBuf::from("/srv/books"));
}
