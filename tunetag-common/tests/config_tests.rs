//! Unit tests for configuration and root folder resolution
//!
//! Uses serial_test: tests touching TUNETAG_ROOT_FOLDER must not run in parallel.

use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tunetag_common::config::{
    RootFolderInitializer, RootFolderResolver, TomlConfig, ROOT_FOLDER_ENV,
};

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let resolver = RootFolderResolver::with_config(
        "test",
        TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        },
    );

    let resolved = resolver.resolve(None);
    env::remove_var(ROOT_FOLDER_ENV);

    assert_eq!(resolved, PathBuf::from("/from/env"));
}

#[test]
#[serial]
fn test_toml_used_without_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolver = RootFolderResolver::with_config(
        "test",
        TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        },
    );

    assert_eq!(resolver.resolve(None), PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolver = RootFolderResolver::with_config("test", TomlConfig::default());

    let resolved = resolver.resolve(None);

    assert!(!resolved.as_os_str().is_empty());
    assert!(resolved.to_string_lossy().contains("tunetag"));
}

#[test]
#[serial]
fn test_cli_beats_env() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let resolver = RootFolderResolver::with_config("test", TomlConfig::default());

    let resolved = resolver.resolve(Some(Path::new("/from/cli")));
    env::remove_var(ROOT_FOLDER_ENV);

    assert_eq!(resolved, PathBuf::from("/from/cli"));
}

#[test]
fn test_load_config_file_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "bind_address = \"0.0.0.0:8080\"\n").unwrap();

    let config = TomlConfig::load(&config_path).unwrap();

    assert_eq!(config.bind_address(), "0.0.0.0:8080");
    assert!(config.root_folder.is_none());
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = TomlConfig::load(&temp_dir.path().join("absent.toml"));
    assert!(matches!(result, Err(tunetag_common::Error::Io(_))));
}

#[test]
fn test_initializer_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("a").join("b");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("tunetag.db"));
}
