//! Integration tests for configuration module

use std::fs;
use tempfile::TempDir;

use super::{ConfigManager, read_ignore_file};
use crate::filter::bucket_ignore_patterns;

#[test]
fn test_full_config_workflow() {
    let tmp = TempDir::new().unwrap();
    let ignore_file = tmp.path().join("skip-me");
    fs::write(&ignore_file, "# skip\npinky\nignore/subdir\n").unwrap();

    let config_file = tmp.path().join("config.toml");
    fs::write(
        &config_file,
        format!(
            r#"
ignore_patterns = ["*.bak"]
ignore_files = ["{}"]
ignore_unexpected_children = true
report_unexpected_files = true
"#,
            ignore_file.display()
        ),
    )
    .unwrap();

    let config = ConfigManager::load(Some(&config_file)).unwrap();

    assert!(config.ignore_unexpected_children);
    assert!(config.report_unexpected_files);
    assert!(!config.ignore_symlinks);

    let mut patterns = config.ignore_patterns.clone();
    for path in &config.ignore_files {
        patterns.extend(read_ignore_file(path).unwrap());
    }
    let ignore = bucket_ignore_patterns(&patterns).unwrap();

    assert!(ignore.is_ignored_name("pinky".as_ref()));
    assert!(ignore.is_ignored_name("old.bak".as_ref()));
    assert!(ignore.is_ignored_path("/a/b/ignore/subdir".as_ref()));
}

#[test]
fn test_invalid_config_validation() {
    let tmp = TempDir::new().unwrap();
    let config_file = tmp.path().join("config.toml");
    fs::write(&config_file, r#"ignore_patterns = [""]"#).unwrap();

    let result = ConfigManager::load(Some(&config_file));

    assert!(result.unwrap_err().to_string().contains("cannot be empty"));
}

#[test]
fn test_unknown_key_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let config_file = tmp.path().join("config.toml");
    fs::write(&config_file, "delete_unexpected_files = true\n").unwrap();

    assert!(ConfigManager::load(Some(&config_file)).is_err());
}
