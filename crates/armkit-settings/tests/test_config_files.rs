use armkit_settings::{Config, SettingsError};
use tempfile::TempDir;

fn sample() -> Config {
    let mut config = Config::new();
    config.connection.port = "/dev/ttyACM0".to_string();
    config.connection.assert_rts = false;
    config.response.timeout_ms = 12_000;
    config.motion.speed = 1500.0;
    config
}

#[test]
fn test_toml_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("armkit.toml");

    let config = sample();
    config.save_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[connection]"));
    assert!(text.contains("port = \"/dev/ttyACM0\""));

    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_json_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("armkit.json");

    let config = sample();
    config.save_to_file(&path).unwrap();
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("armkit.yaml");

    assert!(matches!(
        Config::new().save_to_file(&path),
        Err(SettingsError::UnsupportedFormat(ref ext)) if ext == "yaml"
    ));

    std::fs::write(&path, "port: COM3").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file_is_load_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::LoadError(_))
    ));
}

#[test]
fn test_invalid_values_are_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("armkit.toml");
    std::fs::write(&path, "[response]\ntimeout_ms = 0\n").unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("armkit.toml");
    std::fs::write(&path, "[connection\nport = ").unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}
