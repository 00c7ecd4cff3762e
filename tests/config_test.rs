//! Config file loading, merging, and saving against real files.

use geminic::config::{
    config_or_default, load_config_from, load_local_config, save_config_to, Config, LocalConfig,
    ProviderKind,
};
use geminic::error::ConfigError;

#[test]
fn missing_global_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("config.toml"), None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn reads_every_documented_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
key = "secret"
model = "gemini-2.0-flash"
emoji = true
custom_url = "https://proxy.example.com"
i18n = "zh-CN"
model_provider = "gemini"
cot = true
timeout_secs = 30
"#,
    )
    .unwrap();

    let config = load_config_from(&path, None).unwrap();
    assert_eq!(config.key, "secret");
    assert_eq!(config.model, "gemini-2.0-flash");
    assert!(config.emoji);
    assert_eq!(config.custom_base_url(), Some("https://proxy.example.com"));
    assert_eq!(config.locale(), "zh-CN");
    assert_eq!(config.provider_kind(), ProviderKind::Gemini);
    assert!(config.cot);
    assert_eq!(config.timeout_secs, 30);
}

#[test]
fn local_override_wins_for_style_keys_only() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config.toml");
    let local = dir.path().join("geminic.toml");
    std::fs::write(
        &global,
        "key = \"secret\"\nmodel = \"gpt-4o-mini\"\nemoji = false\ni18n = \"en\"\n",
    )
    .unwrap();
    std::fs::write(&local, "emoji = true\ni18n = \"ja\"\n").unwrap();

    let config = load_config_from(&global, Some(&local)).unwrap();
    assert!(config.emoji);
    assert_eq!(config.i18n, "ja");
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.provider_kind(), ProviderKind::OpenAiCompatible);
}

#[test]
fn absent_local_file_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config.toml");
    std::fs::write(&global, "emoji = true\n").unwrap();

    let config = load_config_from(&global, Some(&dir.path().join("geminic.toml"))).unwrap();
    assert!(config.emoji);
    assert_eq!(
        load_local_config(&dir.path().join("geminic.toml")).unwrap(),
        LocalConfig::default()
    );
}

#[test]
fn malformed_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "emoji = maybe\n").unwrap();

    let err = load_config_from(&path, None).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn malformed_file_can_be_rewritten_from_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "emoji = maybe\n").unwrap();

    let mut config = config_or_default(load_config_from(&path, None));
    assert_eq!(config, Config::default());

    config.key = "secret".into();
    save_config_to(&config, &path).unwrap();
    assert_eq!(load_config_from(&path, None).unwrap().key, "secret");
}

#[test]
fn readable_file_is_kept_for_editing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "model = \"gpt-4o-mini\"\n").unwrap();

    let config = config_or_default(load_config_from(&path, None));
    assert_eq!(config.model, "gpt-4o-mini");
}

#[test]
fn save_creates_directories_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("geminic").join("config.toml");
    let config = Config {
        key: "secret".into(),
        model: "gemini-2.0-flash".into(),
        emoji: true,
        model_provider: "gemini".into(),
        ..Config::default()
    };

    save_config_to(&config, &path).unwrap();
    assert_eq!(load_config_from(&path, None).unwrap(), config);
}
